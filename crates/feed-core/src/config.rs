use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SITE_ORIGIN: &str = "https://www.funda.nl";

pub const DEFAULT_SEARCH_AREAS: [&str; 5] = [
    "amsterdam",
    "diemen",
    "duivendrecht",
    "amstelveen",
    "ouderkerk-aan-de-amstel",
];

/// What to ask the search backend for. The page index is supplied per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub areas: Vec<String>,
    pub offering_type: String,
    pub price_min: Option<u64>,
    pub price_max: Option<u64>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            areas: DEFAULT_SEARCH_AREAS.iter().map(|a| a.to_string()).collect(),
            offering_type: "buy".to_string(),
            price_min: Some(450_000),
            price_max: Some(513_000),
        }
    }
}

/// Acquisition criteria applied after pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    pub min_bedrooms: u32,
    pub min_living_area: f64,
    /// Worst energy label still accepted.
    pub energy_floor: String,
    pub accept_unknown_label: bool,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            min_bedrooms: 2,
            min_living_area: 65.0,
            energy_floor: "D".to_string(),
            accept_unknown_label: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub search: SearchQuery,
    pub criteria: Criteria,
    /// Detail fetches in flight at once.
    pub workers: usize,
    /// Pause between two search page requests.
    pub page_delay: Duration,
    /// Origin used to build listing URLs from relative detail paths.
    pub site_origin: String,
    /// Report enrichment progress after this many completions.
    pub progress_every: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search: SearchQuery::default(),
            criteria: Criteria::default(),
            workers: 8,
            page_delay: Duration::from_secs(1),
            site_origin: DEFAULT_SITE_ORIGIN.to_string(),
            progress_every: 50,
        }
    }
}
