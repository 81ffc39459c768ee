use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A listing as returned by one search results page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    pub global_id: String,
    pub bedrooms: Option<u32>,
    pub living_area: Option<f64>,
    pub energy_label: Option<String>,
    pub price: Option<f64>,
    pub title: Option<String>,
    /// Site-relative path of the listing page.
    pub detail_url: Option<String>,
    pub object_type: Option<String>,
    pub construction_year: Option<i32>,
    pub postcode: Option<String>,
    pub neighbourhood: Option<String>,
    pub has_garden: Option<bool>,
    pub has_balcony: Option<bool>,
    pub has_roof_terrace: Option<bool>,
    pub publish_date: Option<String>,
}

impl RawListing {
    pub fn new(global_id: impl Into<String>) -> Self {
        Self {
            global_id: global_id.into(),
            ..Default::default()
        }
    }

    pub fn has_identity(&self) -> bool {
        !self.global_id.is_empty()
    }
}

/// Everything the detail endpoint tells us about one listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDetail {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub url: Option<String>,
    pub photo_urls: Vec<String>,
    pub characteristics: BTreeMap<String, String>,
    pub description: Option<String>,
    pub publication_date: Option<String>,
    pub house_type: Option<String>,
    /// Most recent WOZ value. Only ever set by the enricher.
    pub woz_value: Option<f64>,
}

impl RawDetail {
    /// Both halves of the coordinate pair, or nothing.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        }
    }

    pub fn characteristic(&self, label: &str) -> Option<&str> {
        self.characteristics.get(label).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceSource {
    /// Officially assessed value (WOZ).
    Woz,
    Sold,
    Asking,
    Other(String),
}

impl PriceSource {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "woz" => PriceSource::Woz,
            "sold" | "verkocht" => PriceSource::Sold,
            "asking" | "vraagprijs" | "listed" => PriceSource::Asking,
            _ => PriceSource::Other(label.trim().to_string()),
        }
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceSource::Woz => write!(f, "WOZ"),
            PriceSource::Sold => write!(f, "sold"),
            PriceSource::Asking => write!(f, "asking"),
            PriceSource::Other(label) => write!(f, "{}", label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEvent {
    pub source: PriceSource,
    pub price: f64,
}

/// Per-identity results of the enrichment stage. Both maps only hold
/// identities whose detail record yielded a usable coordinate pair.
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub coordinates: HashMap<String, Coordinates>,
    pub details: HashMap<String, RawDetail>,
}

impl Enrichment {
    pub fn insert(&mut self, global_id: String, coordinates: Coordinates, detail: RawDetail) {
        self.coordinates.insert(global_id.clone(), coordinates);
        self.details.insert(global_id, detail);
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}
