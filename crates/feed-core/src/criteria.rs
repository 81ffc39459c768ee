use crate::config::Criteria;
use crate::models::RawListing;
use crate::progress::Progress;
use tracing::debug;

/// Energy labels from best to worst.
pub const ENERGY_SCALE: [&str; 10] = ["A+++", "A++", "A+", "A", "B", "C", "D", "E", "F", "G"];

pub const UNKNOWN_LABEL: &str = "unknown";

impl Criteria {
    pub fn accepts_label(&self, label: &str) -> bool {
        if label == UNKNOWN_LABEL {
            return self.accept_unknown_label;
        }
        let floor = ENERGY_SCALE.iter().position(|l| *l == self.energy_floor);
        let rank = ENERGY_SCALE.iter().position(|l| *l == label);
        match (rank, floor) {
            (Some(rank), Some(floor)) => rank <= floor,
            _ => false,
        }
    }

    /// A listing passes only when every required field is present and meets
    /// its threshold.
    pub fn accepts(&self, listing: &RawListing) -> bool {
        let bedrooms_ok = listing
            .bedrooms
            .is_some_and(|bedrooms| bedrooms >= self.min_bedrooms);
        let area_ok = listing
            .living_area
            .is_some_and(|area| area >= self.min_living_area);
        let label_ok = listing
            .energy_label
            .as_deref()
            .is_some_and(|label| self.accepts_label(label));

        bedrooms_ok && area_ok && label_ok
    }
}

pub fn filter_listings(
    listings: Vec<RawListing>,
    criteria: &Criteria,
    progress: &Progress,
) -> Vec<RawListing> {
    let before = listings.len();
    let filtered: Vec<RawListing> = listings
        .into_iter()
        .filter(|listing| criteria.accepts(listing))
        .collect();

    debug!("Criteria kept {} of {} listings", filtered.len(), before);
    progress.report(format!("  {} listings after filtering", filtered.len()));
    filtered
}
