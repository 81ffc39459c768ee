use crate::ListingSource;
use feed_core::{Coordinates, Enrichment, PriceEvent, PriceSource, Progress, RawDetail, RawListing};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Value of the most recent WOZ entry. History is ordered oldest first.
pub fn latest_woz(history: &[PriceEvent]) -> Option<f64> {
    history
        .iter()
        .rev()
        .find(|event| event.source == PriceSource::Woz)
        .map(|event| event.price)
}

fn wants_valuation(global_id: &str, known_ids: Option<&HashSet<String>>) -> bool {
    known_ids.map_or(true, |known| !known.contains(global_id))
}

/// Fetch the detail record for one listing and, for listings the caller does
/// not know yet, its WOZ value. Every failure stays local to this listing.
async fn enrich_one(
    source: &dyn ListingSource,
    global_id: &str,
    known_ids: Option<&HashSet<String>>,
) -> Option<(Coordinates, RawDetail)> {
    let mut detail = match source.fetch_detail(global_id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => {
            debug!("No detail record for {}", global_id);
            return None;
        }
        Err(e) => {
            warn!("Failed to fetch {}: {}", global_id, e);
            return None;
        }
    };

    let Some(coordinates) = detail.coordinates() else {
        debug!("Listing {} has no usable coordinates", global_id);
        return None;
    };

    if wants_valuation(global_id, known_ids) {
        if let Some(url) = detail.url.clone().filter(|u| !u.is_empty()) {
            match source.fetch_price_history(&url).await {
                Ok(history) => {
                    if let Some(woz) = latest_woz(&history) {
                        detail.woz_value = Some(woz);
                    }
                }
                Err(e) => warn!("Failed to fetch WOZ for {}: {}", global_id, e),
            }
        }
    }

    Some((coordinates, detail))
}

/// Fetch details for every listing with at most `workers` requests in
/// flight. Listings whose detail fetch failed or lacked coordinates are
/// simply absent from the result.
pub async fn enrich(
    source: &dyn ListingSource,
    listings: &[RawListing],
    known_ids: Option<&HashSet<String>>,
    workers: usize,
    progress_every: usize,
    progress: &Progress,
) -> Enrichment {
    let mut seen = HashSet::new();
    let ids: Vec<&str> = listings
        .iter()
        .filter(|l| l.has_identity())
        .map(|l| l.global_id.as_str())
        .filter(|id| seen.insert(*id))
        .collect();
    let total = ids.len();
    let workers = workers.max(1);

    progress.report(format!(
        "  Fetching details for {} listings ({} workers)...",
        total, workers
    ));

    let mut completions = stream::iter(ids)
        .map(|global_id| async move { (global_id, enrich_one(source, global_id, known_ids).await) })
        .buffer_unordered(workers);

    let mut enrichment = Enrichment::default();
    let mut done = 0;
    while let Some((global_id, outcome)) = completions.next().await {
        if let Some((coordinates, detail)) = outcome {
            enrichment.insert(global_id.to_string(), coordinates, detail);
        }
        done += 1;
        if progress_every > 0 && done % progress_every == 0 {
            progress.report(format!("    {}/{} fetched...", done, total));
        }
    }

    info!("Resolved coordinates for {} of {} listings", enrichment.len(), total);
    progress.report(format!(
        "  Got coordinates for {}/{} listings",
        enrichment.len(),
        total
    ));
    enrichment
}
