use crate::ListingSource;
use feed_core::{Progress, RawListing, Result, SearchQuery, SourceError, SourceResult};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};

/// Outcome of one search page request.
#[derive(Debug)]
pub enum PageResult {
    Listings(Vec<RawListing>),
    /// The backend rejected the page index, which usually means we walked
    /// past the last page.
    Boundary(SourceError),
    Failed(SourceError),
}

impl From<SourceResult<Vec<RawListing>>> for PageResult {
    fn from(result: SourceResult<Vec<RawListing>>) -> Self {
        match result {
            Ok(listings) => PageResult::Listings(listings),
            Err(e) if e.is_page_boundary() => PageResult::Boundary(e),
            Err(e) => PageResult::Failed(e),
        }
    }
}

#[derive(Default)]
struct Accumulator {
    seen: HashSet<String>,
    listings: Vec<RawListing>,
}

impl Accumulator {
    fn merge(&mut self, page: Vec<RawListing>) -> usize {
        let before = self.listings.len();
        for listing in page {
            if listing.has_identity() && self.seen.insert(listing.global_id.clone()) {
                self.listings.push(listing);
            }
        }
        self.listings.len() - before
    }
}

/// Walk the search results page by page until the backend runs out,
/// returning each listing once in first-seen order.
pub async fn fetch_all(
    source: &dyn ListingSource,
    query: &SearchQuery,
    page_delay: Duration,
    progress: &Progress,
) -> Result<Vec<RawListing>> {
    let mut acc = Accumulator::default();
    let mut page: u32 = 0;
    let mut fetched_any_page = false;
    let mut tried_one_based = false;

    loop {
        progress.report(format!("  Fetching page {}...", page));
        debug!("Requesting search page {} for {:?}", page, query.areas);

        match PageResult::from(source.search_page(query, page).await) {
            PageResult::Listings(listings) if listings.is_empty() => {
                debug!("Page {} was empty, stopping", page);
                break;
            }
            PageResult::Listings(listings) => {
                fetched_any_page = true;
                let count = listings.len();
                let added = acc.merge(listings);
                debug!("Page {}: {} listings, {} new", page, count, added);
                page += 1;
                tokio::time::sleep(page_delay).await;
            }
            PageResult::Boundary(_) if page == 0 && !fetched_any_page && !tried_one_based => {
                tried_one_based = true;
                page = 1;
                progress.report("  Page 0 returned 400, retrying with one-based paging at page 1...");
            }
            PageResult::Boundary(_) if fetched_any_page => {
                progress.report(format!(
                    "  Reached last page at page {} (page {} returned 400)",
                    page - 1,
                    page
                ));
                break;
            }
            PageResult::Boundary(e) | PageResult::Failed(e) => return Err(e.into()),
        }
    }

    info!("Fetched {} unique listings over {} pages", acc.listings.len(), page);
    progress.report(format!("  Fetched {} total unique listings", acc.listings.len()));
    Ok(acc.listings)
}
