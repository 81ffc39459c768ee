pub mod enrich;
pub mod funda;
pub mod paginate;
pub mod pipeline;

use async_trait::async_trait;
use feed_core::{PriceEvent, RawDetail, RawListing, SearchQuery, SourceResult};

pub use enrich::enrich;
pub use funda::{FundaClient, FundaConfig};
pub use paginate::{fetch_all, PageResult};
pub use pipeline::Pipeline;

/// The three operations the pipeline needs from a listing website.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch one page of search results. Page numbering is whatever the
    /// backend accepts; the paginator starts at zero.
    async fn search_page(&self, query: &SearchQuery, page: u32) -> SourceResult<Vec<RawListing>>;

    /// Fetch the detail record for one listing. `Ok(None)` means the listing
    /// no longer exists.
    async fn fetch_detail(&self, global_id: &str) -> SourceResult<Option<RawDetail>>;

    /// Fetch the price history shown on a listing page, oldest first.
    async fn fetch_price_history(&self, detail_url: &str) -> SourceResult<Vec<PriceEvent>>;
}
