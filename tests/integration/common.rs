use async_trait::async_trait;
use feed_core::{PriceEvent, RawDetail, RawListing, SearchQuery, SourceResult};
use feed_scrapers::ListingSource;
use std::collections::HashMap;
use std::sync::Mutex;

/// A listing source backed by in-memory pages and detail records.
#[derive(Default)]
pub struct InMemorySource {
    pub pages: Vec<SourceResult<Vec<RawListing>>>,
    pub details: HashMap<String, SourceResult<Option<RawDetail>>>,
    pub histories: HashMap<String, SourceResult<Vec<PriceEvent>>>,
    pub requested_pages: Mutex<Vec<u32>>,
    pub history_requests: Mutex<Vec<String>>,
}

impl InMemorySource {
    pub fn with_page(mut self, listings: Vec<RawListing>) -> Self {
        self.pages.push(Ok(listings));
        self
    }

    pub fn with_detail(mut self, id: &str, detail: RawDetail) -> Self {
        self.details.insert(id.to_string(), Ok(Some(detail)));
        self
    }

    pub fn with_detail_result(mut self, id: &str, result: SourceResult<Option<RawDetail>>) -> Self {
        self.details.insert(id.to_string(), result);
        self
    }

    pub fn with_history(mut self, url: &str, events: Vec<PriceEvent>) -> Self {
        self.histories.insert(url.to_string(), Ok(events));
        self
    }
}

#[async_trait]
impl ListingSource for InMemorySource {
    async fn search_page(&self, _query: &SearchQuery, page: u32) -> SourceResult<Vec<RawListing>> {
        self.requested_pages.lock().unwrap().push(page);
        self.pages
            .get(page as usize)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn fetch_detail(&self, global_id: &str) -> SourceResult<Option<RawDetail>> {
        self.details.get(global_id).cloned().unwrap_or(Ok(None))
    }

    async fn fetch_price_history(&self, detail_url: &str) -> SourceResult<Vec<PriceEvent>> {
        self.history_requests.lock().unwrap().push(detail_url.to_string());
        self.histories
            .get(detail_url)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub fn candidate(id: &str) -> RawListing {
    RawListing {
        bedrooms: Some(3),
        living_area: Some(85.0),
        energy_label: Some("A".to_string()),
        price: Some(499_000.0),
        title: Some(format!("Teststraat {}", id)),
        detail_url: Some(format!("/detail/koop/amsterdam/huis-teststraat/{}/", id)),
        ..RawListing::new(id)
    }
}

pub fn located(lat: f64, lng: f64) -> RawDetail {
    RawDetail {
        latitude: Some(lat),
        longitude: Some(lng),
        ..Default::default()
    }
}
