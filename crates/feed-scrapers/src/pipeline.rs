use crate::{enrich, fetch_all, ListingSource};
use feed_core::{assemble, filter_listings, FeatureCollection, PipelineConfig, Progress, ProgressSink, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Search, filter, enrich and assemble in one pass.
pub struct Pipeline {
    source: Arc<dyn ListingSource>,
    config: PipelineConfig,
    progress: Progress,
}

impl Pipeline {
    pub fn new(source: Arc<dyn ListingSource>, config: PipelineConfig) -> Self {
        Self {
            source,
            config,
            progress: Progress::silent(),
        }
    }

    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = Progress::new(sink);
        self
    }

    /// Run every stage. Only search failures abort the run; per-listing
    /// enrichment failures just leave that listing out.
    pub async fn run(&self, known_ids: Option<&HashSet<String>>) -> Result<FeatureCollection> {
        let source = self.source.as_ref();
        let config = &self.config;

        self.progress.report("Fetching Funda listings...");
        let listings = fetch_all(source, &config.search, config.page_delay, &self.progress).await?;

        let filtered = filter_listings(listings, &config.criteria, &self.progress);

        let enrichment = enrich(
            source,
            &filtered,
            known_ids,
            config.workers,
            config.progress_every,
            &self.progress,
        )
        .await;

        let collection = assemble(&filtered, &enrichment, &config.site_origin);
        info!(
            "Assembled {} features from {} candidates",
            collection.len(),
            filtered.len()
        );
        self.progress
            .report(format!("  {} features with coordinates", collection.len()));
        Ok(collection)
    }
}
