//! Listing models, acquisition criteria and GeoJSON assembly shared by the
//! funda-feed scrapers and CLI.

pub mod config;
pub mod cost;
pub mod criteria;
mod display;
pub mod error;
pub mod export;
pub mod geojson;
pub mod models;
pub mod progress;

pub use config::{Criteria, PipelineConfig, SearchQuery, DEFAULT_SITE_ORIGIN};
pub use cost::parse_monthly_cost;
pub use criteria::filter_listings;
pub use display::{create_feature_table, FeatureTableRow};
pub use error::{FeedError, Result, SourceError, SourceResult};
pub use export::write_csv;
pub use geojson::{assemble, Feature, FeatureCollection, FeatureProperties, Geometry};
pub use models::{Coordinates, Enrichment, PriceEvent, PriceSource, RawDetail, RawListing};
pub use progress::{Progress, ProgressSink};
