use feed_core::{FeatureCollection, FeedError, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::info;
use url::Url;

pub const PUSH_TIMEOUT: Duration = Duration::from_secs(60);

/// Where and how to deliver a finished collection.
#[derive(Debug, Clone)]
pub struct PushConfig {
    pub refresh_url: Url,
    pub secret: String,
}

impl PushConfig {
    pub fn from_parts(refresh_url: Option<String>, secret: Option<String>) -> Result<Self> {
        let refresh_url = refresh_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| FeedError::Config("REFRESH_URL not set".to_string()))?;
        let secret = secret
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FeedError::Config("REFRESH_SECRET not set".to_string()))?;

        Ok(Self {
            refresh_url: Url::parse(&refresh_url)?,
            secret,
        })
    }
}

/// POST the collection to the map service's refresh endpoint and return its
/// JSON reply.
pub async fn push(client: &Client, collection: &FeatureCollection, config: &PushConfig) -> Result<Value> {
    info!(
        "POSTing {} features to {}",
        collection.len(),
        config.refresh_url
    );

    let response = client
        .post(config.refresh_url.clone())
        .bearer_auth(&config.secret)
        .json(collection)
        .timeout(PUSH_TIMEOUT)
        .send()
        .await?;

    let status = response.status();
    if status != StatusCode::OK {
        let body = response.text().await.unwrap_or_default();
        return Err(FeedError::PushRejected {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json().await?)
}
