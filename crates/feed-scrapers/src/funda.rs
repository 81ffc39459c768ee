use crate::ListingSource;
use async_trait::async_trait;
use feed_core::{PriceEvent, PriceSource, RawDetail, RawListing, Result, SearchQuery, SourceError, SourceResult};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

const SEARCH_INDEX: &str = "listings-wonen-searcher-alias-prod";
const SEARCH_TEMPLATE: &str = "search_result_20250805";

#[derive(Debug, Clone)]
pub struct FundaConfig {
    pub search_url: String,
    pub detail_url: String,
    pub timeout: Duration,
    pub page_size: u32,
    pub user_agent: String,
}

impl Default for FundaConfig {
    fn default() -> Self {
        Self {
            search_url: "https://listing-search-wonen.funda.io/_msearch/template".to_string(),
            detail_url: "https://listing-detail-page.funda.io/api/v4/listing/object/nl".to_string(),
            timeout: Duration::from_secs(30),
            page_size: 15,
            user_agent: "Dart/3.9 (dart:io)".to_string(),
        }
    }
}

/// HTTP adapter for funda's listing search, detail and listing pages.
#[derive(Debug)]
pub struct FundaClient {
    client: Client,
    config: FundaConfig,
}

impl FundaClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_config(FundaConfig {
            timeout,
            ..FundaConfig::default()
        })
    }

    pub fn with_config(config: FundaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    fn search_body(&self, query: &SearchQuery, page: u32) -> String {
        let price_key = if query.offering_type == "rent" {
            "rent_price"
        } else {
            "selling_price"
        };
        let header = json!({ "index": SEARCH_INDEX });
        let params = json!({
            "id": SEARCH_TEMPLATE,
            "params": {
                "availability": ["available", "negotiations"],
                "type": ["single"],
                "zoning": ["residential"],
                "offering_type": query.offering_type,
                "selected_area": query.areas,
                "price": { price_key: { "from": query.price_min, "to": query.price_max } },
                "page": { "from": page * self.config.page_size },
            }
        });
        format!("{}\n{}\n", header, params)
    }
}

fn parse_selector(selector: &str) -> SourceResult<Selector> {
    Selector::parse(selector).map_err(|e| SourceError::Parse(e.to_string()))
}

fn text_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn string_at(value: &Value, pointer: &str) -> Option<String> {
    text_at(value, pointer).map(str::to_string)
}

/// Numbers sometimes arrive wrapped in a one-element array or as strings.
fn number_at(value: &Value, pointer: &str) -> Option<f64> {
    match value.pointer(pointer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Array(items) => items.first().and_then(|v| number_at(v, "")),
        _ => None,
    }
}

fn identity_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn street_address(source: &Value) -> Option<String> {
    let parts: Vec<&str> = ["/address/street_name", "/address/house_number", "/address/house_number_suffix"]
        .iter()
        .filter_map(|p| text_at(source, p))
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join(" "))
}

fn listing_from_hit(hit: &Value) -> Option<RawListing> {
    let source = hit.get("_source")?;
    let global_id = source
        .get("id")
        .and_then(identity_of)
        .or_else(|| hit.get("_id").and_then(identity_of))?;

    let amenities: Option<Vec<&str>> = source
        .get("amenities")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect());
    let has = |name: &str| amenities.as_ref().map(|a| a.iter().any(|item| *item == name));

    Some(RawListing {
        global_id,
        bedrooms: number_at(source, "/number_of_bedrooms").map(|n| n as u32),
        living_area: number_at(source, "/floor_area"),
        energy_label: string_at(source, "/energy_label"),
        price: number_at(source, "/price/selling_price").or_else(|| number_at(source, "/price/rent_price")),
        title: street_address(source),
        detail_url: string_at(source, "/object_detail_page_relative_url"),
        object_type: string_at(source, "/object_type"),
        construction_year: number_at(source, "/construction_year").map(|y| y as i32),
        postcode: string_at(source, "/address/postal_code"),
        neighbourhood: string_at(source, "/address/neighbourhood"),
        has_garden: has("garden"),
        has_balcony: has("balcony"),
        has_roof_terrace: has("roof_terrace"),
        publish_date: string_at(source, "/publish_date"),
    })
}

pub fn parse_search_response(body: &Value) -> SourceResult<Vec<RawListing>> {
    let hits = body
        .pointer("/responses/0/hits/hits")
        .and_then(Value::as_array)
        .ok_or_else(|| SourceError::Parse("search response has no hits".to_string()))?;
    Ok(hits.iter().filter_map(listing_from_hit).collect())
}

fn collect_characteristics(items: &[Value], into: &mut BTreeMap<String, String>) {
    for item in items {
        if let (Some(label), Some(value)) = (text_at(item, "/Label"), text_at(item, "/Value")) {
            into.entry(label.to_string()).or_insert_with(|| value.to_string());
        }
        if let Some(nested) = item.get("KenmerkenList").and_then(Value::as_array) {
            collect_characteristics(nested, into);
        }
    }
}

fn photo_urls(body: &Value) -> Vec<String> {
    let base = text_at(body, "/Media/Photos/MediaBaseUrl");
    body.pointer("/Media/Photos/Items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    string_at(item, "/Url").or_else(|| {
                        let id = text_at(item, "/Id")?;
                        base.map(|b| b.replace("{id}", id))
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn parse_detail_response(body: &Value) -> RawDetail {
    let mut characteristics = BTreeMap::new();
    if let Some(sections) = body.get("KenmerkSections").and_then(Value::as_array) {
        for section in sections {
            if let Some(items) = section.get("KenmerkenList").and_then(Value::as_array) {
                collect_characteristics(items, &mut characteristics);
            }
        }
    }

    let house_type = characteristics
        .get("Soort woonhuis")
        .or_else(|| characteristics.get("Soort appartement"))
        .cloned();

    RawDetail {
        latitude: number_at(body, "/Coordinates/Latitude"),
        longitude: number_at(body, "/Coordinates/Longitude"),
        url: string_at(body, "/Urls/FriendlyUrl/FullUrl"),
        photo_urls: photo_urls(body),
        description: string_at(body, "/ListingDescription/Description"),
        publication_date: string_at(body, "/PublicationDate"),
        house_type,
        characteristics,
        woz_value: None,
    }
}

fn parse_price(price_text: &str) -> Option<f64> {
    let whole = price_text.split(',').next().unwrap_or_default();
    let digits: String = whole.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok()
}

/// Read the price history block of a listing page, in page order.
pub fn parse_price_history(html: &str) -> SourceResult<Vec<PriceEvent>> {
    let document = Html::parse_document(html);
    let row_selector = parse_selector(".object-price-history li")?;
    let source_selector = parse_selector(".object-price-history__source")?;
    let price_selector = parse_selector(".object-price-history__price")?;

    let mut events = Vec::new();
    for row in document.select(&row_selector) {
        let label = row
            .select(&source_selector)
            .next()
            .map(|el| el.text().collect::<String>());
        let price = row
            .select(&price_selector)
            .next()
            .map(|el| el.text().collect::<String>())
            .and_then(|p| parse_price(&p));

        if let (Some(label), Some(price)) = (label, price) {
            events.push(PriceEvent {
                source: PriceSource::from_label(&label),
                price,
            });
        }
    }
    Ok(events)
}

#[async_trait]
impl ListingSource for FundaClient {
    async fn search_page(&self, query: &SearchQuery, page: u32) -> SourceResult<Vec<RawListing>> {
        debug!("Searching {:?} page {}", query.areas, page);
        let body: Value = self
            .client
            .post(&self.config.search_url)
            .header(CONTENT_TYPE, "application/x-ndjson")
            .body(self.search_body(query, page))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        parse_search_response(&body)
    }

    async fn fetch_detail(&self, global_id: &str) -> SourceResult<Option<RawDetail>> {
        let url = format!("{}/{}", self.config.detail_url.trim_end_matches('/'), global_id);
        debug!("Fetching detail: {}", url);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: Value = response.error_for_status()?.json().await?;
        Ok(Some(parse_detail_response(&body)))
    }

    async fn fetch_price_history(&self, detail_url: &str) -> SourceResult<Vec<PriceEvent>> {
        debug!("Fetching price history: {}", detail_url);
        let html = self
            .client
            .get(detail_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_price_history(&html)
    }
}
