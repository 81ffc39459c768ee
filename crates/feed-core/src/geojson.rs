use crate::cost::parse_optional_cost;
use crate::models::{Coordinates, Enrichment, RawDetail, RawListing};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The only status value a listing may carry and still be published.
pub const AVAILABLE_STATUS: &str = "Beschikbaar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionType {
    FeatureCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// `[longitude, latitude]`
    Point { coordinates: [f64; 2] },
}

impl Geometry {
    pub fn point(coordinates: Coordinates) -> Self {
        Geometry::Point {
            coordinates: [coordinates.lng, coordinates.lat],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    pub funda_id: String,
    pub price: Option<f64>,
    pub address: String,
    pub bedrooms: Option<u32>,
    pub living_area: Option<f64>,
    pub energy_label: Option<String>,
    pub object_type: Option<String>,
    pub house_type: Option<String>,
    pub construction_year: Option<i32>,
    pub postcode: Option<String>,
    pub neighbourhood: Option<String>,
    pub description: String,
    pub offered_since: Option<String>,
    pub has_garden: Option<bool>,
    pub has_balcony: Option<bool>,
    pub has_roof_terrace: Option<bool>,
    pub status: String,
    pub ownership: String,
    pub vve_costs_monthly: Option<i64>,
    pub erfpacht_costs_monthly: Option<i64>,
    pub woz_value: Option<f64>,
    /// JSON-encoded array of photo URLs.
    pub photos: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: CollectionType,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: CollectionType::FeatureCollection,
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

fn listing_url(detail: Option<&RawDetail>, listing: &RawListing, site_origin: &str) -> String {
    if let Some(url) = detail.and_then(|d| non_empty(d.url.as_deref())) {
        return url;
    }
    non_empty(listing.detail_url.as_deref())
        .map(|path| format!("{}{}", site_origin.trim_end_matches('/'), path))
        .unwrap_or_default()
}

/// Characteristic-derived fields. All empty when no detail record exists.
#[derive(Debug, Default)]
struct DerivedCharacteristics {
    status: String,
    ownership: String,
    vve_costs_monthly: Option<i64>,
    erfpacht_costs_monthly: Option<i64>,
}

fn derive_characteristics(detail: Option<&RawDetail>) -> DerivedCharacteristics {
    let Some(detail) = detail else {
        return DerivedCharacteristics::default();
    };

    let ownership = detail
        .characteristic("Eigendomssituatie")
        .or_else(|| detail.characteristic("Eigendom"))
        .unwrap_or_default()
        .to_string();

    let erfpacht = detail
        .characteristic("Erfpachtcanon")
        .filter(|v| !v.is_empty())
        .or_else(|| detail.characteristic("Canon"));

    DerivedCharacteristics {
        status: detail.characteristic("Status").unwrap_or_default().to_string(),
        ownership,
        vve_costs_monthly: parse_optional_cost(detail.characteristic("Bijdrage VvE")),
        erfpacht_costs_monthly: parse_optional_cost(erfpacht),
    }
}

/// Build one feature, or `None` when the listing is no longer available.
pub fn build_feature(
    listing: &RawListing,
    coordinates: Coordinates,
    detail: Option<&RawDetail>,
    site_origin: &str,
) -> Option<Feature> {
    let derived = derive_characteristics(detail);
    if !derived.status.is_empty() && derived.status != AVAILABLE_STATUS {
        debug!(
            "Dropping {} with status {:?}",
            listing.global_id, derived.status
        );
        return None;
    }

    let photo_urls: &[String] = detail.map(|d| d.photo_urls.as_slice()).unwrap_or_default();
    let photos = serde_json::to_string(photo_urls).unwrap_or_else(|_| "[]".to_string());

    let properties = FeatureProperties {
        funda_id: listing.global_id.clone(),
        price: listing.price,
        address: listing.title.clone().unwrap_or_default(),
        bedrooms: listing.bedrooms,
        living_area: listing.living_area,
        energy_label: non_empty(listing.energy_label.as_deref()),
        object_type: non_empty(listing.object_type.as_deref()),
        house_type: detail.and_then(|d| non_empty(d.house_type.as_deref())),
        construction_year: listing.construction_year,
        postcode: non_empty(listing.postcode.as_deref()),
        neighbourhood: non_empty(listing.neighbourhood.as_deref()),
        description: detail
            .and_then(|d| d.description.clone())
            .unwrap_or_default(),
        offered_since: detail
            .and_then(|d| non_empty(d.publication_date.as_deref()))
            .or_else(|| non_empty(listing.publish_date.as_deref())),
        has_garden: listing.has_garden,
        has_balcony: listing.has_balcony,
        has_roof_terrace: listing.has_roof_terrace,
        status: derived.status,
        ownership: derived.ownership,
        vve_costs_monthly: derived.vve_costs_monthly,
        erfpacht_costs_monthly: derived.erfpacht_costs_monthly,
        woz_value: detail.and_then(|d| d.woz_value),
        photos,
        url: listing_url(detail, listing, site_origin),
    };

    Some(Feature {
        kind: FeatureType::Feature,
        geometry: Geometry::point(coordinates),
        properties,
    })
}

/// Merge listings with their enrichment into a feature collection, keeping
/// listing order. Listings without coordinates or no longer available are
/// left out.
pub fn assemble(listings: &[RawListing], enrichment: &Enrichment, site_origin: &str) -> FeatureCollection {
    let features = listings
        .iter()
        .filter(|listing| listing.has_identity())
        .filter_map(|listing| {
            let coordinates = *enrichment.coordinates.get(&listing.global_id)?;
            let detail = enrichment.details.get(&listing.global_id);
            build_feature(listing, coordinates, detail, site_origin)
        })
        .collect();

    FeatureCollection::new(features)
}
