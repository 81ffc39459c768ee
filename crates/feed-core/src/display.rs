use crate::geojson::{Feature, FeatureCollection};
use tabled::settings::{object::Columns, Modify, Style, Width};
use tabled::{Table, Tabled};

#[derive(Tabled)]
pub struct FeatureTableRow {
    #[tabled(rename = "Address")]
    pub address: String,
    #[tabled(rename = "Price", display_with = "display_right_10")]
    pub price: String,
    #[tabled(rename = "Size (m²)", display_with = "display_right_8")]
    pub size: String,
    #[tabled(rename = "Beds", display_with = "display_right_5")]
    pub bedrooms: String,
    #[tabled(rename = "Label")]
    pub energy_label: String,
    #[tabled(rename = "VvE/mo", display_with = "display_right_8")]
    pub vve: String,
    #[tabled(rename = "WOZ", display_with = "display_right_10")]
    pub woz: String,
    #[tabled(rename = "URL")]
    pub url: String,
}

fn display_right_10(s: &str) -> String {
    format!("{:>10}", s)
}

fn display_right_8(s: &str) -> String {
    format!("{:>8}", s)
}

fn display_right_5(s: &str) -> String {
    format!("{:>5}", s)
}

fn euros(amount: Option<f64>) -> String {
    amount
        .map(|a| format!("€{}k", (a / 1000.0).round() as i64))
        .unwrap_or_else(|| "N/A".to_string())
}

impl FeatureTableRow {
    pub fn from_feature(feature: &Feature) -> Self {
        let props = &feature.properties;
        Self {
            address: props.address.clone(),
            price: euros(props.price),
            size: props
                .living_area
                .map(|s| format!("{}m²", s.round() as i64))
                .unwrap_or_else(|| "N/A".to_string()),
            bedrooms: props
                .bedrooms
                .map(|b| b.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            energy_label: props.energy_label.clone().unwrap_or_else(|| "-".to_string()),
            vve: props
                .vve_costs_monthly
                .map(|c| format!("€{}", c))
                .unwrap_or_else(|| "-".to_string()),
            woz: euros(props.woz_value),
            url: props.url.clone(),
        }
    }
}

pub fn create_feature_table(collection: &FeatureCollection) -> String {
    let rows: Vec<FeatureTableRow> = collection
        .features
        .iter()
        .map(FeatureTableRow::from_feature)
        .collect();

    let mut table = Table::new(&rows);
    table
        .with(Style::modern())
        .with(Modify::new(Columns::single(0)).with(Width::truncate(40)))
        .with(Modify::new(Columns::single(7)).with(Width::wrap(60)));

    table.to_string()
}
