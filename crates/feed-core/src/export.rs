use crate::error::Result;
use crate::geojson::{FeatureCollection, Geometry};
use std::io::Write;

const HEADER: [&str; 14] = [
    "fundaId",
    "address",
    "price",
    "bedrooms",
    "livingArea",
    "energyLabel",
    "status",
    "ownership",
    "vveCostsMonthly",
    "erfpachtCostsMonthly",
    "wozValue",
    "longitude",
    "latitude",
    "url",
];

fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Flatten a collection into CSV rows for spreadsheet use.
pub fn write_csv<W: Write>(collection: &FeatureCollection, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(HEADER)?;

    for feature in &collection.features {
        let props = &feature.properties;
        let Geometry::Point { coordinates: [lng, lat] } = feature.geometry;
        writer.write_record([
            props.funda_id.clone(),
            props.address.clone(),
            cell(props.price),
            cell(props.bedrooms),
            cell(props.living_area),
            cell(props.energy_label.as_deref()),
            props.status.clone(),
            props.ownership.clone(),
            cell(props.vve_costs_monthly),
            cell(props.erfpacht_costs_monthly),
            cell(props.woz_value),
            lng.to_string(),
            lat.to_string(),
            props.url.clone(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
