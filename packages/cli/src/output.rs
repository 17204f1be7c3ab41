//! Text and JSON rendering of search results.

use land_map_filter::{FilterResult, ParcelMatch};
use land_map_source_models::ZoningRegulation;
use serde::Serialize;

/// One search result as printed by `--json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelRow {
    pub id: String,
    pub address: Option<String>,
    pub owner_name: Option<String>,
    pub acres: Option<f64>,
    pub vacant: bool,
    pub zoning_code: Option<String>,
    pub zoning_description: Option<String>,
    pub land_use: Option<String>,
}

impl From<&ParcelMatch> for ParcelRow {
    fn from(m: &ParcelMatch) -> Self {
        Self {
            id: m.parcel.id.clone(),
            address: m.parcel.address.clone(),
            owner_name: m.parcel.owner_name.clone(),
            acres: m.parcel.acres,
            vacant: m.parcel.vacant,
            zoning_code: m.zoning.as_ref().map(|z| z.code.clone()),
            zoning_description: m.zoning.as_ref().map(|z| z.description.clone()),
            land_use: m.land_use().map(|l| l.label().to_string()),
        }
    }
}

/// Serializes every match as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(result: &FilterResult) -> Result<String, serde_json::Error> {
    let rows: Vec<ParcelRow> = result.iter().map(ParcelRow::from).collect();
    serde_json::to_string_pretty(&rows)
}

/// Fixed-width table, one line per match.
#[must_use]
pub fn to_table(result: &FilterResult) -> String {
    let mut out = format!(
        "{:<16} {:>9} {:<6} {:<10} {}\n",
        "PARCEL", "ACRES", "VACANT", "ZONING", "ADDRESS"
    );
    for m in result {
        let acres = m
            .parcel
            .acres
            .map_or_else(|| "-".to_string(), |a| format!("{a:.2}"));
        out.push_str(&format!(
            "{:<16} {:>9} {:<6} {:<10} {}\n",
            m.parcel.id,
            acres,
            if m.parcel.vacant { "yes" } else { "no" },
            m.zoning_code().unwrap_or("-"),
            m.parcel.address.as_deref().unwrap_or("-"),
        ));
    }
    out
}

#[must_use]
pub fn summary(result: &FilterResult) -> String {
    format!(
        "{} parcels, {:.2} total acres, {} vacant",
        result.len(),
        result.total_acres(),
        result.vacant_count()
    )
}

/// Multi-line description of one parcel and, when known, its zoning
/// regulation.
#[must_use]
pub fn details(m: &ParcelMatch, regulation: Option<&ZoningRegulation>) -> String {
    let parcel = &m.parcel;
    let mut lines = vec![
        format!("Parcel:   {}", parcel.id),
        format!("Address:  {}", parcel.address.as_deref().unwrap_or("-")),
        format!("Owner:    {}", parcel.owner_name.as_deref().unwrap_or("-")),
        format!(
            "Acres:    {}",
            parcel
                .acres
                .map_or_else(|| "-".to_string(), |a| format!("{a:.2}"))
        ),
        format!("Vacant:   {}", if parcel.vacant { "yes" } else { "no" }),
    ];

    match &m.zoning {
        Some(zoning) => {
            lines.push(format!("Zoning:   {} ({})", zoning.code, zoning.description));
            lines.push(format!("Land use: {}", zoning.land_use().label()));
        }
        None => lines.push("Zoning:   unzoned".to_string()),
    }

    if let Some(regulation) = regulation {
        if let Some(min) = regulation.min_lot_acres {
            let verdict = if regulation.meets_min_lot(parcel.acres_or_zero()) {
                "meets"
            } else {
                "below"
            };
            lines.push(format!("Min lot:  {min} acres ({verdict})"));
        }
        if let Some(units) = regulation.max_units(parcel.acres_or_zero()) {
            lines.push(format!("Max units: {units}"));
        }
        if let Some(coverage) = regulation.max_coverage_pct {
            lines.push(format!("Coverage: {coverage}% max"));
        }
        if let Some(height) = regulation.max_height_ft {
            lines.push(format!("Height:   {height}ft max"));
        }
        lines.push(format!("Setbacks: {}", regulation.setbacks));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use geo::MultiPolygon;
    use land_map_parcel_models::{Parcel, ZoningRegion};
    use land_map_source_models::Setbacks;

    use super::*;

    fn parcel_match(zoned: bool) -> ParcelMatch {
        ParcelMatch {
            parcel: Arc::new(Parcel {
                id: "04512101".to_string(),
                address: Some("123 Main St".to_string()),
                owner_name: None,
                acres: Some(5.2),
                geometry: MultiPolygon(vec![]),
                vacant: true,
            }),
            zoning: zoned.then(|| {
                Arc::new(ZoningRegion {
                    code: "R-3".to_string(),
                    description: "Single Family".to_string(),
                    geometry: MultiPolygon(vec![]),
                })
            }),
        }
    }

    #[test]
    fn row_carries_zoning_and_land_use() {
        let row = ParcelRow::from(&parcel_match(true));
        assert_eq!(row.zoning_code.as_deref(), Some("R-3"));
        assert_eq!(row.land_use.as_deref(), Some("Residential"));
        assert!(row.vacant);

        let row = ParcelRow::from(&parcel_match(false));
        assert!(row.zoning_code.is_none());
        assert!(row.land_use.is_none());
    }

    #[test]
    fn row_json_is_camel_case() {
        let json = serde_json::to_value(ParcelRow::from(&parcel_match(true))).unwrap();
        assert_eq!(json["zoningCode"], "R-3");
        assert_eq!(json["ownerName"], serde_json::Value::Null);
    }

    #[test]
    fn details_include_regulation() {
        let regulation = ZoningRegulation {
            code: "R-3".to_string(),
            min_lot_acres: Some(0.5),
            max_units_per_acre: Some(2.0),
            max_coverage_pct: None,
            max_height_ft: Some(35),
            setbacks: Setbacks {
                front_ft: 20,
                side_ft: 8,
                rear_ft: 20,
            },
        };
        let text = details(&parcel_match(true), Some(&regulation));
        assert!(text.contains("Zoning:   R-3 (Single Family)"), "{text}");
        assert!(text.contains("Max units: 10"), "{text}");
        assert!(text.contains("20ft front, 8ft sides, 20ft rear"), "{text}");

        let text = details(&parcel_match(false), None);
        assert!(text.contains("unzoned"), "{text}");
    }
}
