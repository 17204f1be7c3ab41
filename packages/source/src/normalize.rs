//! Normalizes raw `GeoJSON` features into parcel and zoning records.
//!
//! Uses the source's field mappings to pull identifiers, owners, acreage,
//! and zoning codes out of each feature's `properties`, regardless of the
//! layer-specific field naming.

use std::collections::BTreeSet;

use land_map_parcel_models::{ParcelRecord, ZoningRegion};
use land_map_source_models::{
    OwnerFields, ParcelFieldMapping, VacantFieldMapping, ZoningFieldMapping,
};
use land_map_spatial::geometry_to_multipolygon;

/// Normalizes parcel features.
///
/// Skips features without polygon geometry or without an identifier.
#[must_use]
pub fn normalize_parcels(
    features: &[serde_json::Value],
    fields: &ParcelFieldMapping,
) -> Vec<ParcelRecord> {
    let mut missing_id = 0usize;
    let mut missing_geometry = 0usize;

    let records: Vec<ParcelRecord> = features
        .iter()
        .filter_map(|feature| {
            let props = feature.get("properties");
            let Some(parcel_id) = first_string(props, &fields.id) else {
                missing_id += 1;
                return None;
            };
            let Some(geometry) = feature_geometry(feature) else {
                log::debug!("Parcel {parcel_id} has no polygon geometry, skipping");
                missing_geometry += 1;
                return None;
            };

            Some(ParcelRecord {
                parcel_id: Some(parcel_id),
                address: first_string(props, &fields.address),
                owner_name: fields
                    .owner
                    .as_ref()
                    .and_then(|owner| owner_name(props, owner)),
                acres: fields
                    .acres
                    .iter()
                    .find_map(|field| props?.get(field).and_then(parse_acres)),
                geometry,
            })
        })
        .collect();

    if missing_id > 0 {
        log::warn!("Skipped {missing_id} parcel features without an identifier");
    }
    if missing_geometry > 0 {
        log::warn!("Skipped {missing_geometry} parcel features without polygon geometry");
    }
    log::info!("Normalized {} parcels", records.len());

    records
}

/// Collects the parcel identifiers of the vacant land layer.
#[must_use]
pub fn normalize_vacant_ids(
    features: &[serde_json::Value],
    fields: &VacantFieldMapping,
) -> BTreeSet<String> {
    features
        .iter()
        .filter_map(|feature| first_string(feature.get("properties"), &fields.id))
        .collect()
}

/// Normalizes zoning district features.
///
/// Skips features without a zoning code or polygon geometry.
#[must_use]
pub fn normalize_zoning(
    features: &[serde_json::Value],
    fields: &ZoningFieldMapping,
) -> Vec<ZoningRegion> {
    let regions: Vec<ZoningRegion> = features
        .iter()
        .filter_map(|feature| {
            let props = feature.get("properties");
            let code = first_string(props, &fields.code)?;
            let geometry = feature_geometry(feature)?;
            Some(ZoningRegion {
                code,
                description: first_string(props, &fields.description).unwrap_or_default(),
                geometry,
            })
        })
        .collect();

    let skipped = features.len() - regions.len();
    if skipped > 0 {
        log::warn!("Skipped {skipped} zoning features without a code or polygon geometry");
    }

    regions
}

fn feature_geometry(feature: &serde_json::Value) -> Option<geo::MultiPolygon<f64>> {
    let geom = feature.get("geometry")?;
    if geom.is_null() {
        return None;
    }
    let geometry = geojson::Geometry::from_json_value(geom.clone()).ok()?;
    geometry_to_multipolygon(geometry).filter(|mp| !mp.0.is_empty())
}

/// The first of `fields` holding a non-blank string or a number.
fn first_string(props: Option<&serde_json::Value>, fields: &[String]) -> Option<String> {
    let props = props?;
    fields
        .iter()
        .find_map(|field| props.get(field).and_then(value_to_string))
}

fn value_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.trim())
            .filter(|s| !s.is_empty())
            .map(ToString::to_string),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn owner_name(props: Option<&serde_json::Value>, owner: &OwnerFields) -> Option<String> {
    match owner {
        OwnerFields::Single { field } => first_string(props, std::slice::from_ref(field)),
        OwnerFields::FirstLast { first, last } => {
            let first = first_string(props, std::slice::from_ref(first));
            let last = first_string(props, std::slice::from_ref(last));
            match (first, last) {
                (Some(first), Some(last)) => Some(format!("{first} {last}")),
                (Some(name), None) | (None, Some(name)) => Some(name),
                (None, None) => None,
            }
        }
    }
}

/// Parses an acreage attribute. Accepts numbers and numeric strings;
/// negative or non-finite values are treated as missing.
fn parse_acres(value: &serde_json::Value) -> Option<f64> {
    let acres = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (acres.is_finite() && acres >= 0.0).then_some(acres)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn square() -> serde_json::Value {
        json!({
            "type": "Polygon",
            "coordinates": [[[-80.9, 35.2], [-80.8, 35.2], [-80.8, 35.3], [-80.9, 35.3], [-80.9, 35.2]]]
        })
    }

    fn parcel_fields() -> ParcelFieldMapping {
        ParcelFieldMapping {
            id: vec!["PID".to_string(), "parcel_id".to_string()],
            address: vec!["Mailing_Address".to_string(), "address".to_string()],
            owner: Some(OwnerFields::FirstLast {
                first: "Owner_FirstName".to_string(),
                last: "Owner_LastName".to_string(),
            }),
            acres: vec!["Total_Acreage".to_string(), "acres".to_string()],
        }
    }

    #[test]
    fn normalizes_parcel_feature() {
        let features = vec![json!({
            "type": "Feature",
            "properties": {
                "PID": " 04512101 ",
                "Mailing_Address": "123 Main St",
                "Owner_FirstName": "Jane",
                "Owner_LastName": "Doe",
                "Total_Acreage": "5.2"
            },
            "geometry": square()
        })];

        let records = normalize_parcels(&features, &parcel_fields());
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.parcel_id.as_deref(), Some("04512101"));
        assert_eq!(record.address.as_deref(), Some("123 Main St"));
        assert_eq!(record.owner_name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.acres, Some(5.2));
        assert_eq!(record.geometry.0.len(), 1);
    }

    #[test]
    fn falls_back_to_secondary_fields() {
        let features = vec![json!({
            "properties": { "parcel_id": 778, "address": "9 Oak Ave", "acres": 1.25, "Owner_LastName": "Smith" },
            "geometry": square()
        })];

        let records = normalize_parcels(&features, &parcel_fields());
        assert_eq!(records[0].parcel_id.as_deref(), Some("778"));
        assert_eq!(records[0].address.as_deref(), Some("9 Oak Ave"));
        assert_eq!(records[0].owner_name.as_deref(), Some("Smith"));
        assert_eq!(records[0].acres, Some(1.25));
    }

    #[test]
    fn skips_features_without_id_or_geometry() {
        let features = vec![
            json!({ "properties": { "PID": "" }, "geometry": square() }),
            json!({ "properties": { "PID": "A" }, "geometry": null }),
            json!({ "properties": { "PID": "B" }, "geometry": { "type": "Point", "coordinates": [0, 0] } }),
            json!({ "properties": { "PID": "C" }, "geometry": square() }),
        ];
        let records = normalize_parcels(&features, &parcel_fields());
        let ids: Vec<_> = records.iter().filter_map(|r| r.parcel_id.as_deref()).collect();
        assert_eq!(ids, vec!["C"]);
    }

    #[test]
    fn rejects_bad_acreage() {
        assert_eq!(parse_acres(&json!("-3")), None);
        assert_eq!(parse_acres(&json!("abc")), None);
        assert_eq!(parse_acres(&json!(null)), None);
        assert_eq!(parse_acres(&json!(" 2.5 ")), Some(2.5));
        assert_eq!(parse_acres(&json!(0)), Some(0.0));
    }

    #[test]
    fn single_owner_field() {
        let props = json!({ "OWNER": "ACME LAND LLC" });
        let owner = OwnerFields::Single {
            field: "OWNER".to_string(),
        };
        assert_eq!(
            owner_name(Some(&props), &owner).as_deref(),
            Some("ACME LAND LLC")
        );
    }

    #[test]
    fn collects_vacant_ids() {
        let features = vec![
            json!({ "properties": { "PID": "B" } }),
            json!({ "properties": { "PID": "A" } }),
            json!({ "properties": { "PID": "A" } }),
            json!({ "properties": {} }),
        ];
        let ids = normalize_vacant_ids(
            &features,
            &VacantFieldMapping {
                id: vec!["PID".to_string()],
            },
        );
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn normalizes_zoning_features() {
        let fields = ZoningFieldMapping {
            code: vec!["ZoneDes".to_string()],
            description: vec!["ZoneDesc".to_string()],
        };
        let features = vec![
            json!({ "properties": { "ZoneDes": "R-3", "ZoneDesc": "Single Family" }, "geometry": square() }),
            json!({ "properties": { "ZoneDes": "C-1" }, "geometry": square() }),
            json!({ "properties": { "ZoneDesc": "No code" }, "geometry": square() }),
        ];
        let regions = normalize_zoning(&features, &fields);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].code, "R-3");
        assert_eq!(regions[0].description, "Single Family");
        assert_eq!(regions[1].description, "");
    }
}
