//! Downloads a city's layers to disk and reads them back.
//!
//! Each layer is saved as a `GeoJSON` `FeatureCollection` under the city's
//! data directory, so searches can run offline against the last download.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use land_map_parcel_models::{ParcelRecord, ZoningRegion};
use land_map_source_models::CitySource;

use crate::SourceError;
use crate::arcgis;
use crate::normalize::{normalize_parcels, normalize_vacant_ids, normalize_zoning};
use crate::progress::ProgressCallback;

pub const PARCELS_FILE: &str = "parcels.geojson";
pub const VACANT_FILE: &str = "vacant.geojson";
pub const ZONING_FILE: &str = "zoning.geojson";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Normalized contents of a city's three layers.
#[derive(Debug, Clone, Default)]
pub struct CityLayers {
    pub parcels: Vec<ParcelRecord>,
    pub vacant_ids: BTreeSet<String>,
    pub zoning: Vec<ZoningRegion>,
}

/// Builds the HTTP client used for feature-service requests.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if the TLS backend fails to initialize.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, SourceError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Fetches the parcel, vacant land, and zoning layers of `source` and
/// writes them into `dir`. Returns `dir`.
///
/// `progress` is called once per layer with a label and returns the
/// callback that layer reports to.
///
/// # Errors
///
/// Returns [`SourceError`] if any request or file write fails.
pub async fn download_city(
    client: &reqwest::Client,
    source: &CitySource,
    dir: &Path,
    progress: impl Fn(&str) -> Arc<dyn ProgressCallback>,
) -> Result<PathBuf, SourceError> {
    std::fs::create_dir_all(dir)?;

    log::info!("{}: fetching parcels", source.name);
    let parcels = arcgis::fetch_features(client, &source.parcels, &progress("Parcels")).await?;
    write_features(&dir.join(PARCELS_FILE), parcels)?;

    log::info!("{}: fetching vacant land", source.name);
    let vacant = arcgis::fetch_features(client, &source.vacant, &progress("Vacant land")).await?;
    write_features(&dir.join(VACANT_FILE), vacant)?;

    log::info!("{}: fetching zoning", source.name);
    let zoning = arcgis::fetch_features(client, &source.zoning, &progress("Zoning")).await?;
    write_features(&dir.join(ZONING_FILE), zoning)?;

    Ok(dir.to_path_buf())
}

/// Writes `features` as a `GeoJSON` `FeatureCollection`.
///
/// # Errors
///
/// Returns [`SourceError`] if serialization or the write fails.
pub fn write_features(path: &Path, features: Vec<serde_json::Value>) -> Result<(), SourceError> {
    let collection = serde_json::json!({
        "type": "FeatureCollection",
        "features": features,
    });
    std::fs::write(path, serde_json::to_string(&collection)?)?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

/// Reads the features of a saved `GeoJSON` `FeatureCollection`.
///
/// # Errors
///
/// Returns [`SourceError`] if the file can't be read or has no
/// `features` array.
pub fn read_features(path: &Path) -> Result<Vec<serde_json::Value>, SourceError> {
    let body = std::fs::read_to_string(path)?;
    let mut json: serde_json::Value = serde_json::from_str(&body)?;

    match json.get_mut("features").map(serde_json::Value::take) {
        Some(serde_json::Value::Array(features)) => Ok(features),
        _ => Err(SourceError::Conversion {
            message: format!("No features array in {}", path.display()),
        }),
    }
}

/// Reads and normalizes the layers saved in `dir`.
///
/// The parcel layer is required. A missing vacant or zoning file is
/// logged and treated as empty.
///
/// # Errors
///
/// Returns [`SourceError`] if the parcel layer is missing or any present
/// layer is malformed.
pub fn load_city_layers(source: &CitySource, dir: &Path) -> Result<CityLayers, SourceError> {
    let parcels = read_features(&dir.join(PARCELS_FILE))?;
    let parcels = normalize_parcels(&parcels, &source.parcels.fields);

    let vacant_ids = read_optional(&dir.join(VACANT_FILE))?
        .map(|features| normalize_vacant_ids(&features, &source.vacant.fields))
        .unwrap_or_default();

    let zoning = read_optional(&dir.join(ZONING_FILE))?
        .map(|features| normalize_zoning(&features, &source.zoning.fields))
        .unwrap_or_default();

    Ok(CityLayers {
        parcels,
        vacant_ids,
        zoning,
    })
}

fn read_optional(path: &Path) -> Result<Option<Vec<serde_json::Value>>, SourceError> {
    if path.exists() {
        read_features(path).map(Some)
    } else {
        log::warn!("{} not found, treating layer as empty", path.display());
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::registry::find_source;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("land_map_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn polygon(x: f64) -> serde_json::Value {
        json!({
            "type": "Polygon",
            "coordinates": [[[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 1.0], [x, 0.0]]]
        })
    }

    #[test]
    fn write_then_read_features() {
        let dir = temp_dir("roundtrip");
        let path = dir.join("layer.geojson");
        write_features(&path, vec![json!({ "properties": { "PID": "1" } })]).unwrap();
        let features = read_features(&path).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["properties"]["PID"], "1");
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn read_rejects_non_collection() {
        let dir = temp_dir("not_collection");
        let path = dir.join("bad.geojson");
        std::fs::write(&path, r#"{"type":"Point","coordinates":[0,0]}"#).unwrap();
        assert!(matches!(
            read_features(&path),
            Err(SourceError::Conversion { .. })
        ));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn loads_saved_city_layers() {
        let source = find_source("charlotte").unwrap();
        let dir = temp_dir("city");

        write_features(
            &dir.join(PARCELS_FILE),
            vec![
                json!({ "properties": { "PID": "A", "Total_Acreage": 2.0 }, "geometry": polygon(0.0) }),
                json!({ "properties": { "PID": "B", "Total_Acreage": 0.5 }, "geometry": polygon(5.0) }),
            ],
        )
        .unwrap();
        write_features(
            &dir.join(VACANT_FILE),
            vec![json!({ "properties": { "PID": "B" } })],
        )
        .unwrap();

        let layers = load_city_layers(&source, &dir).unwrap();
        assert_eq!(layers.parcels.len(), 2);
        assert!(layers.vacant_ids.contains("B"));
        assert!(layers.zoning.is_empty(), "missing zoning file is empty");

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn missing_parcel_layer_is_an_error() {
        let source = find_source("charlotte").unwrap();
        let dir = temp_dir("missing");
        assert!(matches!(
            load_city_layers(&source, &dir),
            Err(SourceError::Io(_))
        ));
        std::fs::remove_dir_all(dir).ok();
    }
}
