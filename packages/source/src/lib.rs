#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Feature-service fetching, normalization, and source registries.
//!
//! Downloads parcel, vacant land, and zoning layers from a city's `ArcGIS`
//! REST services, saves them as `GeoJSON`, and normalizes the saved
//! features into [`ParcelRecord`](land_map_parcel_models::ParcelRecord)s
//! and [`ZoningRegion`](land_map_parcel_models::ZoningRegion)s. City
//! services and zoning regulations are TOML files embedded at compile
//! time.

pub mod arcgis;
pub mod download;
pub mod normalize;
pub mod progress;
pub mod registry;
pub mod regulations;

use thiserror::Error;

/// Errors that can occur while fetching or reading feature data.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedded TOML failed to parse.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Response or file content was not what we expected.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },

    /// No registered source has this id.
    #[error("Unknown source: {id}")]
    UnknownSource {
        /// The id that was asked for.
        id: String,
    },
}
