#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Feature-service source definitions and zoning regulation types.
//!
//! Defines the TOML schema describing where a city's parcel, vacant land,
//! and zoning layers live and how their attribute fields map onto parcel
//! and zoning records.

use serde::{Deserialize, Serialize};

/// A city's set of GIS feature services, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySource {
    /// Unique source identifier (e.g., `"charlotte"`).
    pub id: String,
    /// Human-readable name (e.g., "Charlotte, NC").
    pub name: String,
    /// City name.
    pub city: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// Parcel layer with ownership and acreage attributes.
    pub parcels: FeatureService<ParcelFieldMapping>,
    /// Vacant land layer. Only its parcel identifiers are used.
    pub vacant: FeatureService<VacantFieldMapping>,
    /// Zoning district polygons.
    pub zoning: FeatureService<ZoningFieldMapping>,
}

impl CitySource {
    /// Returns the source identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable source name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One `ArcGIS` `MapServer`/`FeatureServer` layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureService<F> {
    /// Service URL up to (not including) the layer id.
    pub url: String,
    /// Layer id within the service (default `"0"`).
    #[serde(default = "default_layer")]
    pub layer: String,
    /// `where` clause (default `"1=1"`).
    #[serde(default = "default_where", rename = "where")]
    pub where_clause: String,
    /// Attribute fields to request. Empty requests all fields.
    #[serde(default)]
    pub out_fields: Vec<String>,
    /// Maximum records to request per page (default: 1000).
    pub max_records: Option<u32>,
    /// Attribute field mapping.
    pub fields: F,
}

impl<F> FeatureService<F> {
    /// The layer's `query` endpoint.
    #[must_use]
    pub fn query_url(&self) -> String {
        format!("{}/{}/query", self.url.trim_end_matches('/'), self.layer)
    }

    /// The `outFields` parameter value.
    #[must_use]
    pub fn out_fields_param(&self) -> String {
        if self.out_fields.is_empty() {
            "*".to_string()
        } else {
            self.out_fields.join(",")
        }
    }

    /// Page size for paginated queries.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.max_records.unwrap_or(1000)
    }
}

fn default_layer() -> String {
    "0".to_string()
}

fn default_where() -> String {
    "1=1".to_string()
}

/// Attribute names for parcel records.
///
/// Each list is tried in order and the first present, non-blank value
/// wins, so one mapping can cover layers with different field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParcelFieldMapping {
    pub id: Vec<String>,
    #[serde(default)]
    pub address: Vec<String>,
    pub owner: Option<OwnerFields>,
    #[serde(default)]
    pub acres: Vec<String>,
}

/// How a layer stores the owner's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OwnerFields {
    /// One field holding the full name.
    Single { field: String },
    /// Separate first and last name fields, joined with a space.
    FirstLast { first: String, last: String },
}

/// Attribute names for the vacant land layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacantFieldMapping {
    pub id: Vec<String>,
}

/// Attribute names for zoning districts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoningFieldMapping {
    pub code: Vec<String>,
    #[serde(default)]
    pub description: Vec<String>,
}

/// Development standards for one zoning code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoningRegulation {
    /// Zoning code (e.g. `"R-3"`).
    pub code: String,
    /// Minimum lot size in acres.
    pub min_lot_acres: Option<f64>,
    /// Maximum dwelling units per acre.
    pub max_units_per_acre: Option<f64>,
    /// Maximum lot coverage as a percentage.
    pub max_coverage_pct: Option<f64>,
    /// Maximum building height in feet.
    pub max_height_ft: Option<u32>,
    pub setbacks: Setbacks,
}

impl ZoningRegulation {
    /// Whole dwelling units allowed on a lot of `acres`, if the code has
    /// a density limit.
    #[must_use]
    pub fn max_units(&self, acres: f64) -> Option<u64> {
        let density = self.max_units_per_acre?;
        if !acres.is_finite() || acres <= 0.0 {
            return Some(0);
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let units = (density * acres).floor() as u64;
        Some(units)
    }

    /// Whether a lot of `acres` meets the minimum lot size.
    #[must_use]
    pub fn meets_min_lot(&self, acres: f64) -> bool {
        self.min_lot_acres.is_none_or(|min| acres >= min)
    }
}

/// Building setbacks in feet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setbacks {
    pub front_ft: u32,
    pub side_ft: u32,
    pub rear_ft: u32,
}

impl std::fmt::Display for Setbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}ft front, {}ft sides, {}ft rear",
            self.front_ft, self.side_ft, self.rear_ft
        )
    }
}

/// File wrapper for a regulations catalogue (`[[regulation]]` tables).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulationCatalog {
    #[serde(rename = "regulation")]
    pub regulations: Vec<ZoningRegulation>,
}
