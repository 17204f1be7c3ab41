#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Parcel, zoning region, and parcel query types.
//!
//! These are the plain data types shared by the parcel index, the zoning
//! index, the filter engine, and the feature-service normalizers. All
//! geometries share one 2D coordinate reference system; reprojection is
//! the data source's job.

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A parcel as supplied by an upstream feature service, before it is
/// loaded into a parcel index.
///
/// The identifier is optional here because upstream features can be
/// missing it; the parcel index rejects such records on load.
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelRecord {
    /// Parcel identifier (e.g. the county `PID`).
    pub parcel_id: Option<String>,
    /// Mailing or site address.
    pub address: Option<String>,
    /// Owner name.
    pub owner_name: Option<String>,
    /// Deed acreage.
    pub acres: Option<f64>,
    /// Parcel footprint.
    pub geometry: MultiPolygon<f64>,
}

/// A parcel stored in a parcel index.
///
/// Immutable once loaded. The vacancy flag is assigned by the index from
/// the external vacant-land set and is never derived from geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
    /// Unique identifier within one index snapshot.
    pub id: String,
    /// Mailing or site address.
    pub address: Option<String>,
    /// Owner name.
    pub owner_name: Option<String>,
    /// Deed acreage, if known.
    pub acres: Option<f64>,
    /// Parcel footprint.
    pub geometry: MultiPolygon<f64>,
    /// Whether the parcel appears in the vacant-land dataset.
    pub vacant: bool,
}

impl Parcel {
    /// Acreage used for thresholding. Missing acreage counts as zero.
    #[must_use]
    pub fn acres_or_zero(&self) -> f64 {
        self.acres.unwrap_or(0.0)
    }
}

/// A zoning polygon with its code and description.
///
/// Regions carry no identity of their own; they are matched by geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoningRegion {
    /// Short zoning code (e.g. `"R-3"`).
    pub code: String,
    /// Human-readable description (e.g. `"Single Family Residential"`).
    pub description: String,
    /// Region footprint.
    pub geometry: MultiPolygon<f64>,
}

impl ZoningRegion {
    /// Land use category implied by this region's zoning code.
    #[must_use]
    pub fn land_use(&self) -> LandUse {
        LandUse::from_zoning_code(&self.code)
    }
}

/// A broker's parcel search.
///
/// Every field is optional. The default query matches every parcel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParcelQuery {
    /// Case-insensitive substring of the parcel identifier.
    pub id_contains: Option<String>,
    /// Minimum deed acreage, inclusive.
    pub min_acres: f64,
    /// Maximum deed acreage, inclusive.
    pub max_acres: Option<f64>,
    /// Only return parcels flagged vacant.
    pub vacant_only: bool,
    /// Only return parcels whose resolved zoning code matches.
    pub zoning_code: Option<String>,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

impl ParcelQuery {
    #[must_use]
    pub fn with_id_contains(mut self, id: impl Into<String>) -> Self {
        self.id_contains = Some(id.into());
        self
    }

    #[must_use]
    pub const fn with_min_acres(mut self, min_acres: f64) -> Self {
        self.min_acres = min_acres;
        self
    }

    #[must_use]
    pub const fn with_max_acres(mut self, max_acres: f64) -> Self {
        self.max_acres = Some(max_acres);
        self
    }

    #[must_use]
    pub const fn with_vacant_only(mut self, vacant_only: bool) -> Self {
        self.vacant_only = vacant_only;
        self
    }

    #[must_use]
    pub fn with_zoning_code(mut self, code: impl Into<String>) -> Self {
        self.zoning_code = Some(code.into());
        self
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The id filter with surrounding whitespace removed, or `None` when
    /// unset or blank.
    #[must_use]
    pub fn id_filter(&self) -> Option<&str> {
        self.id_contains
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The zoning filter with surrounding whitespace removed, or `None`
    /// when unset or blank.
    #[must_use]
    pub fn zoning_filter(&self) -> Option<&str> {
        self.zoning_code
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Broad land use category derived from a zoning code.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LandUse {
    Residential,
    Commercial,
    Industrial,
    Agricultural,
    /// Anything the zoning code doesn't classify.
    MixedUse,
}

impl LandUse {
    /// Classifies a zoning code by its prefix family.
    ///
    /// Checked in order: residential (`R-`, `RES`), commercial (`C-`,
    /// `COM`), industrial (`I-`, `IND`), agricultural (`AG`). Matching is
    /// case-insensitive and falls back to [`LandUse::MixedUse`].
    #[must_use]
    pub fn from_zoning_code(code: &str) -> Self {
        let code = code.trim().to_ascii_uppercase();
        let has_any = |needles: &[&str]| needles.iter().any(|n| code.contains(n));

        if has_any(&["R-", "RES"]) {
            Self::Residential
        } else if has_any(&["C-", "COM"]) {
            Self::Commercial
        } else if has_any(&["I-", "IND"]) {
            Self::Industrial
        } else if has_any(&["AG"]) {
            Self::Agricultural
        } else {
            Self::MixedUse
        }
    }

    /// Human-readable label (e.g. "Mixed Use").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Residential => "Residential",
            Self::Commercial => "Commercial",
            Self::Industrial => "Industrial",
            Self::Agricultural => "Agricultural",
            Self::MixedUse => "Mixed Use",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Residential,
            Self::Commercial,
            Self::Industrial,
            Self::Agricultural,
            Self::MixedUse,
        ]
    }
}
