#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory spatial index for zoning attribution.
//!
//! Holds zoning polygons in an R-tree and answers "which zoning region
//! governs this parcel" with a centroid-in-polygon join. Also provides
//! the `GeoJSON` geometry helpers shared by the feature-service
//! normalizers.

pub mod containment;
pub mod geometry;
pub mod zoning;

pub use containment::contains_point;
pub use geometry::{geometry_to_multipolygon, parse_geojson_to_multipolygon, representative_point};
pub use zoning::{ZoningIndex, ZoningSnapshot};
