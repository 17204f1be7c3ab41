#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Parcel filter engine.
//!
//! Evaluates a broker's [`ParcelQuery`](land_map_parcel_models::ParcelQuery)
//! against the parcel index and annotates each surviving parcel with the
//! zoning region that contains its centroid. [`LandMap`] owns both indexes
//! so callers pass one explicit value around instead of ambient state.

pub mod engine;
pub mod land_map;

pub use engine::{FilterResult, ParcelMatch, evaluate, validate};
pub use land_map::LandMap;

use thiserror::Error;

/// Errors that can occur while evaluating a query.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    /// An acreage bound was negative or non-finite.
    #[error("Invalid query: {field} must be a finite, non-negative number (got {value})")]
    InvalidQuery {
        /// Query field name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
}
