//! The owned pair of indexes a map view queries against.

use std::collections::BTreeSet;

use land_map_parcel::{ParcelError, ParcelIndex, ParcelView};
use land_map_parcel_models::{ParcelQuery, ParcelRecord, ZoningRegion};
use land_map_spatial::ZoningIndex;

use crate::FilterError;
use crate::engine::{self, FilterResult, ParcelMatch};

/// Parcel index plus zoning index, loaded independently and joined only
/// at query time.
#[derive(Default)]
pub struct LandMap {
    parcels: ParcelIndex,
    zoning: ZoningIndex,
}

impl LandMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all parcels. See [`ParcelIndex::load`].
    ///
    /// # Errors
    ///
    /// Returns [`ParcelError::Validation`] if any record lacks an
    /// identifier; the previous parcels stay loaded.
    pub fn load_parcels(
        &self,
        records: Vec<ParcelRecord>,
        vacant_ids: &BTreeSet<String>,
    ) -> Result<usize, ParcelError> {
        self.parcels.load(records, vacant_ids)
    }

    /// Replaces all zoning regions.
    pub fn load_zoning(&self, regions: Vec<ZoningRegion>) {
        self.zoning.load(regions);
    }

    #[must_use]
    pub const fn parcels(&self) -> &ParcelIndex {
        &self.parcels
    }

    #[must_use]
    pub const fn zoning(&self) -> &ZoningIndex {
        &self.zoning
    }

    /// Every loaded parcel, in load order.
    #[must_use]
    pub fn all(&self) -> ParcelView {
        self.parcels.all()
    }

    /// Evaluates `query` against the current snapshots of both indexes.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidQuery`] if the acreage bounds are
    /// negative or non-finite.
    pub fn search(&self, query: &ParcelQuery) -> Result<FilterResult, FilterError> {
        let parcels = self.parcels.all();
        let zoning = self.zoning.snapshot();
        engine::evaluate(&parcels, &zoning, query)
    }

    /// A single parcel with its zoning, by identifier.
    #[must_use]
    pub fn details(&self, parcel_id: &str) -> Option<ParcelMatch> {
        let parcel = self.parcels.get(parcel_id)?;
        let zoning = self.zoning.resolve(&parcel);
        Some(ParcelMatch { parcel, zoning })
    }
}
