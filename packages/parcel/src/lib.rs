#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory parcel index.
//!
//! Stores every parcel fetched for a city in load order, with the vacancy
//! flag stamped onto each parcel at load time from the separate
//! vacant-land identifier set. Loads are copy-on-write: a new snapshot is
//! built off to the side and swapped in whole, so readers never observe
//! a partially loaded index.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Deref;
use std::sync::Arc;

use arc_swap::ArcSwap;
use land_map_parcel_models::{Parcel, ParcelRecord};
use thiserror::Error;

/// Errors that can occur while loading parcels.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParcelError {
    /// A record in the bulk load input had no usable identifier.
    #[error("Validation error: parcel record at position {position} has no identifier")]
    Validation {
        /// Zero-based position of the offending record in the input.
        position: usize,
    },
}

/// One immutable generation of the parcel index.
#[derive(Debug, Default)]
pub struct ParcelSnapshot {
    parcels: Vec<Arc<Parcel>>,
    /// parcel id -> position in `parcels`
    positions: BTreeMap<String, usize>,
    /// lowercased parcel id -> position of the first parcel with that id
    folded: BTreeMap<String, usize>,
    vacant_count: usize,
}

impl ParcelSnapshot {
    fn build(
        records: Vec<ParcelRecord>,
        vacant_ids: &BTreeSet<String>,
    ) -> Result<Self, ParcelError> {
        let vacant_ids: BTreeSet<&str> = vacant_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .collect();
        let mut parcels: Vec<Arc<Parcel>> = Vec::with_capacity(records.len());
        let mut positions = BTreeMap::new();
        let mut duplicates = 0usize;
        let mut bad_acreage = 0usize;

        for (position, record) in records.into_iter().enumerate() {
            let id = record
                .parcel_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .ok_or(ParcelError::Validation { position })?
                .to_string();

            let acres = record.acres.filter(|acres| acres.is_finite() && *acres >= 0.0);
            if acres.is_none() && record.acres.is_some() {
                bad_acreage += 1;
            }

            let parcel = Arc::new(Parcel {
                vacant: vacant_ids.contains(id.as_str()),
                id: id.clone(),
                address: record.address,
                owner_name: record.owner_name,
                acres,
                geometry: record.geometry,
            });

            // Later duplicates overwrite the earlier record in its original slot.
            if let Some(&existing) = positions.get(&id) {
                parcels[existing] = parcel;
                duplicates += 1;
            } else {
                positions.insert(id, parcels.len());
                parcels.push(parcel);
            }
        }

        if duplicates > 0 {
            log::warn!("{duplicates} duplicate parcel ids overwritten during load");
        }
        if bad_acreage > 0 {
            log::warn!("{bad_acreage} parcels had negative or non-finite acreage, treated as unknown");
        }

        let mut folded = BTreeMap::new();
        for (position, parcel) in parcels.iter().enumerate() {
            folded.entry(fold_case(&parcel.id)).or_insert(position);
        }

        let vacant_count = parcels.iter().filter(|p| p.vacant).count();

        Ok(Self {
            parcels,
            positions,
            folded,
            vacant_count,
        })
    }

    /// Parcels in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Parcel>> {
        self.parcels.iter()
    }

    /// Parcels whose identifier contains `needle`, ignoring case, in load
    /// order. A blank needle matches every parcel.
    pub fn by_id<'a>(&'a self, needle: &str) -> impl Iterator<Item = &'a Arc<Parcel>> {
        let needle = fold_case(needle.trim());
        self.parcels
            .iter()
            .filter(move |p| needle.is_empty() || fold_case(&p.id).contains(&needle))
    }

    /// Exact identifier lookup. Falls back to a case-insensitive match,
    /// picking the first such parcel in load order.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<Parcel>> {
        let id = id.trim();
        self.positions
            .get(id)
            .or_else(|| self.folded.get(&fold_case(id)))
            .map(|&position| &self.parcels[position])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }

    /// Number of parcels flagged vacant.
    #[must_use]
    pub const fn vacant_count(&self) -> usize {
        self.vacant_count
    }
}

/// Case folding shared by every case-insensitive identifier match.
#[must_use]
pub fn fold_case(id: &str) -> String {
    id.to_lowercase()
}

/// A read-only view of the parcels in one snapshot.
///
/// Iterating it is lazy and can be repeated; later loads into the index
/// do not affect a view that is already held.
#[derive(Debug, Clone)]
pub struct ParcelView {
    snapshot: Arc<ParcelSnapshot>,
}

impl Deref for ParcelView {
    type Target = ParcelSnapshot;

    fn deref(&self) -> &Self::Target {
        &self.snapshot
    }
}

impl<'a> IntoIterator for &'a ParcelView {
    type Item = &'a Arc<Parcel>;
    type IntoIter = std::slice::Iter<'a, Arc<Parcel>>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshot.parcels.iter()
    }
}

/// Copy-on-write parcel index.
#[derive(Debug, Default)]
pub struct ParcelIndex {
    current: ArcSwap<ParcelSnapshot>,
}

impl ParcelIndex {
    /// An empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entire index with `records`, flagging every parcel
    /// whose identifier is in `vacant_ids` as vacant.
    ///
    /// Returns the number of parcels in the new snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelError::Validation`] if any record lacks an
    /// identifier. The previously loaded snapshot stays in place.
    pub fn load(
        &self,
        records: Vec<ParcelRecord>,
        vacant_ids: &BTreeSet<String>,
    ) -> Result<usize, ParcelError> {
        let snapshot = ParcelSnapshot::build(records, vacant_ids)?;
        let len = snapshot.len();
        log::info!(
            "Loaded {len} parcels ({} vacant) into parcel index",
            snapshot.vacant_count()
        );
        self.current.store(Arc::new(snapshot));
        Ok(len)
    }

    /// Every parcel, in load order.
    #[must_use]
    pub fn all(&self) -> ParcelView {
        ParcelView {
            snapshot: self.current.load_full(),
        }
    }

    /// Parcels whose identifier contains `needle`, ignoring case.
    #[must_use]
    pub fn by_id(&self, needle: &str) -> Vec<Arc<Parcel>> {
        self.current.load().by_id(needle).cloned().collect()
    }

    /// Looks up a single parcel by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<Parcel>> {
        self.current.load().get(id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }
}
