//! Zoning index: which zoning region governs a parcel.
//!
//! Regions are bulk-loaded into an R-tree keyed by bounding box. A lookup
//! narrows candidates by envelope, runs the even-odd containment test on
//! each, and keeps the candidate that was loaded first. Regions may
//! overlap in the source data, so load order is the tie-break.

use std::sync::Arc;

use arc_swap::ArcSwap;
use geo::Coord;
use land_map_parcel_models::{Parcel, ZoningRegion};
use rstar::{AABB, RTree, RTreeObject};

use crate::containment::contains_point;
use crate::geometry::{compute_envelope, representative_point};

/// A zoning region stored in the R-tree with its load position.
struct RegionEntry {
    order: usize,
    envelope: AABB<[f64; 2]>,
    region: Arc<ZoningRegion>,
}

impl RTreeObject for RegionEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// One immutable generation of the zoning index.
///
/// Readers holding a snapshot are unaffected by later loads.
pub struct ZoningSnapshot {
    tree: RTree<RegionEntry>,
}

impl ZoningSnapshot {
    fn build(regions: Vec<ZoningRegion>) -> Self {
        let mut skipped = 0usize;
        let entries: Vec<RegionEntry> = regions
            .into_iter()
            .enumerate()
            .filter_map(|(order, region)| {
                let Some(envelope) = compute_envelope(&region.geometry) else {
                    log::debug!("Zoning region {} has empty geometry, skipping", region.code);
                    skipped += 1;
                    return None;
                };
                Some(RegionEntry {
                    order,
                    envelope,
                    region: Arc::new(region),
                })
            })
            .collect();

        if skipped > 0 {
            log::warn!("Skipped {skipped} zoning regions with empty geometry");
        }

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// The first region in load order whose polygon contains `point`.
    #[must_use]
    pub fn resolve_point(&self, point: Coord<f64>) -> Option<&Arc<ZoningRegion>> {
        let query_env = AABB::from_point([point.x, point.y]);

        self.tree
            .locate_in_envelope_intersecting(&query_env)
            .filter(|entry| contains_point(&entry.region.geometry, point))
            .min_by_key(|entry| entry.order)
            .map(|entry| &entry.region)
    }

    /// The region governing `parcel`, judged at its centroid.
    #[must_use]
    pub fn resolve(&self, parcel: &Parcel) -> Option<&Arc<ZoningRegion>> {
        let point = representative_point(&parcel.geometry)?;
        self.resolve_point(point)
    }
}

/// Copy-on-write zoning index.
///
/// [`ZoningIndex::load`] builds a complete new snapshot and swaps it in;
/// concurrent readers see either the old snapshot or the new one.
pub struct ZoningIndex {
    current: ArcSwap<ZoningSnapshot>,
}

impl Default for ZoningIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoningIndex {
    /// An empty index. Every lookup resolves to `None`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(ZoningSnapshot {
                tree: RTree::new(),
            }),
        }
    }

    /// Replaces every region in the index.
    pub fn load(&self, regions: Vec<ZoningRegion>) {
        let snapshot = ZoningSnapshot::build(regions);
        log::info!("Loaded {} zoning regions into zoning index", snapshot.len());
        self.current.store(Arc::new(snapshot));
    }

    /// The current snapshot. Use this to run many lookups against one
    /// consistent generation.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ZoningSnapshot> {
        self.current.load_full()
    }

    /// The region governing `parcel`, or `None` when the parcel's centroid
    /// falls outside every region.
    #[must_use]
    pub fn resolve(&self, parcel: &Parcel) -> Option<Arc<ZoningRegion>> {
        self.current.load().resolve(parcel).cloned()
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

#[cfg(test)]
mod tests {
    use geo::{MultiPolygon, coord, polygon};

    use super::*;

    fn square(min: f64, max: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: min, y: min),
            (x: max, y: min),
            (x: max, y: max),
            (x: min, y: max),
        ]])
    }

    fn region(code: &str, geometry: MultiPolygon<f64>) -> ZoningRegion {
        ZoningRegion {
            code: code.to_string(),
            description: format!("{code} district"),
            geometry,
        }
    }

    fn parcel_at(id: &str, min: f64, max: f64) -> Parcel {
        Parcel {
            id: id.to_string(),
            address: None,
            owner_name: None,
            acres: None,
            geometry: square(min, max),
            vacant: false,
        }
    }

    #[test]
    fn first_loaded_region_wins_on_overlap() {
        let index = ZoningIndex::new();
        index.load(vec![
            region("R1", square(-5.0, 5.0)),
            region("R2", square(-10.0, 10.0)),
        ]);

        let resolved = index.resolve(&parcel_at("P", -1.0, 1.0)).unwrap();
        assert_eq!(resolved.code, "R1");
    }

    #[test]
    fn load_order_beats_tree_order() {
        let index = ZoningIndex::new();
        let mut regions: Vec<ZoningRegion> = (0..50)
            .map(|i| region(&format!("Z{i}"), square(100.0 + f64::from(i), 101.0 + f64::from(i))))
            .collect();
        regions.push(region("LATE", square(-10.0, 10.0)));
        regions.insert(10, region("EARLY", square(-1.0, 1.0)));
        index.load(regions);

        let resolved = index.resolve(&parcel_at("P", -0.5, 0.5)).unwrap();
        assert_eq!(resolved.code, "EARLY");
    }

    #[test]
    fn parcel_outside_all_regions_is_unzoned() {
        let index = ZoningIndex::new();
        index.load(vec![region("R1", square(0.0, 1.0))]);
        assert!(index.resolve(&parcel_at("P", 5.0, 6.0)).is_none());
    }

    #[test]
    fn empty_index_resolves_nothing() {
        let index = ZoningIndex::new();
        assert!(index.is_empty());
        assert!(index.resolve(&parcel_at("P", 0.0, 1.0)).is_none());
    }

    #[test]
    fn centroid_on_region_edge_is_contained() {
        let index = ZoningIndex::new();
        index.load(vec![region("EDGE", square(0.0, 2.0))]);
        // Parcel spans x in [-1, 1], so its centroid sits on the region's left edge.
        let parcel = Parcel {
            geometry: MultiPolygon(vec![polygon![
                (x: -1.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 1.0, y: 2.0),
                (x: -1.0, y: 2.0),
            ]]),
            ..parcel_at("P", 0.0, 0.0)
        };
        assert_eq!(index.resolve(&parcel).unwrap().code, "EDGE");
    }

    #[test]
    fn parcel_without_geometry_is_unzoned() {
        let index = ZoningIndex::new();
        index.load(vec![region("R1", square(-10.0, 10.0))]);
        let parcel = Parcel {
            geometry: MultiPolygon(vec![]),
            ..parcel_at("P", 0.0, 0.0)
        };
        assert!(index.resolve(&parcel).is_none());
    }

    #[test]
    fn resolve_is_deterministic() {
        let index = ZoningIndex::new();
        index.load(vec![
            region("A", square(0.0, 4.0)),
            region("B", square(2.0, 6.0)),
            region("C", square(1.0, 5.0)),
        ]);
        let parcel = parcel_at("P", 2.5, 3.5);
        let first = index.resolve(&parcel).unwrap();
        for _ in 0..10 {
            assert!(Arc::ptr_eq(&first, &index.resolve(&parcel).unwrap()));
        }
        assert_eq!(first.code, "A");
    }

    #[test]
    fn reload_replaces_regions_but_old_snapshot_survives() {
        let index = ZoningIndex::new();
        index.load(vec![region("OLD", square(-1.0, 1.0))]);
        let old = index.snapshot();

        index.load(vec![region("NEW", square(-1.0, 1.0))]);

        let point = coord! { x: 0.0, y: 0.0 };
        assert_eq!(old.resolve_point(point).unwrap().code, "OLD");
        assert_eq!(index.snapshot().resolve_point(point).unwrap().code, "NEW");
    }

    #[test]
    fn empty_geometry_regions_are_skipped() {
        let index = ZoningIndex::new();
        index.load(vec![
            region("EMPTY", MultiPolygon(vec![])),
            region("R1", square(0.0, 1.0)),
        ]);
        assert_eq!(index.len(), 1);
    }
}
