//! Geometry parsing and measurement helpers.
//!
//! Feature services hand us `GeoJSON` geometries; everything downstream
//! works on [`MultiPolygon`]s, so polygons are promoted and any other
//! geometry type is rejected.

use geo::{BoundingRect, Centroid, Coord, MultiPolygon};
use geojson::GeoJson;
use rstar::AABB;

/// Parse a `GeoJSON` string into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
#[must_use]
pub fn parse_geojson_to_multipolygon(geojson_str: &str) -> Option<MultiPolygon<f64>> {
    let geojson: GeoJson = geojson_str.parse().ok()?;
    match geojson {
        GeoJson::Geometry(geom) => geometry_to_multipolygon(geom),
        GeoJson::Feature(feature) => feature.geometry.and_then(geometry_to_multipolygon),
        GeoJson::FeatureCollection(_) => None,
    }
}

/// Converts a `GeoJSON` geometry into a [`MultiPolygon`].
///
/// Returns `None` for non-polygonal geometries and malformed coordinates.
#[must_use]
pub fn geometry_to_multipolygon(geometry: geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

/// The point that stands in for a parcel in containment tests.
///
/// This is the area-weighted centroid; degenerate (zero-area) footprints
/// fall back to the centroid of their outline. Empty geometries have no
/// representative point.
#[must_use]
pub fn representative_point(geometry: &MultiPolygon<f64>) -> Option<Coord<f64>> {
    geometry
        .centroid()
        .map(|point| point.0)
        .filter(|c| c.x.is_finite() && c.y.is_finite())
}

/// Compute the bounding box envelope for a [`MultiPolygon`].
///
/// `None` for empty geometries.
#[must_use]
pub fn compute_envelope(mp: &MultiPolygon<f64>) -> Option<AABB<[f64; 2]>> {
    mp.bounding_rect()
        .map(|rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]))
}
