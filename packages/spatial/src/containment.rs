//! Even-odd point-in-polygon test with closed boundaries.
//!
//! A horizontal ray is cast from the point towards `+x` and crossings are
//! counted over every ring of every polygon (exteriors and holes alike),
//! so overlapping parts of a multi-polygon cancel out. A point lying on
//! any ring edge is contained regardless of the crossing parity.

use geo::{Coord, Intersects, Line, LineString, MultiPolygon, Polygon};

/// Returns `true` if `point` lies inside `geometry` or on its boundary.
#[must_use]
pub fn contains_point(geometry: &MultiPolygon<f64>, point: Coord<f64>) -> bool {
    let mut inside = false;

    for line in geometry.iter().flat_map(polygon_rings).flat_map(LineString::lines) {
        if line.intersects(&point) {
            return true;
        }
        if crosses_ray(line, point) {
            inside = !inside;
        }
    }

    inside
}

fn polygon_rings(polygon: &Polygon<f64>) -> impl Iterator<Item = &LineString<f64>> {
    std::iter::once(polygon.exterior()).chain(polygon.interiors())
}

/// Half-open crossing rule: an edge counts when exactly one endpoint is
/// strictly above the ray, so shared vertices are not double counted.
fn crosses_ray(line: Line<f64>, point: Coord<f64>) -> bool {
    let Line { start, end } = line;
    if (start.y > point.y) == (end.y > point.y) {
        return false;
    }
    let x_at_y = start.x + (point.y - start.y) * (end.x - start.x) / (end.y - start.y);
    point.x < x_at_y
}
