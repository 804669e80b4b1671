//! Line segment operations on the ground plane.
//!
//! Footprints live in the `xy` plane, so the tests here ignore `z`.

use crate::Point;
use crate::geom::EPS;

/// Intersection of segments `p1->p2` and `p3->p4` projected onto `xy`.
///
/// Returns `Some((s, u))` where `s` is the parameter along the first segment
/// and `u` along the second (both in `[0, 1]`). Parallel and collinear
/// segments return `None`.
pub fn segment_intersection_xy(p1: Point, p2: Point, p3: Point, p4: Point) -> Option<(f64, f64)> {
    let (d1x, d1y) = (p2.x - p1.x, p2.y - p1.y);
    let (d2x, d2y) = (p4.x - p3.x, p4.y - p3.y);

    let denom = d1x * d2y - d1y * d2x;
    if denom.abs() < EPS {
        return None;
    }

    let (rx, ry) = (p3.x - p1.x, p3.y - p1.y);
    let s = (rx * d2y - ry * d2x) / denom;
    let u = (rx * d1y - ry * d1x) / denom;

    let range = -EPS..=1.0 + EPS;
    if range.contains(&s) && range.contains(&u) {
        Some((s.clamp(0.0, 1.0), u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Length of the segment `p1->p2` projected onto `xy`.
pub fn length_xy(p1: Point, p2: Point) -> f64 {
    (p2.x - p1.x).hypot(p2.y - p1.y)
}
