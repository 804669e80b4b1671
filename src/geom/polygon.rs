//! Footprint polygons on the ground plane.
//!
//! A footprint is an ordered, implicitly closed vertex list. Vertices are
//! stored as [`Point`]s with `z = 0`; all tests here work on `x` and `y` only.

use crate::Point;
use crate::geom::segment::length_xy;

/// Consecutive vertex pairs, including the closing edge `last -> first`.
pub fn edges(pts: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let n = pts.len();
    (0..n).map(move |i| (pts[i], pts[(i + 1) % n]))
}

/// Average of the vertices.
pub fn vertex_centroid(pts: &[Point]) -> Option<Point> {
    if pts.is_empty() {
        return None;
    }
    let n = pts.len() as f64;
    let (sx, sy) = pts.iter().fold((0., 0.), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::xy(sx / n, sy / n))
}

/// Even-odd point in polygon test on `xy`.
///
/// Points exactly on the boundary may go either way.
pub fn is_point_inside_xy(ptest: Point, pts: &[Point]) -> bool {
    if pts.len() < 3 {
        return false;
    }
    let mut inside = false;
    for (a, b) in edges(pts) {
        if (a.y > ptest.y) != (b.y > ptest.y) {
            let x_cross = a.x + (ptest.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if ptest.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Drops a trailing vertex that repeats the first one (explicitly closed rings).
pub fn open_ring(mut pts: Vec<Point>) -> Vec<Point> {
    if pts.len() >= 2 {
        let first = pts[0];
        let last = pts[pts.len() - 1];
        if length_xy(first, last) == 0.0 {
            pts.pop();
        }
    }
    pts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::xy(0., 0.),
            Point::xy(4., 0.),
            Point::xy(4., 4.),
            Point::xy(0., 4.),
        ]
    }

    #[test]
    fn test_edges_wrap_around() {
        let pts = square();
        let e: Vec<_> = edges(&pts).collect();
        assert_eq!(e.len(), 4);
        assert_eq!(e[3], (Point::xy(0., 4.), Point::xy(0., 0.)));
    }

    #[test]
    fn test_vertex_centroid() {
        let c = vertex_centroid(&square()).unwrap();
        assert!(c.is_close(&Point::xy(2., 2.)));
        assert!(vertex_centroid(&[]).is_none());
    }

    #[test]
    fn test_point_inside() {
        let pts = square();
        assert!(is_point_inside_xy(Point::xy(1., 1.), &pts));
        assert!(is_point_inside_xy(Point::new(1., 3., 99.), &pts));
        assert!(!is_point_inside_xy(Point::xy(5., 1.), &pts));
        assert!(!is_point_inside_xy(Point::xy(-0.1, 2.), &pts));
    }

    #[test]
    fn test_point_inside_concave() {
        // U-shape open towards +y
        let pts = vec![
            Point::xy(0., 0.),
            Point::xy(6., 0.),
            Point::xy(6., 6.),
            Point::xy(4., 6.),
            Point::xy(4., 2.),
            Point::xy(2., 2.),
            Point::xy(2., 6.),
            Point::xy(0., 6.),
        ];
        assert!(is_point_inside_xy(Point::xy(1., 5.), &pts));
        assert!(!is_point_inside_xy(Point::xy(3., 5.), &pts));
        assert!(is_point_inside_xy(Point::xy(3., 1.), &pts));
    }

    #[test]
    fn test_open_ring() {
        let mut pts = square();
        pts.push(Point::xy(0., 0.));
        assert_eq!(open_ring(pts).len(), 4);
        assert_eq!(open_ring(square()).len(), 4);
    }
}
