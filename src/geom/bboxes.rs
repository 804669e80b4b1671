use crate::geom::EPS;
use crate::geom::point::Point;
use crate::geom::ray::Ray;

/// Returns the (min, max) corners of the box holding all points `pts`.
///
/// Returns `None` for an empty slice.
pub fn bounding_box(pts: &[Point]) -> Option<(Point, Point)> {
    let first = pts.first()?;
    let mut pmin = *first;
    let mut pmax = *first;
    for p in pts.iter().skip(1) {
        pmin = Point::new(pmin.x.min(p.x), pmin.y.min(p.y), pmin.z.min(p.z));
        pmax = Point::new(pmax.x.max(p.x), pmax.y.max(p.y), pmax.z.max(p.z));
    }
    Some((pmin, pmax))
}

/// Slab test: does the ray pass through the box for some `t` in `[near, far]`?
pub fn does_ray_hit_bbox(ray: &Ray, pmin: Point, pmax: Point, near: f64, far: f64) -> bool {
    let origin = [ray.origin.x, ray.origin.y, ray.origin.z];
    let dir = [ray.direction.dx, ray.direction.dy, ray.direction.dz];
    let lo = [pmin.x, pmin.y, pmin.z];
    let hi = [pmax.x, pmax.y, pmax.z];

    let mut t0 = near;
    let mut t1 = far;
    for axis in 0..3 {
        if dir[axis].abs() < 1e-12 {
            if origin[axis] < lo[axis] - EPS || origin[axis] > hi[axis] + EPS {
                return false;
            }
            continue;
        }
        let ta = (lo[axis] - origin[axis]) / dir[axis];
        let tb = (hi[axis] - origin[axis]) / dir[axis];
        t0 = t0.max(ta.min(tb));
        t1 = t1.min(ta.max(tb));
        if t0 > t1 + EPS {
            return false;
        }
    }
    true
}
