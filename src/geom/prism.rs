//! Vertical extrusion of a footprint polygon.

use anyhow::{Result, anyhow};

use crate::Point;
use crate::geom::bboxes::{bounding_box, does_ray_hit_bbox};
use crate::geom::polygon::{edges, is_point_inside_xy};
use crate::geom::ray::Ray;
use crate::geom::segment::segment_intersection_xy;

/// Solid obtained by extruding a footprint from `z = 0` up to `z = height`.
#[derive(Debug, Clone)]
pub struct Prism {
    pub name: String,
    base: Vec<Point>,
    height: f64,
    bbox: (Point, Point),
}

impl Prism {
    pub fn new(name: &str, base: &[Point], height: f64) -> Result<Self> {
        if base.len() < 3 {
            return Err(anyhow!(
                "Prism '{name}' needs at least 3 base vertices, got {}",
                base.len()
            ));
        }
        if !height.is_finite() || height <= 0.0 {
            return Err(anyhow!("Prism '{name}' has non-positive height {height}"));
        }
        let base: Vec<Point> = base.iter().map(|p| p.with_z(0.)).collect();
        let (pmin, pmax) =
            bounding_box(&base).ok_or_else(|| anyhow!("Prism '{name}' has no vertices"))?;

        Ok(Self {
            name: name.to_string(),
            base,
            height,
            bbox: (pmin, pmax.with_z(height)),
        })
    }

    /// Distance along the ray to the first point inside the solid,
    /// considering only `t` in `[near, far]`.
    ///
    /// The ray direction must be unit length for `t` to be a distance.
    pub fn intersect_ray(&self, ray: &Ray, near: f64, far: f64) -> Option<f64> {
        if !does_ray_hit_bbox(ray, self.bbox.0, self.bbox.1, near, far) {
            return None;
        }
        let (t0, t1) = ray.z_slab(0.0, self.height, near, far)?;

        let p0 = ray.point_at(t0);
        if is_point_inside_xy(p0, &self.base) {
            return Some(t0);
        }

        // Ray enters the footprint through a wall somewhere in (t0, t1]
        let p1 = ray.point_at(t1);
        edges(&self.base)
            .filter_map(|(a, b)| segment_intersection_xy(p0, p1, a, b))
            .map(|(s, _)| t0 + s * (t1 - t0))
            .min_by(f64::total_cmp)
    }
}
