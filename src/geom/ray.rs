//! Ray casting infrastructure.
//!
//! This module provides a Ray struct used by occlusion queries against
//! extruded site geometry.

use crate::{Point, Vector};

/// A ray defined by an origin point and a direction vector.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray
    pub origin: Point,
    /// Direction vector (unit length, so `t` is a distance in meters)
    pub direction: Vector,
}

impl Ray {
    /// Creates a new ray from origin point and direction vector.
    ///
    /// The direction vector is automatically normalized.
    pub fn new(origin: Point, direction: Vector) -> Option<Self> {
        let normalized = direction.normalize()?;
        Some(Self {
            origin,
            direction: normalized,
        })
    }

    /// Returns the point along the ray at parameter t.
    ///
    /// point = origin + t * direction
    pub fn point_at(&self, t: f64) -> Point {
        self.origin + self.direction * t
    }

    /// Parameter range `[t0, t1]` (clipped to `[near, far]`) in which the ray
    /// stays between the horizontal planes `z = z_min` and `z = z_max`.
    pub fn z_slab(&self, z_min: f64, z_max: f64, near: f64, far: f64) -> Option<(f64, f64)> {
        let oz = self.origin.z;
        let dz = self.direction.dz;
        if dz.abs() < 1e-12 {
            return if oz >= z_min && oz <= z_max {
                Some((near, far))
            } else {
                None
            };
        }
        let ta = (z_min - oz) / dz;
        let tb = (z_max - oz) / dz;
        let t0 = ta.min(tb).max(near);
        let t1 = ta.max(tb).min(far);
        if t0 > t1 { None } else { Some((t0, t1)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let ray = Ray::new(Point::new(0.0, 0.0, 0.0), Vector::new(1.0, 0.0, 0.0));
        assert!(ray.is_some());

        // Zero direction should fail
        let ray = Ray::new(Point::new(0.0, 0.0, 0.0), Vector::new(0.0, 0.0, 0.0));
        assert!(ray.is_none());
    }

    #[test]
    fn test_ray_point_at() {
        let ray = Ray::new(Point::new(0.0, 0.0, 0.0), Vector::new(2.0, 0.0, 0.0)).unwrap();
        let p = ray.point_at(5.0);
        assert!(p.is_close(&Point::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn test_z_slab_rising_ray() {
        let ray = Ray::new(Point::new(0.0, 0.0, 1.0), Vector::new(0.0, 1.0, 1.0)).unwrap();
        let (t0, t1) = ray.z_slab(0.0, 11.0, 0.1, 2000.0).unwrap();
        assert!((t0 - 0.1).abs() < 1e-12);
        assert!((t1 - 10.0 * 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_z_slab_above_box() {
        let ray = Ray::new(Point::new(0.0, 0.0, 20.0), Vector::new(1.0, 0.0, 0.5)).unwrap();
        assert!(ray.z_slab(0.0, 10.0, 0.1, 2000.0).is_none());
    }

    #[test]
    fn test_z_slab_horizontal_ray() {
        let ray = Ray::new(Point::new(0.0, 0.0, 5.0), Vector::new(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(ray.z_slab(0.0, 10.0, 0.1, 50.0), Some((0.1, 50.0)));
        assert!(ray.z_slab(6.0, 10.0, 0.1, 50.0).is_none());
    }
}
