//! Ray visibility queries against the site massing.
//!
//! The engine only needs to know whether a window sees the sun. Any backend
//! answering [`OcclusionOracle::is_exposed`] can be plugged in; this module
//! ships a brute-force extrusion backend and an empty-sky one.

use crate::error::OracleError;
use crate::geom::prism::Prism;
use crate::geom::ray::Ray;
use crate::site::SitePlan;
use crate::{Point, Vector};

/// Rays ignore hits closer than this to their origin [m].
pub const NEAR_CLIP: f64 = 0.1;
/// Rays ignore hits farther than this from their origin [m].
pub const FAR_CLIP: f64 = 2000.0;

/// Answers whether a ray reaches the sky unobstructed.
///
/// Implementations are queried concurrently from the engine's worker
/// threads and must not change while a run is in flight.
pub trait OcclusionOracle: Sync {
    /// `true` iff no building solid lies on the ray between the near and
    /// far clip distances.
    fn is_exposed(&self, origin: Point, direction: Vector) -> Result<bool, OracleError>;
}

/// Oracle for a site without any obstruction.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSky;

impl OcclusionOracle for OpenSky {
    fn is_exposed(&self, _origin: Point, _direction: Vector) -> Result<bool, OracleError> {
        Ok(true)
    }
}

/// Extruded footprints of every building in a site plan.
///
/// Built once per plan; a modified plan needs a new scene.
#[derive(Debug, Clone)]
pub struct ExtrudedScene {
    prisms: Vec<Prism>,
    near: f64,
    far: f64,
}

impl ExtrudedScene {
    pub fn new(plan: &SitePlan) -> Self {
        Self::with_clip(plan, NEAR_CLIP, FAR_CLIP)
    }

    pub fn with_clip(plan: &SitePlan, near: f64, far: f64) -> Self {
        let mut prisms = Vec::with_capacity(plan.buildings.len());
        for b in &plan.buildings {
            match Prism::new(&b.name, &b.polygon, b.total_height()) {
                Ok(p) => prisms.push(p),
                Err(e) => log::warn!("Building '{}' casts no shadow: {e}", b.name),
            }
        }
        log::debug!(
            "Extruded scene with {} of {} buildings",
            prisms.len(),
            plan.buildings.len()
        );
        Self { prisms, near, far }
    }

    /// Closest obstruction along the ray as `(prism index, distance)`.
    fn first_hit(&self, ray: &Ray) -> Option<(usize, f64)> {
        self.prisms
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.intersect_ray(ray, self.near, self.far).map(|t| (i, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

impl OcclusionOracle for ExtrudedScene {
    fn is_exposed(&self, origin: Point, direction: Vector) -> Result<bool, OracleError> {
        let ray = Ray::new(origin, direction)
            .ok_or_else(|| format!("Degenerate ray direction {direction} from {origin}"))?;
        Ok(self.first_hit(&ray).is_none())
    }
}
