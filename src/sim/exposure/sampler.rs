//! Sample points on the sunlit facade, one per residential unit.

use serde::{Deserialize, Serialize};

use crate::geom::polygon::{edges, vertex_centroid};
use crate::geom::segment::length_xy;
use crate::site::{BuildingFootprint, SitePlan};
use crate::{Point, UID, Vector};

/// Window sill as a fraction of the storey height.
pub const SILL_RATIO: f64 = 0.4;
/// Eye level above the sill [m].
pub const EYE_HEIGHT: f64 = 1.2;
/// Distance the sample point is pushed out of the facade plane [m].
pub const FACADE_OFFSET: f64 = 0.5;

/// Shortest facade edge still considered a real wall [m].
const MIN_FACADE_LENGTH: f64 = 1e-9;

/// One residential unit's window on the sunlit facade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacadeSamplePoint {
    pub building_id: UID,
    pub building_name: String,
    /// 1-based storey number.
    pub floor_index: usize,
    /// 1-based unit number, increasing from east to west.
    pub unit_index: usize,
    pub position: Point,
    /// Accumulated hours of direct sun.
    pub sunlight_hours: f64,
}

/// The sunlit wall of a footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facade {
    /// Western end.
    pub start: Point,
    /// Eastern end.
    pub end: Point,
    /// Horizontal outward unit normal.
    pub normal: Vector,
}

/// Finds the facade: the edge whose midpoint has the largest `y`.
///
/// On ties the first such edge in vertex order wins. Returns `None` for
/// fewer than 3 vertices or a zero-length (or non-finite) edge.
pub fn find_facade(polygon: &[Point]) -> Option<Facade> {
    if polygon.len() < 3 {
        return None;
    }

    let mut best: Option<(Point, Point)> = None;
    let mut best_y = f64::NEG_INFINITY;
    for (a, b) in edges(polygon) {
        let mid_y = 0.5 * (a.y + b.y);
        if mid_y > best_y {
            best_y = mid_y;
            best = Some((a, b));
        }
    }
    let (a, b) = best?;
    let (start, end) = if a.x <= b.x { (a, b) } else { (b, a) };
    let (start, end) = (start.with_z(0.), end.with_z(0.));

    let len = length_xy(start, end);
    if !len.is_finite() || len < MIN_FACADE_LENGTH {
        return None;
    }

    // Rotate the west->east direction by 90 degrees
    let along = end - start;
    let mut normal = Vector::new(-along.dy, along.dx, 0.).normalize()?;
    if normal.dy.abs() < 1e-12 {
        // North-south wall: face away from the footprint
        let centroid = vertex_centroid(polygon)?;
        let mid = Point::new_between_2_points(start, end, 0.5);
        if normal.dot(mid - centroid) < 0.0 {
            normal = -normal;
        }
    }

    Some(Facade { start, end, normal })
}

/// Height of the sampled window on floor `floor` (0-based) [m].
pub fn window_height(floor: usize, floor_height: f64) -> f64 {
    floor as f64 * floor_height + floor_height * SILL_RATIO + EYE_HEIGHT
}

/// Sample points of a single building, floor by floor, east to west.
///
/// Buildings without a usable facade yield no points (logged as a warning).
pub fn sample_building(building: &BuildingFootprint) -> Vec<FacadeSamplePoint> {
    let Some(facade) = find_facade(&building.polygon) else {
        log::warn!(
            "Skipping building '{}': no usable facade ({} vertices)",
            building.name,
            building.polygon.len()
        );
        return Vec::new();
    };

    let mut points = Vec::with_capacity(building.unit_count());
    for floor in 0..building.floors {
        let z = window_height(floor, building.floor_height);
        let n = building.units_on_floor(floor);
        for unit in 0..n {
            // Unit 0 sits at the eastern end
            let t = (n as f64 - 1.0 - unit as f64 + 0.5) / n as f64;
            let on_wall = Point::new_between_2_points(facade.start, facade.end, t);
            let position = (on_wall + facade.normal * FACADE_OFFSET).with_z(z);

            points.push(FacadeSamplePoint {
                building_id: building.id.clone(),
                building_name: building.name.clone(),
                floor_index: floor + 1,
                unit_index: unit + 1,
                position,
                sunlight_hours: 0.0,
            });
        }
    }
    points
}

/// Sample points of every target building, in site order.
pub fn sample_site(plan: &SitePlan) -> Vec<FacadeSamplePoint> {
    plan.targets().flat_map(sample_building).collect()
}
