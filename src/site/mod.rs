//! Site plan: latitude plus the extruded building massings.
//!
//! Footprints arrive already cleaned by the editor (no duplicate vertices,
//! no short or collinear edges). Nothing here repairs geometry; the only
//! geometric guard is the minimum vertex count applied by the sampler.

pub mod cities;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ExposureError;
use crate::{Point, UID};

/// Default storey height when the editor did not supply one [m].
pub const DEFAULT_FLOOR_HEIGHT: f64 = 3.0;

/// One building massing of the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingFootprint {
    pub id: UID,
    pub name: String,
    /// Closed outline in the site frame (`x` east, `y` south), `z = 0`.
    pub polygon: Vec<Point>,
    pub floors: usize,
    pub floor_height: f64,
    /// Number of units on each floor, `floors` entries, each at least 1.
    pub units_per_floor: Vec<usize>,
    /// Explicit extrusion height overriding `floors * floor_height`.
    pub total_height: Option<f64>,
    /// Whether the building's units are analysed (otherwise it only casts shadows).
    pub is_target: bool,
}

impl BuildingFootprint {
    /// Creates a footprint with the same number of units on every floor.
    pub fn new(
        name: &str,
        polygon: Vec<Point>,
        floors: usize,
        floor_height: f64,
        units: usize,
        is_target: bool,
    ) -> Self {
        let floors = floors.max(1);
        Self {
            id: UID::new(),
            name: name.to_string(),
            polygon: polygon.into_iter().map(|p| p.with_z(0.)).collect(),
            floors,
            floor_height,
            units_per_floor: vec![units.max(1); floors],
            total_height: None,
            is_target,
        }
    }

    /// Replaces the per-floor unit counts (see [`normalize_units_per_floor`]).
    pub fn with_units_per_floor(mut self, units: &[usize]) -> Self {
        self.units_per_floor = normalize_units_per_floor(self.floors, Some(units), 1);
        self
    }

    pub fn with_total_height(mut self, height: f64) -> Self {
        self.total_height = Some(height);
        self
    }

    pub fn with_id(mut self, id: impl Into<UID>) -> Self {
        self.id = id.into();
        self
    }

    /// Extrusion height of the massing [m].
    pub fn total_height(&self) -> f64 {
        self.total_height.unwrap_or(self.floors as f64 * self.floor_height)
    }

    /// Units on floor `floor` (0-based). Floors past the list reuse the last entry.
    pub fn units_on_floor(&self, floor: usize) -> usize {
        self.units_per_floor
            .get(floor)
            .or(self.units_per_floor.last())
            .copied()
            .unwrap_or(1)
            .max(1)
    }

    /// Number of (floor, unit) sampling points of this building.
    pub fn unit_count(&self) -> usize {
        (0..self.floors).map(|f| self.units_on_floor(f)).sum()
    }
}

/// Expands per-floor unit counts to exactly `floors` entries.
///
/// A shorter list is padded with its last value, every entry is at least 1,
/// and without a list `units` fills every floor.
pub fn normalize_units_per_floor(
    floors: usize,
    per_floor: Option<&[usize]>,
    units: usize,
) -> Vec<usize> {
    let floors = floors.max(1);
    match per_floor {
        Some(list) if !list.is_empty() => (0..floors)
            .map(|f| list.get(f).or(list.last()).copied().unwrap_or(1).max(1))
            .collect(),
        _ => vec![units.max(1); floors],
    }
}

/// Immutable snapshot of the site for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitePlan {
    /// Site latitude in degrees, positive north.
    pub latitude: f64,
    pub buildings: Vec<BuildingFootprint>,
}

impl SitePlan {
    pub fn new(latitude: f64, buildings: Vec<BuildingFootprint>) -> Self {
        Self {
            latitude,
            buildings,
        }
    }

    pub fn targets(&self) -> impl Iterator<Item = &BuildingFootprint> {
        self.buildings.iter().filter(|b| b.is_target)
    }

    /// Input-boundary checks. Geometry validity is the editor's responsibility.
    pub fn validate(&self) -> Result<(), ExposureError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ExposureError::validation(format!(
                "latitude {} is outside [-90, 90]",
                self.latitude
            )));
        }

        // Report tables are keyed by target name and id; neighbours may share both.
        let mut names = HashSet::new();
        let mut ids = HashSet::new();
        for b in &self.buildings {
            if b.is_target && !names.insert(b.name.as_str()) {
                return Err(ExposureError::validation(format!(
                    "duplicate target building name '{}'",
                    b.name
                )));
            }
            if b.is_target && !ids.insert(&b.id) {
                return Err(ExposureError::validation(format!(
                    "duplicate target building id '{}' (on '{}')",
                    b.id, b.name
                )));
            }
            if !b.floor_height.is_finite() || b.floor_height <= 0.0 {
                return Err(ExposureError::validation(format!(
                    "building '{}' has invalid floor height {}",
                    b.name, b.floor_height
                )));
            }
        }

        if self.targets().next().is_none() {
            return Err(ExposureError::validation(
                "no building is flagged as a target",
            ));
        }
        Ok(())
    }
}
