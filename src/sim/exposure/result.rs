//! Per-unit results and their building and site aggregates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::UID;
use crate::vecutils::{max, mean, min};

use super::config::ExposureConfig;
use super::sampler::FacadeSamplePoint;

/// Sunlight-hour statistics over a set of units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoursStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub unit_count: usize,
}

impl HoursStats {
    /// Returns `None` for an empty set.
    pub fn from_hours(hours: &[f64]) -> Option<Self> {
        Some(Self {
            min: min(hours)?,
            max: max(hours)?,
            avg: mean(hours)?,
            unit_count: hours.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingStats {
    pub building_id: UID,
    #[serde(flatten)]
    pub hours: HoursStats,
    pub non_compliant_count: usize,
}

/// One line of the flat per-unit table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRow {
    pub building_name: String,
    pub floor: usize,
    pub unit: usize,
    pub sunlight_hours: f64,
}

/// Outcome of one analysis run.
///
/// A report describes one (site plan, declination, time step) combination;
/// a changed input calls for a new run rather than an update.
///
/// Hours are counted over the closed window `[first_hour, last_hour]`, so a
/// unit sunlit at both ends collects one step more than the window length:
/// up to 13 h at the default 1 h step when the sun is up at 6:00 and 18:00.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureReport {
    pub points: Vec<FacadeSamplePoint>,
    /// Keyed by building name.
    pub per_building: BTreeMap<String, BuildingStats>,
    /// `None` when no unit could be sampled.
    pub site: Option<HoursStats>,
    pub non_compliant_count: usize,
    pub compliance_threshold: f64,
    pub declination: f64,
    pub latitude: f64,
    pub time_step_hours: f64,
}

impl ExposureReport {
    /// Reduces populated sample points into a report. Pure function of its inputs.
    pub fn aggregate(
        points: Vec<FacadeSamplePoint>,
        latitude: f64,
        config: &ExposureConfig,
    ) -> Self {
        let threshold = config.compliance_threshold;

        // Group by building id, keeping the first name seen for the id
        let mut groups: BTreeMap<&UID, (&str, Vec<f64>)> = BTreeMap::new();
        for p in &points {
            groups
                .entry(&p.building_id)
                .or_insert_with(|| (p.building_name.as_str(), Vec::new()))
                .1
                .push(p.sunlight_hours);
        }

        let mut per_building = BTreeMap::new();
        for (id, (name, hours)) in groups {
            let Some(stats) = HoursStats::from_hours(&hours) else {
                continue;
            };
            per_building.insert(
                name.to_string(),
                BuildingStats {
                    building_id: id.clone(),
                    hours: stats,
                    non_compliant_count: hours.iter().filter(|&&h| h < threshold).count(),
                },
            );
        }

        let all_hours: Vec<f64> = points.iter().map(|p| p.sunlight_hours).collect();
        let site = HoursStats::from_hours(&all_hours);
        let non_compliant_count = all_hours.iter().filter(|&&h| h < threshold).count();

        Self {
            points,
            per_building,
            site,
            non_compliant_count,
            compliance_threshold: threshold,
            declination: config.declination,
            latitude,
            time_step_hours: config.time_step_hours,
        }
    }

    /// Flat `(building, floor, unit, hours)` table in sampling order.
    pub fn rows(&self) -> Vec<UnitRow> {
        self.points
            .iter()
            .map(|p| UnitRow {
                building_name: p.building_name.clone(),
                floor: p.floor_index,
                unit: p.unit_index,
                sunlight_hours: p.sunlight_hours,
            })
            .collect()
    }

    /// True when every sampled unit reaches the compliance threshold.
    pub fn is_compliant(&self) -> bool {
        self.non_compliant_count == 0
    }

    pub fn building(&self, name: &str) -> Option<&BuildingStats> {
        self.per_building.get(name)
    }

    /// Points of one building, in sampling order.
    pub fn points_of<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a FacadeSamplePoint> + 'a {
        self.points.iter().filter(move |p| p.building_name == name)
    }
}
