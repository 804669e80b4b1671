//! Analysis settings.

use serde::{Deserialize, Serialize};

use crate::error::ExposureError;

use super::solar::{MIN_SUN_ALTITUDE, Season};

/// Upper bound on the number of evaluated instants per run.
pub const MAX_TIME_POINTS: usize = 100_000;

/// Configuration for a sunlight-hours analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureConfig {
    /// Solar declination of the analysed day [deg].
    pub declination: f64,
    /// Time step between evaluated instants [h].
    pub time_step_hours: f64,
    /// First evaluated clock hour (inclusive).
    pub first_hour: f64,
    /// Last evaluated clock hour (inclusive).
    pub last_hour: f64,
    /// Number of sample points processed between two progress reports.
    pub batch_size: usize,
    /// Units with fewer sunlight hours than this are non-compliant [h].
    pub compliance_threshold: f64,
    /// Sun altitude at or below which a step does not count [rad].
    pub min_altitude: f64,
    /// Evaluate the points of a batch on the rayon thread pool.
    pub parallel: bool,
}

impl ExposureConfig {
    pub fn new() -> Self {
        Self {
            declination: Season::WinterSolstice.declination(),
            time_step_hours: 1.0,
            first_hour: 6.0,
            last_hour: 18.0,
            batch_size: 10,
            compliance_threshold: 2.0,
            min_altitude: MIN_SUN_ALTITUDE,
            parallel: false,
        }
    }

    pub fn for_season(season: Season) -> Self {
        Self {
            declination: season.declination(),
            ..Self::new()
        }
    }

    /// Evaluated clock hours: `first_hour + i * time_step_hours` up to `last_hour`.
    ///
    /// Never yields more than [`MAX_TIME_POINTS`] instants.
    pub fn time_points(&self) -> Vec<f64> {
        let steps = self.step_count().min((MAX_TIME_POINTS - 1) as f64) as usize;
        (0..=steps)
            .map(|i| self.first_hour + i as f64 * self.time_step_hours)
            .collect()
    }

    /// Number of steps after the first instant, as a float so that tiny
    /// steps are not truncated.
    fn step_count(&self) -> f64 {
        ((self.last_hour - self.first_hour) / self.time_step_hours + 1e-9).floor()
    }

    pub fn validate(&self) -> Result<(), ExposureError> {
        if !self.declination.is_finite() {
            return Err(ExposureError::validation("declination must be finite"));
        }
        if !self.time_step_hours.is_finite() || self.time_step_hours <= 0.0 {
            return Err(ExposureError::validation(format!(
                "time step must be positive, got {}",
                self.time_step_hours
            )));
        }
        if !(self.first_hour.is_finite() && self.last_hour.is_finite())
            || self.first_hour > self.last_hour
        {
            return Err(ExposureError::validation(format!(
                "invalid hour window [{}, {}]",
                self.first_hour, self.last_hour
            )));
        }
        let steps = self.step_count();
        if !steps.is_finite() || steps + 1.0 > MAX_TIME_POINTS as f64 {
            return Err(ExposureError::validation(format!(
                "time step {} h gives more than {MAX_TIME_POINTS} time points",
                self.time_step_hours
            )));
        }
        if self.batch_size == 0 {
            return Err(ExposureError::validation("batch size must be at least 1"));
        }
        Ok(())
    }
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self::new()
    }
}
