//! Point × time-step accumulation loop.
//!
//! A run is an explicit stepper: every call to [`ExposureRun::step`] handles
//! one batch of sample points and hands control back to the caller, which can
//! report progress, yield to its own scheduler or cancel the run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::Vector;
use crate::error::ExposureError;
use crate::site::SitePlan;

use super::config::ExposureConfig;
use super::occlusion::OcclusionOracle;
use super::result::ExposureReport;
use super::sampler::{FacadeSamplePoint, sample_site};
use super::solar::SolarPosition;

/// Immutable inputs of one analysis run.
#[derive(Debug, Clone)]
pub struct RunContext<'a> {
    pub plan: &'a SitePlan,
    pub config: ExposureConfig,
}

impl<'a> RunContext<'a> {
    pub fn new(plan: &'a SitePlan, config: ExposureConfig) -> Self {
        Self { plan, config }
    }
}

/// Shared flag for stopping a run at its next batch boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of one [`ExposureRun::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    /// Fraction of (point, time step) pairs evaluated so far.
    InProgress(f64),
    Finished(ExposureReport),
}

/// Sun direction at one evaluated hour, `None` when the sun is down.
#[derive(Debug, Clone, Copy)]
struct SunStep {
    hour: f64,
    direction: Option<Vector>,
}

/// A run in flight.
pub struct ExposureRun<'a, O: OcclusionOracle + ?Sized> {
    ctx: &'a RunContext<'a>,
    oracle: &'a O,
    cancel: CancelToken,
    sun: Vec<SunStep>,
    points: Vec<FacadeSamplePoint>,
    next: usize,
    report: Option<ExposureReport>,
}

impl<'a, O: OcclusionOracle + ?Sized> ExposureRun<'a, O> {
    /// Validates the inputs and prepares sample points and sun directions.
    ///
    /// Fails with [`ExposureError::Validation`] before any occlusion query.
    pub fn start(
        ctx: &'a RunContext<'a>,
        oracle: &'a O,
        cancel: CancelToken,
    ) -> Result<Self, ExposureError> {
        ctx.plan.validate()?;
        ctx.config.validate()?;

        let points = sample_site(ctx.plan);
        let sun = sun_steps(ctx.plan.latitude, &ctx.config);

        log::info!(
            "Starting exposure run: {} points, {} time steps ({} with sun), declination {:.2}",
            points.len(),
            sun.len(),
            sun.iter().filter(|s| s.direction.is_some()).count(),
            ctx.config.declination
        );

        Ok(Self {
            ctx,
            oracle,
            cancel,
            sun,
            points,
            next: 0,
            report: None,
        })
    }

    /// Fraction of the run done so far, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.points.is_empty() {
            1.0
        } else {
            self.next as f64 / self.points.len() as f64
        }
    }

    pub fn total_points(&self) -> usize {
        self.points.len()
    }

    /// Evaluates the next batch of points.
    ///
    /// Once finished, further calls return the same report again.
    pub fn step(&mut self) -> Result<RunState, ExposureError> {
        if let Some(report) = &self.report {
            return Ok(RunState::Finished(report.clone()));
        }
        if self.cancel.is_cancelled() {
            log::info!("Exposure run cancelled at {:.0}%", self.fraction() * 100.0);
            return Err(ExposureError::Cancelled);
        }

        if self.next >= self.points.len() {
            let points = std::mem::take(&mut self.points);
            let latitude = self.ctx.plan.latitude;
            let report = ExposureReport::aggregate(points, latitude, &self.ctx.config);
            log::info!(
                "Exposure run finished: {} units, {} below {:.1} h",
                report.points.len(),
                report.non_compliant_count,
                report.compliance_threshold
            );
            self.report = Some(report.clone());
            return Ok(RunState::Finished(report));
        }

        let config = &self.ctx.config;
        let end = (self.next + config.batch_size).min(self.points.len());
        let sun = &self.sun;
        let oracle = self.oracle;
        let step_hours = config.time_step_hours;
        let batch = &mut self.points[self.next..end];

        // Errors are collected in point order so a failing run reports the
        // same point whichever worker hit it first
        let results: Vec<Result<(), ExposureError>> = if config.parallel {
            batch
                .par_iter_mut()
                .map(|p| accumulate(p, sun, oracle, step_hours))
                .collect()
        } else {
            batch
                .iter_mut()
                .map(|p| accumulate(p, sun, oracle, step_hours))
                .collect()
        };
        results.into_iter().collect::<Result<(), _>>()?;

        self.next = end;
        log::debug!("Evaluated points {}/{}", self.next, self.points.len());

        Ok(RunState::InProgress(self.fraction()))
    }
}

/// Drives runs to completion.
pub struct ExposureEngine;

impl ExposureEngine {
    /// Runs the analysis, calling `on_progress` after every batch.
    ///
    /// The reported fraction never decreases. Completion is signalled by the
    /// return value, not by a final `1.0`.
    pub fn run<O, F>(
        ctx: &RunContext,
        oracle: &O,
        mut on_progress: F,
        cancel: &CancelToken,
    ) -> Result<ExposureReport, ExposureError>
    where
        O: OcclusionOracle + ?Sized,
        F: FnMut(f64),
    {
        let mut run = ExposureRun::start(ctx, oracle, cancel.clone())?;
        loop {
            match run.step()? {
                RunState::InProgress(fraction) => on_progress(fraction),
                RunState::Finished(report) => return Ok(report),
            }
        }
    }
}

fn sun_steps(latitude: f64, config: &ExposureConfig) -> Vec<SunStep> {
    config
        .time_points()
        .into_iter()
        .map(|hour| {
            let pos = SolarPosition::calculate(hour, latitude, config.declination);
            let direction = if pos.altitude > config.min_altitude {
                pos.to_direction().normalize()
            } else {
                None
            };
            SunStep { hour, direction }
        })
        .collect()
}

/// Counts the exposed time steps of one point, in time order.
fn accumulate<O: OcclusionOracle + ?Sized>(
    point: &mut FacadeSamplePoint,
    sun: &[SunStep],
    oracle: &O,
    step_hours: f64,
) -> Result<(), ExposureError> {
    let mut exposed_steps = 0_usize;
    for s in sun {
        let Some(direction) = s.direction else {
            continue;
        };
        let exposed = oracle
            .is_exposed(point.position, direction)
            .map_err(|source| ExposureError::Run {
                building: point.building_name.clone(),
                floor: point.floor_index,
                unit: point.unit_index,
                hour: s.hour,
                source,
            })?;
        if exposed {
            exposed_steps += 1;
        }
    }
    point.sunlight_hours = exposed_steps as f64 * step_hours;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;
    use crate::error::OracleError;
    use crate::sim::exposure::occlusion::{ExtrudedScene, OpenSky};
    use crate::site::BuildingFootprint;
    use std::sync::atomic::AtomicUsize;

    fn rect(x0: f64, y0: f64, w: f64, d: f64) -> Vec<Point> {
        vec![
            Point::xy(x0, y0),
            Point::xy(x0 + w, y0),
            Point::xy(x0 + w, y0 + d),
            Point::xy(x0, y0 + d),
        ]
    }

    fn isolated() -> SitePlan {
        SitePlan::new(
            36.65,
            vec![BuildingFootprint::new("A", rect(0., 0., 20., 12.), 6, 3.0, 2, true)],
        )
    }

    struct Failing;
    impl OcclusionOracle for Failing {
        fn is_exposed(&self, _o: Point, _d: Vector) -> Result<bool, OracleError> {
            Err("backend offline".into())
        }
    }

    struct Counting(AtomicUsize);
    impl OcclusionOracle for Counting {
        fn is_exposed(&self, _o: Point, _d: Vector) -> Result<bool, OracleError> {
            self.0.fetch_add(1, Ordering::Relaxed);
            Ok(true)
        }
    }

    #[test]
    fn test_no_target_is_a_validation_error() {
        let plan = SitePlan::new(
            36.65,
            vec![BuildingFootprint::new("N", rect(0., 0., 20., 12.), 6, 3.0, 2, false)],
        );
        let ctx = RunContext::new(&plan, ExposureConfig::new());
        let err = ExposureEngine::run(&ctx, &OpenSky, |_| {}, &CancelToken::new()).unwrap_err();
        assert!(matches!(err, ExposureError::Validation(_)));
    }

    #[test]
    fn test_isolated_building_winter() -> Result<(), ExposureError> {
        // Sun is above 0.01 rad from 8:00 to 16:00 at 36.65N in winter
        let plan = isolated();
        let ctx = RunContext::new(&plan, ExposureConfig::new());
        let report = ExposureEngine::run(&ctx, &OpenSky, |_| {}, &CancelToken::new())?;
        assert_eq!(report.points.len(), 12);
        assert!(report.points.iter().all(|p| p.sunlight_hours == 9.0));

        let scene = ExtrudedScene::new(&plan);
        let report_scene = ExposureEngine::run(&ctx, &scene, |_| {}, &CancelToken::new())?;
        assert_eq!(report_scene, report);
        Ok(())
    }

    #[test]
    fn test_oracle_not_queried_when_sun_is_down() -> Result<(), ExposureError> {
        let plan = isolated();
        let ctx = RunContext::new(&plan, ExposureConfig::new());
        let oracle = Counting(AtomicUsize::new(0));
        ExposureEngine::run(&ctx, &oracle, |_| {}, &CancelToken::new())?;
        assert_eq!(oracle.0.load(Ordering::Relaxed), 12 * 9);
        Ok(())
    }

    #[test]
    fn test_min_altitude_is_configurable() -> Result<(), ExposureError> {
        let plan = isolated();
        let mut config = ExposureConfig::new();
        // Above the winter noon altitude of 29.91 degrees
        config.min_altitude = 0.6;
        let ctx = RunContext::new(&plan, config);
        let report = ExposureEngine::run(&ctx, &OpenSky, |_| {}, &CancelToken::new())?;
        assert!(report.points.iter().all(|p| p.sunlight_hours == 0.0));
        assert_eq!(report.non_compliant_count, 12);
        Ok(())
    }

    #[test]
    fn test_progress_is_monotone() -> Result<(), ExposureError> {
        let plan = isolated();
        let mut config = ExposureConfig::new();
        config.batch_size = 5;
        let ctx = RunContext::new(&plan, config);
        let mut fractions = Vec::new();
        ExposureEngine::run(&ctx, &OpenSky, |f| fractions.push(f), &CancelToken::new())?;
        assert_eq!(fractions.len(), 3);
        assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
        assert!(fractions.iter().all(|&f| (0.0..=1.0).contains(&f)));
        assert!((fractions[0] - 5.0 / 12.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_cancel_between_batches() {
        let plan = isolated();
        let mut config = ExposureConfig::new();
        config.batch_size = 4;
        let ctx = RunContext::new(&plan, config);
        let cancel = CancelToken::new();
        let handle = cancel.clone();
        let mut calls = 0;
        let res = ExposureEngine::run(
            &ctx,
            &OpenSky,
            |_| {
                calls += 1;
                handle.cancel();
            },
            &cancel,
        );
        assert!(matches!(res, Err(ExposureError::Cancelled)));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_cancel_before_start() {
        let plan = isolated();
        let ctx = RunContext::new(&plan, ExposureConfig::new());
        let cancel = CancelToken::new();
        cancel.cancel();
        let res = ExposureEngine::run(&ctx, &OpenSky, |_| {}, &cancel);
        assert!(matches!(res, Err(ExposureError::Cancelled)));
    }

    #[test]
    fn test_oracle_failure_aborts_run() {
        let plan = isolated();
        let ctx = RunContext::new(&plan, ExposureConfig::new());
        let err = ExposureEngine::run(&ctx, &Failing, |_| {}, &CancelToken::new()).unwrap_err();
        match err {
            ExposureError::Run {
                building,
                floor,
                unit,
                hour,
                ..
            } => {
                assert_eq!(building, "A");
                assert_eq!((floor, unit), (1, 1));
                assert_eq!(hour, 8.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parallel_matches_sequential() -> Result<(), ExposureError> {
        let plan = SitePlan::new(
            36.65,
            vec![
                BuildingFootprint::new("A", rect(0., 0., 20., 12.), 6, 3.0, 3, true),
                BuildingFootprint::new("B", rect(0., 22., 20., 12.), 10, 3.0, 2, false),
                BuildingFootprint::new("C", rect(30., 10., 15., 10.), 4, 3.0, 2, true),
            ],
        );
        let scene = ExtrudedScene::new(&plan);
        let mut config = ExposureConfig::new();
        config.time_step_hours = 0.25;

        let cancel = CancelToken::new();
        let seq_ctx = RunContext::new(&plan, config.clone());
        let seq = ExposureEngine::run(&seq_ctx, &scene, |_| {}, &cancel)?;
        config.parallel = true;
        let par_ctx = RunContext::new(&plan, config);
        let par = ExposureEngine::run(&par_ctx, &scene, |_| {}, &cancel)?;
        assert_eq!(seq, par);
        Ok(())
    }

    #[test]
    fn test_manual_stepping() -> Result<(), ExposureError> {
        let plan = isolated();
        let ctx = RunContext::new(&plan, ExposureConfig::new());
        let mut run = ExposureRun::start(&ctx, &OpenSky, CancelToken::new())?;
        assert_eq!(run.total_points(), 12);
        assert_eq!(run.fraction(), 0.0);

        assert!(matches!(run.step()?, RunState::InProgress(f) if (f - 10.0 / 12.0).abs() < 1e-12));
        assert_eq!(run.step()?, RunState::InProgress(1.0));
        let RunState::Finished(report) = run.step()? else {
            panic!("run should be finished");
        };
        assert_eq!(report.points.len(), 12);
        // Finished runs keep answering with the same report
        assert_eq!(run.step()?, RunState::Finished(report));
        Ok(())
    }
}
