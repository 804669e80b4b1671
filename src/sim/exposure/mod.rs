//! Sunlight-hours analysis of residential facades.
//!
//! Every target building gets one sample point per unit on its sunlit
//! facade. For each evaluated hour of the analysed day the sun direction is
//! computed and the point counts the hour as sunlit when the occlusion
//! oracle reports the ray towards the sun as unobstructed.
//!
//! Usage:
//! ```ignore
//! let scene = ExtrudedScene::new(&plan);
//! let report = analyze(&plan, ExposureConfig::for_season(Season::WinterSolstice), &scene)?;
//! ```

pub mod color;
pub mod config;
pub mod engine;
pub mod occlusion;
pub mod result;
pub mod sampler;
pub mod solar;

pub use color::{DEFAULT_MAX_HOURS, color_for, default_color_for};
pub use config::ExposureConfig;
pub use engine::{CancelToken, ExposureEngine, ExposureRun, RunContext, RunState};
pub use occlusion::{ExtrudedScene, OcclusionOracle, OpenSky};
pub use result::{BuildingStats, ExposureReport, HoursStats, UnitRow};
pub use sampler::{FacadeSamplePoint, find_facade, sample_building, sample_site};
pub use solar::{Season, SolarPosition, sun_direction};

use crate::error::ExposureError;
use crate::site::SitePlan;

/// Runs a full analysis without progress reporting or cancellation.
pub fn analyze<O: OcclusionOracle + ?Sized>(
    plan: &SitePlan,
    config: ExposureConfig,
    oracle: &O,
) -> Result<ExposureReport, ExposureError> {
    let ctx = RunContext::new(plan, config);
    ExposureEngine::run(&ctx, oracle, |_| {}, &CancelToken::new())
}
