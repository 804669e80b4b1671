pub mod error;
pub mod geom;
pub mod io;
pub mod sim;
pub mod site;
pub mod uid;
pub mod vecutils;

// Prelude
pub use error::{ExposureError, OracleError};
pub use geom::point::Point;
pub use geom::vector::Vector;
pub use sim::exposure::{
    ExposureConfig, ExposureReport, ExtrudedScene, FacadeSamplePoint, OcclusionOracle, OpenSky,
    Season, analyze,
};
pub use site::{BuildingFootprint, SitePlan};
pub use uid::UID;
