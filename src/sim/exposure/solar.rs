//! Sun position for a clock hour, latitude and declination.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::Vector;

/// Sun altitude at or below which a time step contributes nothing [rad] (~0.57°).
pub const MIN_SUN_ALTITUDE: f64 = 0.01;

/// Solar position (altitude and azimuth angles), both in radians.
///
/// Azimuth is measured from the site `+y` axis (south) and is positive
/// towards east, i.e. in the morning.
#[derive(Debug, Clone, Copy)]
pub struct SolarPosition {
    pub altitude: f64,
    pub azimuth: f64,
}

impl SolarPosition {
    /// Solar position for clock `hour` (solar time), `latitude` and
    /// `declination` (both in degrees).
    pub fn calculate(hour: f64, latitude: f64, declination: f64) -> Self {
        let lat = latitude.to_radians();
        let decl = declination.to_radians();

        // Hour angle (15 degrees per hour from solar noon)
        let hour_angle = ((hour - 12.0) * 15.0).to_radians();

        let sin_alt = lat.sin() * decl.sin() + lat.cos() * decl.cos() * hour_angle.cos();
        let altitude = sin_alt.clamp(-1.0, 1.0).asin();

        let cos_az = (sin_alt * lat.sin() - decl.sin()) / (altitude.cos() * lat.cos()).max(1e-10);
        let mut azimuth = cos_az.clamp(-1.0, 1.0).acos();
        if hour >= 12.0 {
            azimuth = -azimuth;
        }

        Self { altitude, azimuth }
    }

    /// Returns true if the sun is high enough to count as above the horizon.
    pub fn is_above_horizon(&self) -> bool {
        self.altitude > MIN_SUN_ALTITUDE
    }

    /// Unit vector pointing from the site towards the sun, `(east, south, up)`.
    pub fn to_direction(&self) -> Vector {
        let horizontal = self.altitude.cos();
        Vector::new(
            horizontal * self.azimuth.sin(),
            horizontal * self.azimuth.cos(),
            self.altitude.sin(),
        )
    }
}

/// Direction towards the sun, or `None` when it is at or below the horizon.
pub fn sun_direction(hour: f64, latitude: f64, declination: f64) -> Option<Vector> {
    let pos = SolarPosition::calculate(hour, latitude, declination);
    if !pos.is_above_horizon() {
        return None;
    }
    pos.to_direction().normalize()
}

/// Typical analysis days, selected by solar declination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    WinterSolstice,
    Equinox,
    SummerSolstice,
}

impl Season {
    /// Solar declination of the day in degrees.
    pub fn declination(&self) -> f64 {
        match self {
            Season::WinterSolstice => -23.44,
            Season::Equinox => 0.0,
            Season::SummerSolstice => 23.44,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Season::WinterSolstice => "winter",
            Season::Equinox => "equinox",
            Season::SummerSolstice => "summer",
        };
        f.write_str(s)
    }
}

impl FromStr for Season {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "winter" | "winter-solstice" => Ok(Season::WinterSolstice),
            "equinox" => Ok(Season::Equinox),
            "summer" | "summer-solstice" => Ok(Season::SummerSolstice),
            other => Err(anyhow!(
                "Unknown season '{other}' (expected winter, equinox or summer)"
            )),
        }
    }
}
