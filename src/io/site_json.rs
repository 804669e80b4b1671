//! Site JSON format I/O.
//!
//! This is the file exported by the footprint editor (format version 1.7).
//! Only the fields the analysis needs are interpreted; editor bookkeeping
//! such as `scaleRatio`, `origin` or per-building `center` is ignored.

use crate::geom::polygon::open_ring;
use crate::sim::exposure::result::ExposureReport;
use crate::site::{BuildingFootprint, DEFAULT_FLOOR_HEIGHT, SitePlan, normalize_units_per_floor};
use crate::{Point, UID};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteFile {
    #[serde(default)]
    pub version: Option<f64>,
    pub latitude: f64,
    #[serde(default)]
    pub buildings: Vec<BuildingRecord>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShapePoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_floors")]
    pub floors: usize,
    #[serde(default = "default_floor_height")]
    pub floor_height: f64,
    #[serde(default = "default_units")]
    pub units: usize,
    #[serde(default)]
    pub units_per_floor: Option<Vec<usize>>,
    #[serde(default)]
    pub total_height: Option<f64>,
    #[serde(default = "default_is_this_community")]
    pub is_this_community: bool,
    #[serde(default)]
    pub shape: Vec<ShapePoint>,
}

fn default_floors() -> usize {
    1
}

fn default_floor_height() -> f64 {
    DEFAULT_FLOOR_HEIGHT
}

fn default_units() -> usize {
    1
}

fn default_is_this_community() -> bool {
    true
}

impl BuildingRecord {
    pub fn to_footprint(&self) -> BuildingFootprint {
        let floors = self.floors.max(1);
        let polygon = open_ring(self.shape.iter().map(|p| Point::xy(p.x, p.y)).collect());
        let id = match &self.id {
            Some(id) => UID::from(id.as_str()),
            None => UID::new(),
        };

        BuildingFootprint {
            id,
            name: self.name.clone(),
            polygon,
            floors,
            floor_height: self.floor_height,
            units_per_floor: normalize_units_per_floor(
                floors,
                self.units_per_floor.as_deref(),
                self.units,
            ),
            total_height: self.total_height,
            is_target: self.is_this_community,
        }
    }
}

impl SiteFile {
    /// Converts the record into a site plan. No validation happens here;
    /// see [`SitePlan::validate`].
    pub fn to_site_plan(&self) -> SitePlan {
        SitePlan::new(
            self.latitude,
            self.buildings.iter().map(|b| b.to_footprint()).collect(),
        )
    }
}

/// Reads a site plan from an editor JSON file.
pub fn read_site(path: &Path) -> Result<SitePlan> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let site: SiteFile = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse site JSON from: {}", path.display()))?;

    Ok(site.to_site_plan())
}

/// Parses a site plan from an editor JSON string.
pub fn site_from_str(json: &str) -> Result<SitePlan> {
    let site: SiteFile = serde_json::from_str(json).context("Failed to parse site JSON")?;
    Ok(site.to_site_plan())
}

/// Writes an exposure report as pretty JSON.
pub fn write_report(path: &Path, report: &ExposureReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report)
        .with_context(|| format!("Failed to write report to: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const EDITOR_EXPORT: &str = r#"{
        "version": 1.7,
        "latitude": 36.65,
        "scaleRatio": 0.5,
        "origin": { "x": 410.0, "y": 300.0 },
        "buildings": [
            {
                "name": "1#",
                "floors": 6,
                "floorHeight": 3,
                "units": 2,
                "totalHeight": 18,
                "isThisCommunity": true,
                "shape": [
                    { "x": -10, "y": -6 },
                    { "x": 10, "y": -6 },
                    { "x": 10, "y": 6 },
                    { "x": -10, "y": 6 },
                    { "x": -10, "y": -6 }
                ],
                "center": { "x": 0, "y": 0 }
            },
            {
                "name": "neighbour",
                "floors": 11,
                "unitsPerFloor": [4, 2],
                "isThisCommunity": false,
                "shape": [
                    { "x": -10, "y": 30 },
                    { "x": 10, "y": 30 },
                    { "x": 10, "y": 42 }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_editor_export() -> Result<()> {
        let plan = site_from_str(EDITOR_EXPORT)?;
        assert_eq!(plan.latitude, 36.65);
        assert_eq!(plan.buildings.len(), 2);

        let a = &plan.buildings[0];
        assert_eq!(a.name, "1#");
        assert!(a.is_target);
        assert_eq!(a.polygon.len(), 4); // closing vertex dropped
        assert_eq!(a.units_per_floor, vec![2; 6]);
        assert_eq!(a.total_height(), 18.0);

        let b = &plan.buildings[1];
        assert!(!b.is_target);
        assert_eq!(b.floor_height, DEFAULT_FLOOR_HEIGHT);
        assert_eq!(b.units_per_floor.len(), 11);
        assert_eq!(b.units_per_floor[0], 4);
        assert_eq!(b.units_per_floor[10], 2);
        assert_eq!(b.total_height(), 33.0);
        Ok(())
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let plan = site_from_str(r#"{ "latitude": 40.0, "buildings": [ { "shape": [] } ] }"#)?;
        let b = &plan.buildings[0];
        assert!(b.is_target);
        assert_eq!(b.floors, 1);
        assert_eq!(b.units_per_floor, vec![1]);
        Ok(())
    }

    #[test]
    fn test_explicit_id_is_kept() -> Result<()> {
        let plan = site_from_str(
            r#"{ "latitude": 40.0, "buildings": [ { "id": "b-7", "name": "x", "shape": [] } ] }"#,
        )?;
        assert_eq!(plan.buildings[0].id.as_str(), "b-7");
        Ok(())
    }

    #[test]
    fn test_missing_latitude_is_an_error() {
        assert!(site_from_str(r#"{ "buildings": [] }"#).is_err());
    }

    #[test]
    fn test_read_from_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("site.json");
        std::fs::write(&path, EDITOR_EXPORT)?;

        let plan = read_site(&path)?;
        assert_eq!(plan.buildings.len(), 2);

        assert!(read_site(&dir.path().join("missing.json")).is_err());
        Ok(())
    }
}
