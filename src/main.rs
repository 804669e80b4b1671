//! Sunlight-hours report for a site exported by the footprint editor.
//!
//! Usage:
//!   sunhours <site.json> [options]
//!
//! Options:
//!   --season <name>       winter (default), equinox or summer
//!   --declination <deg>   Explicit solar declination, overrides --season
//!   --step <hours>        Time step (default 1)
//!   --threshold <hours>   Compliance threshold (default 2)
//!   --latitude <deg>      Override the latitude stored in the site file
//!   --city <name>         Take the latitude from the built-in city table
//!   --parallel            Evaluate sample points on all cores
//!   --json <path>         Write the full report as JSON
//!
//! Set `RUST_LOG=info` (or `debug`) to see run progress.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use sunhours::io::{read_site, write_report};
use sunhours::sim::exposure::{CancelToken, ExposureEngine, RunContext};
use sunhours::site::cities::{city_at, latitude_of};
use sunhours::{ExposureConfig, ExposureReport, ExtrudedScene, Season};

struct Args {
    site: PathBuf,
    config: ExposureConfig,
    latitude: Option<f64>,
    json: Option<PathBuf>,
}

fn print_usage() {
    eprintln!(
        "Usage: sunhours <site.json> [--season winter|equinox|summer] [--declination DEG] \
         [--step HOURS] [--threshold HOURS] [--latitude DEG] [--city NAME] [--parallel] \
         [--json OUT]"
    );
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut iter = args.iter();
    let site = iter
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Missing site file"))?;

    let mut config = ExposureConfig::new();
    let mut declination: Option<f64> = None;
    let mut latitude = None;
    let mut json = None;

    while let Some(flag) = iter.next() {
        if flag == "--parallel" {
            config.parallel = true;
            continue;
        }
        let value = iter
            .next()
            .ok_or_else(|| anyhow!("Missing value for {flag}"))?;
        let number = || -> Result<f64> {
            value
                .parse::<f64>()
                .with_context(|| format!("Invalid number for {flag}: {value}"))
        };
        match flag.as_str() {
            "--season" => config.declination = value.parse::<Season>()?.declination(),
            "--declination" => declination = Some(number()?),
            "--step" => config.time_step_hours = number()?,
            "--threshold" => config.compliance_threshold = number()?,
            "--latitude" => latitude = Some(number()?),
            "--city" => {
                let lat = latitude_of(value).ok_or_else(|| anyhow!("Unknown city: {value}"))?;
                latitude = Some(lat);
            }
            "--json" => json = Some(PathBuf::from(value)),
            other => bail!("Unknown option: {other}"),
        }
    }
    if let Some(d) = declination {
        config.declination = d;
    }

    Ok(Args {
        site,
        config,
        latitude,
        json,
    })
}

fn print_report(report: &ExposureReport) {
    println!(
        "Latitude {:.2}, declination {:.2}, step {} h",
        report.latitude, report.declination, report.time_step_hours
    );
    println!();
    println!(
        "{:<20} {:>6} {:>8} {:>8} {:>8} {:>6}",
        "Building", "Units", "Min", "Max", "Avg", "< thr"
    );
    for (name, stats) in &report.per_building {
        println!(
            "{:<20} {:>6} {:>8.2} {:>8.2} {:>8.2} {:>6}",
            name,
            stats.hours.unit_count,
            stats.hours.min,
            stats.hours.max,
            stats.hours.avg,
            stats.non_compliant_count
        );
    }
    println!();
    match &report.site {
        Some(site) => println!(
            "Site: {} units, min {:.2} h, max {:.2} h, avg {:.2} h",
            site.unit_count, site.min, site.max, site.avg
        ),
        None => println!("Site: no units could be sampled"),
    }
    println!(
        "Units below {:.1} h: {}",
        report.compliance_threshold, report.non_compliant_count
    );
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || args[0] == "--help" || args[0] == "-h" {
        print_usage();
        if args.is_empty() {
            std::process::exit(1);
        }
        return Ok(());
    }
    let args = parse_args(&args)?;

    let mut plan = read_site(&args.site)?;
    if let Some(lat) = args.latitude {
        plan.latitude = lat;
    }
    match city_at(plan.latitude) {
        Some(city) => log::info!("Site latitude {:.2} ({})", plan.latitude, city.name),
        None => log::info!("Site latitude {:.2}", plan.latitude),
    }

    let scene = ExtrudedScene::new(&plan);
    let ctx = RunContext::new(&plan, args.config);
    let mut last_logged = 0;
    let report = ExposureEngine::run(
        &ctx,
        &scene,
        |fraction| {
            let pct = (fraction * 100.0) as usize;
            if pct >= last_logged + 10 {
                log::info!("Progress: {pct}%");
                last_logged = pct;
            }
        },
        &CancelToken::new(),
    )
    .with_context(|| format!("Analysis of {} failed", args.site.display()))?;

    print_report(&report);

    if let Some(path) = &args.json {
        write_report(path, &report)?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_defaults() -> Result<()> {
        let args = parse_args(&strings(&["site.json"]))?;
        assert_eq!(args.site, PathBuf::from("site.json"));
        assert_eq!(args.config, ExposureConfig::new());
        assert!(args.latitude.is_none());
        assert!(args.json.is_none());
        Ok(())
    }

    #[test]
    fn test_parse_options() -> Result<()> {
        let args = parse_args(&strings(&[
            "site.json",
            "--declination",
            "5",
            "--season",
            "summer",
            "--step",
            "0.5",
            "--city",
            "Jinan",
            "--parallel",
            "--json",
            "out.json",
        ]))?;
        // Explicit declination wins over the season
        assert_eq!(args.config.declination, 5.0);
        assert_eq!(args.config.time_step_hours, 0.5);
        assert!(args.config.parallel);
        assert_eq!(args.latitude, Some(36.65));
        assert_eq!(args.json, Some(PathBuf::from("out.json")));
        Ok(())
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&strings(&[])).is_err());
        assert!(parse_args(&strings(&["s.json", "--step"])).is_err());
        assert!(parse_args(&strings(&["s.json", "--step", "abc"])).is_err());
        assert!(parse_args(&strings(&["s.json", "--bogus", "1"])).is_err());
        assert!(parse_args(&strings(&["s.json", "--city", "Atlantis"])).is_err());
    }
}
