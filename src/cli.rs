//! Command-line interface

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::airports::load_airports;
use crate::cache::ReportCache;
use crate::config::AppConfig;
use crate::evaluation::{EvaluationOptions, evaluate_airport, evaluate_report};
use crate::limits::{AircraftLimits, load_limits};
use crate::logging::init_logging;
use crate::render::airport_report;
use crate::report::{ReportKind, extract_weather_conditions, extract_winds, segment_taf};
use crate::runway::parse_runways;
use crate::weather::{ReportClient, daylight};

#[derive(Parser, Debug)]
#[command(name = "runway-wind")]
#[command(about = "Runway wind components and limit checks from METAR/TAF reports")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode wind groups, visibility/ceiling and TAF periods from a report
    Decode {
        /// Raw METAR or TAF text
        #[arg(short, long)]
        report: String,
    },
    /// Compute wind components of a report for a set of runway ends
    Wind {
        /// Raw METAR or TAF text
        #[arg(short, long)]
        report: String,

        /// Runway ends as TTT(MMM) pairs, e.g. "262(260);082(080)"
        #[arg(long)]
        runways: String,

        /// Aircraft limits table (CSV)
        #[arg(long, requires = "aircraft")]
        limits: Option<PathBuf>,

        /// Aircraft row to use from the limits table
        #[arg(long, requires = "limits")]
        aircraft: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Fetch current reports and evaluate every airport in a table
    Check {
        /// Airport table (CSV)
        #[arg(long)]
        airports: PathBuf,

        /// Aircraft limits table (CSV)
        #[arg(long)]
        limits: PathBuf,

        /// Aircraft row to use from the limits table
        #[arg(long)]
        aircraft: String,

        /// Always fetch fresh reports
        #[arg(long)]
        no_cache: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Load configuration, set up logging and dispatch the subcommand
pub async fn run(args: Args) -> Result<()> {
    let config = AppConfig::load(args.config.clone())?;
    init_logging(&config.logging, args.verbose)?;

    let options = EvaluationOptions::from(&config.evaluation);

    match args.command {
        Command::Decode { report } => {
            decode(&report);
            Ok(())
        }
        Command::Wind {
            report,
            runways,
            limits,
            aircraft,
            json,
        } => {
            let limits = match (limits, aircraft) {
                (Some(path), Some(aircraft)) => Some(load_limits(&path, &aircraft)?),
                _ => None,
            };
            wind(&report, &runways, limits.as_ref(), options, json)
        }
        Command::Check {
            airports,
            limits,
            aircraft,
            no_cache,
            json,
        } => {
            // Limits are validated before any airport is fetched
            let limits = load_limits(&limits, &aircraft)?;
            check(&config, &airports, &limits, options, no_cache, json).await
        }
    }
}

fn decode(report: &str) {
    let kind = ReportKind::detect(report);
    println!("{kind}");

    let winds = extract_winds(report);
    if winds.is_empty() {
        println!("  wind not reported");
    }
    for wind in &winds {
        println!("  wind {wind}");
    }
    println!("  {}", extract_weather_conditions(report));

    if kind == ReportKind::Taf {
        for segment in segment_taf(report) {
            println!("  {segment}");
        }
    }
}

fn wind(
    report: &str,
    runways: &str,
    limits: Option<&AircraftLimits>,
    options: EvaluationOptions,
    json: bool,
) -> Result<()> {
    let runways = parse_runways(runways);
    if runways.is_empty() {
        warn!("No valid runway ends in the runway encoding");
    }

    let kind = ReportKind::detect(report);
    let evaluation = evaluate_report(kind, report, &runways, limits, options);

    if json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
    } else {
        print!("{evaluation}");
    }
    Ok(())
}

async fn check(
    config: &AppConfig,
    airports_path: &Path,
    limits: &AircraftLimits,
    options: EvaluationOptions,
    no_cache: bool,
    json: bool,
) -> Result<()> {
    let airports = load_airports(airports_path)?;

    let cache = if config.cache.enabled && !no_cache {
        match ReportCache::open(&config.cache.location) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!("Report cache unavailable, fetching fresh reports: {e:#}");
                None
            }
        }
    } else {
        None
    };

    let client = ReportClient::new(config.weather.clone(), cache, config.cache.ttl())
        .context("Failed to set up report client")?;
    let today = Utc::now().date_naive();

    let mut evaluations = Vec::with_capacity(airports.len());
    for airport in &airports {
        info!("Checking {}", airport.icao);
        let reports = client.fetch_reports(&airport.icao).await;
        let evaluation = evaluate_airport(airport, &reports.metar, &reports.taf, limits, options);

        if !json {
            let daylight = airport
                .location
                .as_ref()
                .and_then(|location| daylight(location, today));
            println!("{}", airport_report(&evaluation, daylight.as_ref()));
        }
        evaluations.push(evaluation);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&evaluations)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wind_command() {
        let args = Args::try_parse_from([
            "runway-wind",
            "wind",
            "--report",
            "METAR LIRF 121150Z 26010KT 9999",
            "--runways",
            "262(260)",
            "--json",
        ])
        .unwrap();

        match args.command {
            Command::Wind {
                limits, json, ..
            } => {
                assert!(limits.is_none());
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_limits_require_aircraft() {
        let result = Args::try_parse_from([
            "runway-wind",
            "wind",
            "--report",
            "26010KT",
            "--runways",
            "262(260)",
            "--limits",
            "limits.csv",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "runway-wind",
            "decode",
            "--report",
            "26010KT",
            "--verbose",
            "--config",
            "custom.toml",
        ])
        .unwrap();
        assert!(args.verbose);
        assert_eq!(args.config, Some(PathBuf::from("custom.toml")));
    }
}
