//! `runway-wind` - Runway wind components and safety indicators from METAR/TAF
//!
//! This library decodes wind, visibility and ceiling groups from aviation
//! weather reports, resolves them into headwind, tailwind and crosswind per
//! runway end, classifies the results against aircraft limits and checks
//! TAF periods against alternate planning minima.

pub mod airports;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod limits;
pub mod logging;
pub mod render;
pub mod report;
pub mod runway;
pub mod weather;

// Re-export core types for public API
pub use airports::{Airport, Coordinates, load_airports};
pub use cache::ReportCache;
pub use config::AppConfig;
pub use error::RunwayWindError;
pub use evaluation::{
    AirportEvaluation, AlternateVerdict, EvaluationOptions, ReportEvaluation, SegmentVerdict,
    WindStatus, evaluate_airport, evaluate_alternate, evaluate_report,
};
pub use limits::{AircraftLimits, Tier, WindClassification, classify, load_limits};
pub use report::{
    ReportKind, TafSegment, WeatherSnapshot, WindDirection, WindObservation,
    extract_weather_conditions, extract_winds, segment_taf,
};
pub use runway::{
    ApproachProcedure, RunwayEnd, WindComponentResult, alternate_minima, components,
    format_runway_name, parse_procedures, parse_runways, reduce_max,
};
pub use weather::{Daylight, ReportClient, daylight, is_placeholder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, RunwayWindError>;
