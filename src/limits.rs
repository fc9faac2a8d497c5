//! Aircraft wind limits and tier classification
//!
//! Limits are loaded once, validated up front, and then only read. All
//! comparisons use `>=`: a value that meets a limit exactly is treated as
//! exceeding it.

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::RunwayWindError;
use crate::runway::WindComponentResult;

/// Operating wind limits of one aircraft type, knots
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftLimits {
    pub max_wind_kt: f64,
    pub max_headwind_kt: f64,
    pub max_tailwind_kt: f64,
    pub max_crosswind_dry_kt: f64,
    pub max_crosswind_wet_kt: f64,
}

impl AircraftLimits {
    /// Reject negative or non-finite values and a wet crosswind limit looser
    /// than the dry one
    pub fn validate(&self) -> Result<(), RunwayWindError> {
        let fields = [
            ("max_wind_kt", self.max_wind_kt),
            ("max_headwind_kt", self.max_headwind_kt),
            ("max_tailwind_kt", self.max_tailwind_kt),
            ("max_crosswind_dry_kt", self.max_crosswind_dry_kt),
            ("max_crosswind_wet_kt", self.max_crosswind_wet_kt),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(RunwayWindError::invalid_limits(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if self.max_crosswind_wet_kt > self.max_crosswind_dry_kt {
            return Err(RunwayWindError::invalid_limits(format!(
                "wet crosswind limit ({} kt) exceeds dry crosswind limit ({} kt)",
                self.max_crosswind_wet_kt, self.max_crosswind_dry_kt
            )));
        }

        Ok(())
    }
}

/// One row of the aircraft limits table
#[derive(Debug, Deserialize)]
struct LimitsRow {
    aircraft: String,
    max_wind_kt: f64,
    max_headwind_kt: f64,
    max_tailwind_kt: f64,
    max_crosswind_dry_kt: f64,
    max_crosswind_wet_kt: f64,
}

impl From<LimitsRow> for AircraftLimits {
    fn from(row: LimitsRow) -> Self {
        Self {
            max_wind_kt: row.max_wind_kt,
            max_headwind_kt: row.max_headwind_kt,
            max_tailwind_kt: row.max_tailwind_kt,
            max_crosswind_dry_kt: row.max_crosswind_dry_kt,
            max_crosswind_wet_kt: row.max_crosswind_wet_kt,
        }
    }
}

/// Load the limits of `aircraft` from a CSV table and validate them
pub fn load_limits(path: &Path, aircraft: &str) -> crate::Result<AircraftLimits> {
    info!("Loading aircraft limits for {} from {:?}", aircraft, path);
    let file = std::fs::File::open(path)
        .map_err(|e| RunwayWindError::data_file(path.display().to_string(), e.to_string()))?;
    load_limits_from_reader(file, aircraft)
}

/// Load the limits of `aircraft` from CSV content.
///
/// Expected header:
/// `aircraft,max_wind_kt,max_headwind_kt,max_tailwind_kt,max_crosswind_dry_kt,max_crosswind_wet_kt`
pub fn load_limits_from_reader<R: Read>(
    reader: R,
    aircraft: &str,
) -> Result<AircraftLimits, RunwayWindError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    for row in csv_reader.deserialize::<LimitsRow>() {
        let row = row.map_err(|e| RunwayWindError::invalid_limits(e.to_string()))?;
        if row.aircraft.eq_ignore_ascii_case(aircraft) {
            let name = row.aircraft.clone();
            let limits = AircraftLimits::from(row);
            limits.validate()?;
            debug!("Limits for {}: {:?}", name, limits);
            return Ok(limits);
        }
    }

    Err(RunwayWindError::invalid_limits(format!(
        "no limits found for aircraft '{aircraft}'"
    )))
}

/// Three-tier verdict for one metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Ok,
    Caution,
    Exceeded,
}

impl Tier {
    fn against(value: f64, limit: f64) -> Self {
        if value >= limit { Tier::Exceeded } else { Tier::Ok }
    }

    /// Color-coded marker for terminal output
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            Tier::Ok => "🟢",
            Tier::Caution => "🟡",
            Tier::Exceeded => "🔴",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Ok => write!(f, "within limits"),
            Tier::Caution => write!(f, "caution"),
            Tier::Exceeded => write!(f, "exceeded"),
        }
    }
}

/// Per-metric tiers for one runway end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindClassification {
    /// `None` when there is no headwind component to show
    pub headwind: Option<Tier>,
    /// `None` when there is no tailwind component to show
    pub tailwind: Option<Tier>,
    /// `None` when only variable winds were reported
    pub crosswind: Option<Tier>,
    pub total_wind: Tier,
}

impl WindClassification {
    /// Most severe tier across all shown metrics
    #[must_use]
    pub fn overall(&self) -> Tier {
        [self.headwind, self.tailwind, self.crosswind, Some(self.total_wind)]
            .into_iter()
            .flatten()
            .max()
            .unwrap_or(Tier::Ok)
    }
}

/// Classify worst-case components against aircraft limits.
///
/// Crosswind is exceeded at the dry limit and caution at the wet limit.
#[must_use]
pub fn classify(result: &WindComponentResult, limits: &AircraftLimits) -> WindClassification {
    let headwind = (result.max_headwind_kt > 0.0)
        .then(|| Tier::against(result.max_headwind_kt, limits.max_headwind_kt));
    let tailwind = (result.max_tailwind_kt > 0.0)
        .then(|| Tier::against(result.max_tailwind_kt, limits.max_tailwind_kt));

    let crosswind = result.components_determined().then(|| {
        if result.max_crosswind_kt >= limits.max_crosswind_dry_kt {
            Tier::Exceeded
        } else if result.max_crosswind_kt >= limits.max_crosswind_wet_kt {
            Tier::Caution
        } else {
            Tier::Ok
        }
    });

    WindClassification {
        headwind,
        tailwind,
        crosswind,
        total_wind: Tier::against(result.max_wind_kt, limits.max_wind_kt),
    }
}
