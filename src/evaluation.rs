//! Evaluation pipeline
//!
//! Runs raw report text through tokenizer, component calculator and limit
//! classifier for every runway end of an airport, and checks each TAF
//! period against the alternate minima of the field.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::airports::Airport;
use crate::config::EvaluationConfig;
use crate::limits::{AircraftLimits, Tier, WindClassification, classify};
use crate::report::{
    ReportKind, SegmentKind, WeatherSnapshot, WindObservation, extract_weather_conditions,
    extract_winds, segment_taf,
};
use crate::runway::{
    AlternateMinima, ApproachProcedure, RunwayEnd, WindComponentResult, alternate_minima,
    reduce_max_with,
};
use crate::weather::is_placeholder;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationOptions {
    /// Use gust speed instead of sustained speed when one is reported
    pub include_gusts: bool,
}

impl From<&EvaluationConfig> for EvaluationOptions {
    fn from(config: &EvaluationConfig) -> Self {
        Self {
            include_gusts: config.include_gusts,
        }
    }
}

/// Wind outcome for one runway end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WindStatus {
    /// The report carried no usable wind group
    NotReported,
    Computed {
        result: WindComponentResult,
        /// Present when aircraft limits were supplied
        classification: Option<WindClassification>,
    },
}

impl WindStatus {
    #[must_use]
    pub fn tier(&self) -> Option<Tier> {
        match self {
            WindStatus::NotReported => None,
            WindStatus::Computed { classification, .. } => {
                classification.as_ref().map(WindClassification::overall)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayEvaluation {
    pub runway: RunwayEnd,
    pub designator: String,
    pub wind: WindStatus,
}

/// Everything derived from one METAR or TAF text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEvaluation {
    pub kind: ReportKind,
    pub raw: String,
    /// False when the text is a "not available" placeholder
    pub available: bool,
    pub observations: Vec<WindObservation>,
    /// Worst visibility and ceiling over the whole text
    pub snapshot: Option<WeatherSnapshot>,
    pub runways: Vec<RunwayEvaluation>,
}

impl ReportEvaluation {
    /// Most severe tier over all runway ends, if any was classified
    #[must_use]
    pub fn worst_tier(&self) -> Option<Tier> {
        self.runways.iter().filter_map(|r| r.wind.tier()).max()
    }
}

/// Evaluate one report against every runway end.
///
/// Placeholders and reports without a wind group give
/// [`WindStatus::NotReported`] for each runway, never a zero result.
#[must_use]
pub fn evaluate_report(
    kind: ReportKind,
    text: &str,
    runways: &[RunwayEnd],
    limits: Option<&AircraftLimits>,
    options: EvaluationOptions,
) -> ReportEvaluation {
    let available = !is_placeholder(text);
    let observations = if available {
        extract_winds(text)
    } else {
        Vec::new()
    };
    let snapshot = available.then(|| extract_weather_conditions(text));

    debug!(
        "{}: {} wind groups, {} runway ends",
        kind,
        observations.len(),
        runways.len()
    );

    let runways = runways
        .iter()
        .map(|runway| {
            let wind = if observations.is_empty() {
                WindStatus::NotReported
            } else {
                let result =
                    reduce_max_with(&observations, runway.true_heading_deg, options.include_gusts);
                WindStatus::Computed {
                    result,
                    classification: limits.map(|limits| classify(&result, limits)),
                }
            };
            RunwayEvaluation {
                runway: *runway,
                designator: runway.designator(),
                wind,
            }
        })
        .collect();

    ReportEvaluation {
        kind,
        raw: text.trim().to_string(),
        available,
        observations,
        snapshot,
        runways,
    }
}

/// Alternate suitability of one forecast period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum AlternateVerdict {
    Suitable(AlternateMinima),
    Unsuitable(AlternateMinima),
    /// The field has no approach procedures on record
    NoProcedureData,
    /// No TAF to check
    NoForecast,
}

impl AlternateVerdict {
    #[must_use]
    pub fn is_suitable(&self) -> Option<bool> {
        match self {
            AlternateVerdict::Suitable(_) => Some(true),
            AlternateVerdict::Unsuitable(_) => Some(false),
            AlternateVerdict::NoProcedureData | AlternateVerdict::NoForecast => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentVerdict {
    pub label: String,
    pub kind: Option<SegmentKind>,
    pub snapshot: Option<WeatherSnapshot>,
    pub verdict: AlternateVerdict,
}

/// Check every TAF period against the alternate minima of the field
#[must_use]
pub fn evaluate_alternate(taf: &str, procedures: &[ApproachProcedure]) -> Vec<SegmentVerdict> {
    let segments = if is_placeholder(taf) {
        Vec::new()
    } else {
        segment_taf(taf)
    };

    if segments.is_empty() {
        return vec![SegmentVerdict {
            label: "TAF".to_string(),
            kind: None,
            snapshot: None,
            verdict: AlternateVerdict::NoForecast,
        }];
    }

    segments
        .into_iter()
        .map(|segment| {
            let verdict = match alternate_minima(procedures, &segment.snapshot) {
                Some(minima) if minima.suitable => AlternateVerdict::Suitable(minima),
                Some(minima) => AlternateVerdict::Unsuitable(minima),
                None => AlternateVerdict::NoProcedureData,
            };
            SegmentVerdict {
                label: segment.label,
                kind: Some(segment.kind),
                snapshot: Some(segment.snapshot),
                verdict,
            }
        })
        .collect()
}

/// Full evaluation of one airport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportEvaluation {
    pub icao: String,
    pub name: String,
    pub metar: ReportEvaluation,
    pub taf: ReportEvaluation,
    pub alternate: Vec<SegmentVerdict>,
}

impl AirportEvaluation {
    /// Most severe tier across METAR and TAF
    #[must_use]
    pub fn worst_tier(&self) -> Option<Tier> {
        self.metar.worst_tier().max(self.taf.worst_tier())
    }
}

pub fn evaluate_airport(
    airport: &Airport,
    metar: &str,
    taf: &str,
    limits: &AircraftLimits,
    options: EvaluationOptions,
) -> AirportEvaluation {
    let metar = evaluate_report(
        ReportKind::Metar,
        metar,
        &airport.runways,
        Some(limits),
        options,
    );
    let taf_evaluation =
        evaluate_report(ReportKind::Taf, taf, &airport.runways, Some(limits), options);
    let alternate = evaluate_alternate(taf, &airport.procedures);

    let evaluation = AirportEvaluation {
        icao: airport.icao.clone(),
        name: airport.name.clone(),
        metar,
        taf: taf_evaluation,
        alternate,
    };

    info!(
        "Evaluated {}: worst tier {}",
        evaluation.icao,
        evaluation
            .worst_tier()
            .map_or_else(|| "not reported".to_string(), |tier| tier.to_string())
    );

    evaluation
}
