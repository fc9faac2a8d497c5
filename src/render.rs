//! Plain-text rendering of evaluation results

use std::fmt;

use crate::evaluation::{
    AirportEvaluation, AlternateVerdict, ReportEvaluation, RunwayEvaluation, SegmentVerdict,
    WindStatus,
};
use crate::limits::{Tier, WindClassification};
use crate::weather::Daylight;

const NOT_REPORTED: &str = "not reported";

fn tier_marker(tier: Option<Tier>) -> String {
    tier.map(|tier| format!(" {} {}", tier.marker(), tier))
        .unwrap_or_default()
}

impl fmt::Display for RunwayEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (result, classification) = match &self.wind {
            WindStatus::NotReported => {
                return writeln!(f, "   {}: wind {}", self.runway, NOT_REPORTED);
            }
            WindStatus::Computed {
                result,
                classification,
            } => (result, classification.as_ref()),
        };

        writeln!(
            f,
            "   {}{}",
            self.runway,
            tier_marker(classification.map(WindClassification::overall))
        )?;

        // Zero headwind/tailwind means there is no such component
        if result.max_headwind_kt > 0.0 {
            writeln!(
                f,
                "      Headwind  {:5.1} kt{}",
                result.max_headwind_kt,
                tier_marker(classification.and_then(|c| c.headwind))
            )?;
        }
        if result.max_tailwind_kt > 0.0 {
            writeln!(
                f,
                "      Tailwind  {:5.1} kt{}",
                result.max_tailwind_kt,
                tier_marker(classification.and_then(|c| c.tailwind))
            )?;
        }

        if result.components_determined() {
            let side = result
                .crosswind_side
                .map(|side| format!(" {side}"))
                .unwrap_or_default();
            writeln!(
                f,
                "      Crosswind {:5.1} kt{}{}",
                result.max_crosswind_kt,
                side,
                tier_marker(classification.and_then(|c| c.crosswind))
            )?;
        } else {
            writeln!(f, "      Crosswind undetermined (variable wind)")?;
        }
        writeln!(
            f,
            "      Wind      {:5.1} kt{}",
            result.max_wind_kt,
            tier_marker(classification.map(|c| c.total_wind))
        )
    }
}

impl fmt::Display for ReportEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " {}: {}", self.kind, self.raw)?;

        match &self.snapshot {
            Some(snapshot) => writeln!(f, "   {snapshot}")?,
            None => writeln!(f, "   weather {NOT_REPORTED}")?,
        }

        if self.runways.is_empty() {
            return writeln!(f, "   no runway data");
        }
        for runway in &self.runways {
            write!(f, "{runway}")?;
        }
        Ok(())
    }
}

impl fmt::Display for AlternateVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlternateVerdict::Suitable(minima) => write!(
                f,
                "{} suitable (needs {} m / {} ft, {})",
                Tier::Ok.marker(),
                minima.required_visibility_m,
                minima.required_ceiling_ft,
                minima.selected.name
            ),
            AlternateVerdict::Unsuitable(minima) => write!(
                f,
                "{} below alternate minima (needs {} m / {} ft, {})",
                Tier::Exceeded.marker(),
                minima.required_visibility_m,
                minima.required_ceiling_ft,
                minima.selected.name
            ),
            AlternateVerdict::NoProcedureData => write!(f, "no procedure data"),
            AlternateVerdict::NoForecast => write!(f, "no forecast"),
        }
    }
}

impl fmt::Display for SegmentVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.snapshot {
            Some(snapshot) => writeln!(f, "   {} ({}): {}", self.label, snapshot, self.verdict),
            None => writeln!(f, "   {}: {}", self.label, self.verdict),
        }
    }
}

/// Text report for one airport, METAR then TAF then alternate planning
#[must_use]
pub fn airport_report(evaluation: &AirportEvaluation, daylight: Option<&Daylight>) -> String {
    let mut out = if evaluation.name.is_empty() {
        format!("{}\n", evaluation.icao)
    } else {
        format!("{} {}\n", evaluation.icao, evaluation.name)
    };

    if let Some(day) = daylight {
        out.push_str(&format!(
            "   ☀️ Sunrise {}, sunset {}\n",
            day.sunrise.format("%H:%MZ"),
            day.sunset.format("%H:%MZ")
        ));
    }

    out.push_str(&evaluation.metar.to_string());
    out.push_str(&evaluation.taf.to_string());

    out.push_str(" Alternate:\n");
    for segment in &evaluation.alternate {
        out.push_str(&segment.to_string());
    }

    out
}
