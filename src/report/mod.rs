//! Report parsing module
//!
//! Pattern-based extraction of wind, visibility and ceiling groups from raw
//! METAR and TAF text, and segmentation of TAFs into forecast periods.

pub mod taf;
pub mod tokenizer;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use taf::{SegmentKind, TafSegment, latest_taf, segment_taf};
pub use tokenizer::{
    CEILING_UNRESTRICTED_FT, VISIBILITY_UNRESTRICTED_M, WeatherSnapshot, WindDirection,
    WindObservation, extract_weather_conditions, extract_winds,
};

/// Which product a raw report text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    Metar,
    Taf,
}

impl ReportKind {
    /// Guess the product from the text itself
    #[must_use]
    pub fn detect(report: &str) -> Self {
        let first = report.split_whitespace().next().unwrap_or_default();
        let has_change_group = report
            .split_whitespace()
            .any(|token| token == "BECMG" || token == "TEMPO" || token.starts_with("FM"));
        if first == "TAF" || has_change_group {
            ReportKind::Taf
        } else {
            ReportKind::Metar
        }
    }

    #[must_use]
    pub fn cache_prefix(self) -> &'static str {
        match self {
            ReportKind::Metar => "metar",
            ReportKind::Taf => "taf",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Metar => write!(f, "METAR"),
            ReportKind::Taf => write!(f, "TAF"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_report_kind() {
        assert_eq!(
            ReportKind::detect("TAF LIRF 121100Z 1212/1318 24010KT 9999"),
            ReportKind::Taf
        );
        assert_eq!(
            ReportKind::detect("LIRF 121100Z 1212/1318 24010KT 9999 BECMG 1214/1216 8000"),
            ReportKind::Taf
        );
        assert_eq!(
            ReportKind::detect("METAR LIRF 121150Z 24015KT 9999 FEW030"),
            ReportKind::Metar
        );
        assert_eq!(ReportKind::detect(""), ReportKind::Metar);
    }
}
