//! TAF change-group segmentation
//!
//! A TAF is split into its base period and the change groups that follow it.
//! Each segment gets its own visibility/ceiling snapshot. Persistent changes
//! (BECMG, FM) inherit whatever they leave unreported from the running state;
//! temporary ones (TEMPO, PROBnn) are reported as written and never feed the
//! running state, so a short-lived deterioration cannot mask the trend.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

use super::tokenizer::{
    CEILING_UNRESTRICTED_FT, VISIBILITY_UNRESTRICTED_M, WeatherSnapshot,
    extract_weather_conditions,
};

static CHANGE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(BECMG|PROB\d{2}(?: TEMPO)?|TEMPO|FM\d{6})\b").expect("valid change marker regex")
});

static VALIDITY_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}/\d{4}\b").expect("valid validity range regex"));

static TAF_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bTAF\b").expect("valid TAF header regex"));

/// Leading tokens dropped before segmentation
const PREFIX_TOKENS: [&str; 3] = ["TAF", "AMD", "COR"];

/// How a segment relates to the ones before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Base,
    Becoming,
    From,
    Temporary,
    Probability,
}

impl SegmentKind {
    fn from_marker(marker: &str) -> Self {
        if marker == "BECMG" {
            SegmentKind::Becoming
        } else if marker == "TEMPO" {
            SegmentKind::Temporary
        } else if marker.starts_with("PROB") {
            SegmentKind::Probability
        } else {
            SegmentKind::From
        }
    }

    /// Whether the segment's conditions carry forward to later segments
    #[must_use]
    pub fn persists(self) -> bool {
        matches!(
            self,
            SegmentKind::Base | SegmentKind::Becoming | SegmentKind::From
        )
    }
}

/// One forecast period of a TAF
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TafSegment {
    pub label: String,
    pub kind: SegmentKind,
    pub snapshot: WeatherSnapshot,
}

impl fmt::Display for TafSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.snapshot)
    }
}

/// The first forecast of a text that may hold several TAFs.
///
/// The weather service lists the latest issue first; everything from the
/// next `TAF` header on is dropped.
#[must_use]
pub fn latest_taf(text: &str) -> &str {
    let text = text.trim();
    match TAF_HEADER.find_iter(text).find(|header| header.start() > 0) {
        Some(next) => text[..next.start()].trim_end(),
        None => text,
    }
}

/// Split a TAF into its base period and change groups, in source order.
///
/// Returns an empty vector only for blank input; anything else yields at
/// least the base segment.
#[must_use]
pub fn segment_taf(taf: &str) -> Vec<TafSegment> {
    let text = normalize(taf);
    if text.is_empty() {
        return Vec::new();
    }

    let markers: Vec<_> = CHANGE_MARKER.find_iter(&text).collect();
    let base_end = markers.first().map_or(text.len(), |m| m.start());

    let mut raw_segments = Vec::with_capacity(markers.len() + 1);
    let base_span = &text[..base_end];
    raw_segments.push((
        validity_range(base_span).unwrap_or_else(|| "Base".to_string()),
        SegmentKind::Base,
        base_span,
    ));

    for (index, marker) in markers.iter().enumerate() {
        let span_end = markers.get(index + 1).map_or(text.len(), |next| next.start());
        let span = &text[marker.end()..span_end];
        let kind = SegmentKind::from_marker(marker.as_str());

        let label = match (kind, validity_range(span)) {
            (SegmentKind::From, _) | (_, None) => marker.as_str().to_string(),
            (_, Some(range)) => format!("{} {range}", marker.as_str()),
        };
        raw_segments.push((label, kind, span));
    }

    let mut carried = WeatherSnapshot::UNRESTRICTED;
    let segments: Vec<TafSegment> = raw_segments
        .into_iter()
        .map(|(label, kind, span)| {
            let raw = extract_weather_conditions(span);
            let snapshot = if kind.persists() {
                let merged = inherit_unreported(raw, carried);
                carried = merged;
                merged
            } else {
                raw
            };
            TafSegment {
                label,
                kind,
                snapshot,
            }
        })
        .collect();

    debug!("Segmented TAF into {} periods", segments.len());
    segments
}

fn normalize(taf: &str) -> String {
    let tokens: Vec<&str> = latest_taf(taf)
        .split_whitespace()
        .skip_while(|token| PREFIX_TOKENS.contains(token))
        .collect();
    tokens.join(" ")
}

fn validity_range(span: &str) -> Option<String> {
    VALIDITY_RANGE.find(span).map(|m| m.as_str().to_string())
}

fn inherit_unreported(raw: WeatherSnapshot, carried: WeatherSnapshot) -> WeatherSnapshot {
    WeatherSnapshot {
        visibility_m: if raw.visibility_m == VISIBILITY_UNRESTRICTED_M {
            carried.visibility_m
        } else {
            raw.visibility_m
        },
        ceiling_ft: if raw.ceiling_ft == CEILING_UNRESTRICTED_FT {
            carried.ceiling_ft
        } else {
            raw.ceiling_ft
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAF: &str = "TAF LIRF 121100Z 1212/1318 24010KT 6000 BKN015 \
                       BECMG 1214/1216 27015KT 8000 \
                       TEMPO 1218/1222 2000 TSRA OVC008 \
                       FM130600 30008KT BKN025";

    #[test]
    fn test_segments_in_source_order() {
        let segments = segment_taf(TAF);
        let labels: Vec<&str> = segments.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["1212/1318", "BECMG 1214/1216", "TEMPO 1218/1222", "FM130600"]
        );
        assert_eq!(segments[0].kind, SegmentKind::Base);
        assert_eq!(segments[2].kind, SegmentKind::Temporary);
        assert_eq!(segments[3].kind, SegmentKind::From);
    }

    #[test]
    fn test_becmg_inherits_unreported_ceiling() {
        let segments = segment_taf(TAF);
        assert_eq!(segments[0].snapshot, WeatherSnapshot::new(6000, 1500));
        assert_eq!(segments[1].snapshot, WeatherSnapshot::new(8000, 1500));
    }

    #[test]
    fn test_tempo_reports_raw_and_does_not_carry() {
        let segments = segment_taf(TAF);
        assert_eq!(segments[2].snapshot, WeatherSnapshot::new(2000, 800));
        // FM inherits visibility from BECMG, not from the TEMPO
        assert_eq!(segments[3].snapshot, WeatherSnapshot::new(8000, 2500));
    }

    #[test]
    fn test_tempo_without_own_values_stays_unrestricted() {
        let segments = segment_taf("TAF LIMC 1212/1318 3000 BKN010 TEMPO 1214/1216 SHRA");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].snapshot, WeatherSnapshot::UNRESTRICTED);
    }

    #[test]
    fn test_one_becmg_one_tempo_gives_three_segments() {
        let segments = segment_taf(
            "TAF LIML 121100Z 1212/1318 VRB03KT 9999 SCT040 \
             BECMG 1216/1218 4000 BR TEMPO 1300/1306 0800 FG BKN002 \
             BECMG 1308/1310 9999",
        );
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[1].snapshot.visibility_m, 4000);
        assert_eq!(segments[2].snapshot, WeatherSnapshot::new(800, 200));
        // 9999 is the sentinel, so the later BECMG inherits 4000 and no ceiling
        assert_eq!(segments[3].snapshot, WeatherSnapshot::new(4000, CEILING_UNRESTRICTED_FT));
    }

    #[test]
    fn test_amendment_prefix_and_whitespace() {
        let segments = segment_taf("TAF   AMD\nLIRF 121300Z   1213/1318\t24010KT 9999");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].label, "1213/1318");
    }

    #[test]
    fn test_base_label_defaults() {
        let segments = segment_taf("LIRF 24010KT 9999 BECMG 27015KT");
        assert_eq!(segments[0].label, "Base");
        assert_eq!(segments[1].label, "BECMG");
    }

    #[test]
    fn test_probability_groups_are_temporary() {
        let segments =
            segment_taf("TAF LIRF 1212/1318 9999 PROB30 TEMPO 1220/1224 1500 TSRA BKN008CB");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].label, "PROB30 TEMPO 1220/1224");
        assert_eq!(segments[1].kind, SegmentKind::Probability);
        assert!(!segments[1].kind.persists());
        assert_eq!(segments[1].snapshot, WeatherSnapshot::new(1500, 800));
    }

    #[test]
    fn test_latest_taf() {
        let text = "TAF LIRF 121100Z 1212/1318 24010KT 9999\nTAF LIRF 120500Z 1206/1312 24010KT 0800 FG";
        assert_eq!(latest_taf(text), "TAF LIRF 121100Z 1212/1318 24010KT 9999");
        assert_eq!(latest_taf("  LIRF 1212/1318 24010KT 9999 "), "LIRF 1212/1318 24010KT 9999");
    }

    #[test]
    fn test_second_taf_does_not_leak_into_first() {
        let segments = segment_taf(
            "TAF LIRF 121100Z 1212/1318 24010KT 9999 BECMG 1214/1216 4000 BR\n\
             TAF LIRF 121700Z 1218/1324 24010KT 0800 FG",
        );
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].snapshot, WeatherSnapshot::UNRESTRICTED);
        assert_eq!(segments[1].label, "BECMG 1214/1216");
        assert_eq!(segments[1].snapshot.visibility_m, 4000);
    }

    #[test]
    fn test_blank_input() {
        assert!(segment_taf("   ").is_empty());
    }
}
