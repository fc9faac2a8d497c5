//! METAR/TAF token extraction
//!
//! This is a best-effort tokenizer, not a grammar parser. It scans a raw
//! report for the handful of groups the wind checker needs (wind, prevailing
//! visibility, broken/overcast layers) and drops every fragment that does not
//! match. Nothing here returns an error: a report with no usable group simply
//! yields an empty sequence or the "unrestricted" sentinels.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

/// Visibility sentinel meaning "10 km or more / not reported"
pub const VISIBILITY_UNRESTRICTED_M: u32 = 9999;

/// Ceiling sentinel meaning "no broken or overcast layer reported"
pub const CEILING_UNRESTRICTED_FT: u32 = 99999;

/// dddff(f)Gff(f)KT, direction may be VRB
static WIND_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{3}|VRB)(\d{2,3})(?:G(\d{2,3}))?KT\b").expect("valid wind group regex")
});

/// DDHH/DDHH validity ranges
static VALIDITY_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}/\d{4}\b").expect("valid validity range regex"));

/// DDHHMMZ issue / observation times
static ISSUE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{6}Z\b").expect("valid issue time regex"));

/// Runway visual range groups such as R26/1200N, which carry 4-digit runs too
static RUNWAY_VISUAL_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bR\d{2}[LRC]?/\S+").expect("valid runway visual range regex")
});

static CLOUD_LAYER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(BKN|OVC)(\d{3})").expect("valid cloud layer regex"));

/// Direction the wind is blowing from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindDirection {
    /// True direction in degrees, normalised to [0, 360)
    Degrees(u16),
    /// VRB: no usable angle
    Variable,
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindDirection::Degrees(deg) => write!(f, "{deg:03}"),
            WindDirection::Variable => write!(f, "VRB"),
        }
    }
}

/// One decoded wind group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindObservation {
    pub direction: WindDirection,
    pub speed_kt: u16,
    pub gust_kt: Option<u16>,
}

impl WindObservation {
    #[must_use]
    pub fn new(direction: WindDirection, speed_kt: u16, gust_kt: Option<u16>) -> Self {
        Self {
            direction,
            speed_kt,
            gust_kt,
        }
    }

    /// 00000KT and VRB00KT
    #[must_use]
    pub fn is_calm(&self) -> bool {
        self.speed_kt == 0
            && matches!(
                self.direction,
                WindDirection::Degrees(0) | WindDirection::Variable
            )
    }

    /// Speed used for component math; the gust when asked for and reported
    #[must_use]
    pub fn effective_speed(&self, include_gusts: bool) -> u16 {
        match self.gust_kt {
            Some(gust) if include_gusts => gust.max(self.speed_kt),
            _ => self.speed_kt,
        }
    }
}

impl fmt::Display for WindObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", self.direction, self.speed_kt)?;
        if let Some(gust) = self.gust_kt {
            write!(f, "G{gust:02}")?;
        }
        write!(f, "KT")
    }
}

/// Visibility and ceiling minima found in a report (or a span of one)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub visibility_m: u32,
    pub ceiling_ft: u32,
}

impl WeatherSnapshot {
    /// Both fields at their "not reported" sentinel
    pub const UNRESTRICTED: Self = Self {
        visibility_m: VISIBILITY_UNRESTRICTED_M,
        ceiling_ft: CEILING_UNRESTRICTED_FT,
    };

    #[must_use]
    pub fn new(visibility_m: u32, ceiling_ft: u32) -> Self {
        Self {
            visibility_m,
            ceiling_ft,
        }
    }

    #[must_use]
    pub fn visibility_restricted(&self) -> bool {
        self.visibility_m < VISIBILITY_UNRESTRICTED_M
    }

    #[must_use]
    pub fn ceiling_restricted(&self) -> bool {
        self.ceiling_ft < CEILING_UNRESTRICTED_FT
    }
}

impl Default for WeatherSnapshot {
    fn default() -> Self {
        Self::UNRESTRICTED
    }
}

impl fmt::Display for WeatherSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.visibility_restricted() {
            write!(f, "vis {} m", self.visibility_m)?;
        } else {
            write!(f, "vis 10 km+")?;
        }
        if self.ceiling_restricted() {
            write!(f, ", ceiling {} ft", self.ceiling_ft)
        } else {
            write!(f, ", no ceiling")
        }
    }
}

/// Extract every wind group from a METAR or TAF, in source order.
///
/// Calm groups are dropped, as are groups whose direction is above 360.
/// A direction of 360 is reported as 0.
#[must_use]
pub fn extract_winds(report: &str) -> Vec<WindObservation> {
    let mut winds = Vec::new();

    for caps in WIND_GROUP.captures_iter(report) {
        let direction = match &caps[1] {
            "VRB" => WindDirection::Variable,
            digits => match digits.parse::<u16>() {
                Ok(deg) if deg <= 360 => WindDirection::Degrees(deg % 360),
                _ => {
                    debug!("Skipping wind group with invalid direction: {}", &caps[0]);
                    continue;
                }
            },
        };

        let Ok(speed_kt) = caps[2].parse::<u16>() else {
            continue;
        };
        let gust_kt = caps.get(3).and_then(|g| g.as_str().parse::<u16>().ok());

        let observation = WindObservation::new(direction, speed_kt, gust_kt);
        if observation.is_calm() {
            continue;
        }
        winds.push(observation);
    }

    debug!("Extracted {} wind groups", winds.len());
    winds
}

/// Extract the worst visibility and the lowest broken/overcast ceiling.
///
/// Validity ranges, issue times and RVR groups are removed first so their
/// digit runs are not read as visibility. CAVOK contributes 9999. Fields
/// with no matching token come back as the unrestricted sentinels.
#[must_use]
pub fn extract_weather_conditions(report: &str) -> WeatherSnapshot {
    let cleaned = VALIDITY_RANGE.replace_all(report, " ");
    let cleaned = ISSUE_TIME.replace_all(&cleaned, " ");
    let cleaned = RUNWAY_VISUAL_RANGE.replace_all(&cleaned, " ");

    let mut visibilities: Vec<u32> = cleaned
        .split_whitespace()
        .filter(|token| token.len() == 4 && token.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|token| token.parse().ok())
        .collect();

    if cleaned.split_whitespace().any(|token| token == "CAVOK") {
        visibilities.push(VISIBILITY_UNRESTRICTED_M);
    }

    let ceiling_ft = CLOUD_LAYER
        .captures_iter(&cleaned)
        .filter_map(|caps| caps[2].parse::<u32>().ok())
        .map(|hundreds| hundreds * 100)
        .min()
        .unwrap_or(CEILING_UNRESTRICTED_FT);

    let visibility_m = visibilities
        .into_iter()
        .min()
        .unwrap_or(VISIBILITY_UNRESTRICTED_M);

    WeatherSnapshot::new(visibility_m, ceiling_ft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("00000KT")]
    #[case("VRB00KT")]
    #[case("METAR LIRF 121150Z 00000KT CAVOK 15/08 Q1020")]
    fn test_calm_winds_are_dropped(#[case] report: &str) {
        assert!(extract_winds(report).is_empty());
    }

    #[test]
    fn test_wind_with_gust() {
        let winds = extract_winds("24015G25KT");
        assert_eq!(
            winds,
            vec![WindObservation::new(WindDirection::Degrees(240), 15, Some(25))]
        );
    }

    #[test]
    fn test_variable_wind_is_kept_as_variable() {
        let winds = extract_winds("METAR LIMC 121150Z VRB03KT 9999 FEW040");
        assert_eq!(
            winds,
            vec![WindObservation::new(WindDirection::Variable, 3, None)]
        );
    }

    #[test]
    fn test_taf_winds_in_source_order() {
        let taf = "TAF LIRF 121100Z 1212/1318 24010KT 9999 SCT030 \
                   BECMG 1214/1216 27018G30KT TEMPO 1218/1222 VRB05KT";
        let winds = extract_winds(taf);
        assert_eq!(winds.len(), 3);
        assert_eq!(winds[0].direction, WindDirection::Degrees(240));
        assert_eq!(winds[1].gust_kt, Some(30));
        assert_eq!(winds[2].direction, WindDirection::Variable);
    }

    #[test]
    fn test_direction_360_normalised_and_invalid_skipped() {
        let winds = extract_winds("36012KT 37010KT 05105KT");
        assert_eq!(
            winds,
            vec![
                WindObservation::new(WindDirection::Degrees(0), 12, None),
                WindObservation::new(WindDirection::Degrees(51), 5, None),
            ]
        );
    }

    #[rstest]
    #[case("")]
    #[case("METAR not available")]
    #[case("24015MPS 9999")]
    fn test_no_wind_group(#[case] report: &str) {
        assert!(extract_winds(report).is_empty());
    }

    #[test]
    fn test_three_digit_speed() {
        let winds = extract_winds("270105G120KT");
        assert_eq!(winds[0].speed_kt, 105);
        assert_eq!(winds[0].gust_kt, Some(120));
    }

    #[test]
    fn test_effective_speed() {
        let wind = WindObservation::new(WindDirection::Degrees(240), 15, Some(25));
        assert_eq!(wind.effective_speed(false), 15);
        assert_eq!(wind.effective_speed(true), 25);

        let steady = WindObservation::new(WindDirection::Degrees(240), 15, None);
        assert_eq!(steady.effective_speed(true), 15);
    }

    #[test]
    fn test_broken_layer_controls_ceiling() {
        let snapshot =
            extract_weather_conditions("METAR LIRF 121150Z 24015KT 9999 BKN020 OVC035 15/08 Q1013");
        assert_eq!(snapshot, WeatherSnapshot::new(9999, 2000));
    }

    #[test]
    fn test_cavok() {
        let snapshot = extract_weather_conditions("METAR LIRF 121150Z 24015KT CAVOK 15/08 Q1013");
        assert_eq!(snapshot, WeatherSnapshot::UNRESTRICTED);
    }

    #[test]
    fn test_time_groups_are_not_visibility() {
        let snapshot =
            extract_weather_conditions("TAF LIRF 121100Z 1212/1318 24010KT 6000 SCT030");
        assert_eq!(snapshot.visibility_m, 6000);
        assert!(!snapshot.ceiling_restricted());
    }

    #[test]
    fn test_worst_visibility_wins() {
        let snapshot = extract_weather_conditions("9999 TEMPO 1214/1216 3000 SHRA BKN012CB");
        assert_eq!(snapshot, WeatherSnapshot::new(3000, 1200));
    }

    #[test]
    fn test_runway_visual_range_ignored() {
        let snapshot = extract_weather_conditions("METAR EGLL 121150Z 0800 R27L/1200N FG VV002");
        assert_eq!(snapshot.visibility_m, 800);
    }

    #[test]
    fn test_nothing_reported() {
        assert_eq!(
            extract_weather_conditions("TAF not available"),
            WeatherSnapshot::UNRESTRICTED
        );
        assert_eq!(extract_weather_conditions(""), WeatherSnapshot::UNRESTRICTED);
    }

    #[test]
    fn test_display() {
        let wind = WindObservation::new(WindDirection::Degrees(40), 8, Some(18));
        assert_eq!(wind.to_string(), "04008G18KT");
        assert_eq!(
            WeatherSnapshot::new(800, 200).to_string(),
            "vis 800 m, ceiling 200 ft"
        );
    }
}
