//! Runway heading registry
//!
//! Runway ends are stored as `TTT(MMM)` pairs, true heading first and the
//! magnetic heading in parentheses, separated by semicolons:
//! `262(260);082(080)`. True headings drive the wind math; magnetic headings
//! give the designator painted on the runway.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

static RUNWAY_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3})\s*\(\s*(\d{1,3})\s*\)$").expect("valid runway end regex")
});

/// One end of a runway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunwayEnd {
    pub true_heading_deg: u16,
    pub magnetic_heading_deg: u16,
}

impl RunwayEnd {
    #[must_use]
    pub fn new(true_heading_deg: u16, magnetic_heading_deg: u16) -> Self {
        Self {
            true_heading_deg,
            magnetic_heading_deg,
        }
    }

    /// Designator such as `RWY26`
    #[must_use]
    pub fn designator(&self) -> String {
        format_runway_name(self.magnetic_heading_deg)
    }
}

impl fmt::Display for RunwayEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:03}° true)",
            self.designator(),
            self.true_heading_deg
        )
    }
}

/// Runway designator from a magnetic heading, rounded to the nearest 10°.
///
/// 262 gives `RWY26`, 265 gives `RWY27`, and headings that round to 0 are
/// runway 36.
#[must_use]
pub fn format_runway_name(magnetic_heading_deg: u16) -> String {
    let number = ((u32::from(magnetic_heading_deg) + 5) / 10) % 36;
    let number = if number == 0 { 36 } else { number };
    format!("RWY{number:02}")
}

/// Parse a semicolon-separated list of `TTT(MMM)` runway ends.
///
/// Entries that do not match, or carry a heading of 360 or more, are skipped.
/// An empty result means "no runway data".
#[must_use]
pub fn parse_runways(encoded: &str) -> Vec<RunwayEnd> {
    encoded
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let parsed = parse_runway_end(entry);
            if parsed.is_none() {
                debug!("Skipping malformed runway entry: {}", entry);
            }
            parsed
        })
        .collect()
}

fn parse_runway_end(entry: &str) -> Option<RunwayEnd> {
    let caps = RUNWAY_END.captures(entry)?;
    let true_heading = caps[1].parse::<u16>().ok().filter(|deg| *deg < 360)?;
    let magnetic_heading = caps[2].parse::<u16>().ok().filter(|deg| *deg < 360)?;
    Some(RunwayEnd::new(true_heading, magnetic_heading))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(262, "RWY26")]
    #[case(265, "RWY27")]
    #[case(84, "RWY08")]
    #[case(3, "RWY36")]
    #[case(356, "RWY36")]
    #[case(354, "RWY35")]
    #[case(180, "RWY18")]
    fn test_format_runway_name(#[case] heading: u16, #[case] expected: &str) {
        assert_eq!(format_runway_name(heading), expected);
    }

    #[test]
    fn test_parse_runways() {
        let runways = parse_runways("262(260);082(080)");
        assert_eq!(
            runways,
            vec![RunwayEnd::new(262, 260), RunwayEnd::new(82, 80)]
        );
        assert_eq!(runways[0].designator(), "RWY26");
        assert_eq!(runways[1].designator(), "RWY08");
    }

    #[test]
    fn test_parse_runways_tolerates_whitespace() {
        let runways = parse_runways(" 162 ( 160 ) ; 342(340) ;");
        assert_eq!(
            runways,
            vec![RunwayEnd::new(162, 160), RunwayEnd::new(342, 340)]
        );
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let runways = parse_runways("262(260);(082,080);400(010);abc;350(355)");
        assert_eq!(
            runways,
            vec![RunwayEnd::new(262, 260), RunwayEnd::new(350, 355)]
        );
    }

    #[rstest]
    #[case("")]
    #[case("n/a")]
    #[case("262;082")]
    fn test_no_runway_data(#[case] encoded: &str) {
        assert!(parse_runways(encoded).is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(RunwayEnd::new(82, 80).to_string(), "RWY08 (082° true)");
    }
}
