//! Approach procedures and alternate minima
//!
//! Procedures are encoded as parenthesised triples
//! `(name;ceiling_ft;visibility_m)`, e.g.
//! `(ILS Z RWY26;200;550)(VOR RWY08;540;1600)`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

use crate::report::WeatherSnapshot;

static PROCEDURE_TRIPLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(([^;()]*);([^;()]*);([^;()]*)\)").expect("valid procedure regex")
});

static RUNWAY_DESIGNATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"RWY\s*(\d{2}[LRC]?)").expect("valid designator regex"));

/// Grouping key for procedures that name no runway
pub const ALL_RUNWAYS_KEY: &str = "ALL";

/// Visibility padding over the best approach, meters
const ALTERNATE_VISIBILITY_MARGIN_M: u32 = 2000;
/// Visibility floor for alternate planning, meters
const ALTERNATE_VISIBILITY_FLOOR_M: u32 = 3000;
/// Ceiling padding over the best approach, feet
const ALTERNATE_CEILING_MARGIN_FT: u32 = 500;
/// Ceiling floor for alternate planning, feet
const ALTERNATE_CEILING_FLOOR_FT: u32 = 1000;

/// A published approach with its minima
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproachProcedure {
    pub name: String,
    pub ceiling_min_ft: u32,
    pub visibility_min_m: u32,
}

impl ApproachProcedure {
    #[must_use]
    pub fn new(name: impl Into<String>, ceiling_min_ft: u32, visibility_min_m: u32) -> Self {
        Self {
            name: name.into(),
            ceiling_min_ft,
            visibility_min_m,
        }
    }

    /// Runway designator named in the procedure, e.g. `RWY26L`
    #[must_use]
    pub fn runway_key(&self) -> String {
        RUNWAY_DESIGNATOR
            .captures(&self.name)
            .map_or_else(|| ALL_RUNWAYS_KEY.to_string(), |caps| format!("RWY{}", &caps[1]))
    }
}

impl fmt::Display for ApproachProcedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} ft / {} m)",
            self.name, self.ceiling_min_ft, self.visibility_min_m
        )
    }
}

/// Parse `(name;ceiling;visibility)` triples.
///
/// A triple with an empty name or a non-numeric minimum is skipped; the rest
/// of the string is still parsed.
#[must_use]
pub fn parse_procedures(encoded: &str) -> Vec<ApproachProcedure> {
    PROCEDURE_TRIPLE
        .captures_iter(encoded)
        .filter_map(|caps| {
            let name = caps[1].trim();
            let ceiling = caps[2].trim().parse::<u32>();
            let visibility = caps[3].trim().parse::<u32>();
            match (name.is_empty(), ceiling, visibility) {
                (false, Ok(ceiling), Ok(visibility)) => {
                    Some(ApproachProcedure::new(name, ceiling, visibility))
                }
                _ => {
                    debug!("Skipping malformed procedure: {}", &caps[0]);
                    None
                }
            }
        })
        .collect()
}

/// Group procedures by the runway designator in their name
#[must_use]
pub fn group_by_runway(procedures: &[ApproachProcedure]) -> BTreeMap<String, Vec<ApproachProcedure>> {
    let mut groups: BTreeMap<String, Vec<ApproachProcedure>> = BTreeMap::new();
    for procedure in procedures {
        groups
            .entry(procedure.runway_key())
            .or_default()
            .push(procedure.clone());
    }
    groups
}

/// Outcome of an alternate-minima check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternateMinima {
    /// Least restrictive procedure at the field
    pub selected: ApproachProcedure,
    pub required_visibility_m: u32,
    pub required_ceiling_ft: u32,
    pub suitable: bool,
}

/// Check a snapshot against the alternate minima derived from the best
/// available approach.
///
/// The best approach is the lowest (ceiling, visibility) pair. Required
/// minima are its values plus 2000 m / 500 ft, floored at 3000 m / 1000 ft.
/// Returns `None` when there are no procedures: the verdict is unknown, not
/// false.
#[must_use]
pub fn alternate_minima(
    procedures: &[ApproachProcedure],
    snapshot: &WeatherSnapshot,
) -> Option<AlternateMinima> {
    let selected = procedures
        .iter()
        .min_by_key(|p| (p.ceiling_min_ft, p.visibility_min_m))?;

    let required_visibility_m = selected
        .visibility_min_m
        .saturating_add(ALTERNATE_VISIBILITY_MARGIN_M)
        .max(ALTERNATE_VISIBILITY_FLOOR_M);
    let required_ceiling_ft = selected
        .ceiling_min_ft
        .saturating_add(ALTERNATE_CEILING_MARGIN_FT)
        .max(ALTERNATE_CEILING_FLOOR_FT);

    let suitable = snapshot.visibility_m >= required_visibility_m
        && snapshot.ceiling_ft >= required_ceiling_ft;

    Some(AlternateMinima {
        selected: selected.clone(),
        required_visibility_m,
        required_ceiling_ft,
        suitable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_procedures() {
        let procedures = parse_procedures("(ILS Z RWY26;200;550)(VOR RWY08;540;1600)");
        assert_eq!(
            procedures,
            vec![
                ApproachProcedure::new("ILS Z RWY26", 200, 550),
                ApproachProcedure::new("VOR RWY08", 540, 1600),
            ]
        );
    }

    #[test]
    fn test_malformed_triples_skipped() {
        let procedures =
            parse_procedures("(ILS RWY26;abc;550)(;300;800)(RNP RWY08; 400 ; 1500 )(NDB;300)");
        assert_eq!(procedures, vec![ApproachProcedure::new("RNP RWY08", 400, 1500)]);
    }

    #[test]
    fn test_no_procedure_data() {
        assert!(parse_procedures("").is_empty());
        assert!(parse_procedures("none").is_empty());
    }

    #[test]
    fn test_runway_key() {
        assert_eq!(ApproachProcedure::new("ILS Z RWY26L", 200, 550).runway_key(), "RWY26L");
        assert_eq!(ApproachProcedure::new("VOR RWY 08", 540, 1600).runway_key(), "RWY08");
        assert_eq!(ApproachProcedure::new("VOR-A", 900, 3000).runway_key(), ALL_RUNWAYS_KEY);
    }

    #[test]
    fn test_group_by_runway() {
        let procedures = parse_procedures("(ILS RWY26;200;550)(RNP RWY26;300;900)(VOR-A;900;3000)");
        let groups = group_by_runway(&procedures);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["RWY26"].len(), 2);
        assert_eq!(groups[ALL_RUNWAYS_KEY][0].name, "VOR-A");
    }

    #[test]
    fn test_alternate_minima_floors() {
        let procedures = vec![
            ApproachProcedure::new("VOR RWY08", 540, 1600),
            ApproachProcedure::new("ILS RWY26", 200, 800),
        ];
        let check = alternate_minima(&procedures, &WeatherSnapshot::new(3000, 1000)).unwrap();
        assert_eq!(check.selected.name, "ILS RWY26");
        assert_eq!(check.required_visibility_m, 3000);
        assert_eq!(check.required_ceiling_ft, 1000);
        assert!(check.suitable);
    }

    #[test]
    fn test_alternate_minima_padding() {
        let procedures = vec![ApproachProcedure::new("NDB RWY18", 700, 2000)];
        let check = alternate_minima(&procedures, &WeatherSnapshot::new(3500, 1500)).unwrap();
        assert_eq!(check.required_visibility_m, 4000);
        assert_eq!(check.required_ceiling_ft, 1200);
        assert!(!check.suitable);
    }

    #[test]
    fn test_alternate_minima_ties_break_on_visibility() {
        let procedures = vec![
            ApproachProcedure::new("RNP RWY26", 200, 900),
            ApproachProcedure::new("ILS RWY26", 200, 550),
        ];
        let check = alternate_minima(&procedures, &WeatherSnapshot::UNRESTRICTED).unwrap();
        assert_eq!(check.selected.name, "ILS RWY26");
        assert!(check.suitable);
    }

    #[test]
    fn test_alternate_minima_huge_minimum_never_suitable() {
        let procedures = parse_procedures("(ILS RWY26;4294967295;800)(VOR RWY08;300;4294967000)");
        assert_eq!(procedures.len(), 2);

        let ceiling_bound = alternate_minima(&procedures[..1], &WeatherSnapshot::UNRESTRICTED).unwrap();
        assert_eq!(ceiling_bound.required_ceiling_ft, u32::MAX);
        assert!(!ceiling_bound.suitable);

        let visibility_bound =
            alternate_minima(&procedures[1..], &WeatherSnapshot::UNRESTRICTED).unwrap();
        assert_eq!(visibility_bound.required_visibility_m, u32::MAX);
        assert!(!visibility_bound.suitable);
    }

    #[test]
    fn test_alternate_minima_without_procedures() {
        assert!(alternate_minima(&[], &WeatherSnapshot::UNRESTRICTED).is_none());
    }
}
