//! Wind component engine
//!
//! Resolves reported winds along and across a runway's true heading and
//! reduces a set of observations to the worst value of each metric.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::report::{WindDirection, WindObservation};

/// Components closer to zero than this are treated as exactly zero, so a
/// pure crosswind does not leave a 1e-16 kt headwind behind.
const COMPONENT_EPSILON: f64 = 1e-9;

/// Side of the runway the crosswind blows from, looking along the heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrosswindSide {
    Left,
    Right,
}

impl fmt::Display for CrosswindSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrosswindSide::Left => write!(f, "from the left"),
            CrosswindSide::Right => write!(f, "from the right"),
        }
    }
}

/// Signed components of one wind relative to one runway heading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindComponents {
    /// Positive is headwind, negative is tailwind
    pub headwind_kt: f64,
    /// Positive is from the right, negative from the left
    pub crosswind_kt: f64,
}

impl WindComponents {
    /// Resolve a wind (from `direction_deg`, at `speed_kt`) against a heading
    #[must_use]
    pub fn resolve(direction_deg: f64, speed_kt: f64, true_heading_deg: f64) -> Self {
        let angle = (direction_deg - true_heading_deg).to_radians();
        Self {
            headwind_kt: snap_to_zero(speed_kt * angle.cos()),
            crosswind_kt: snap_to_zero(speed_kt * angle.sin()),
        }
    }

    #[must_use]
    pub fn crosswind_side(&self) -> Option<CrosswindSide> {
        if self.crosswind_kt > 0.0 {
            Some(CrosswindSide::Right)
        } else if self.crosswind_kt < 0.0 {
            Some(CrosswindSide::Left)
        } else {
            None
        }
    }
}

/// Components of a reported wind using its sustained speed.
///
/// Variable winds have no usable angle and return `None`.
#[must_use]
pub fn components(wind: &WindObservation, true_heading_deg: u16) -> Option<WindComponents> {
    components_at_speed(wind, true_heading_deg, false)
}

fn components_at_speed(
    wind: &WindObservation,
    true_heading_deg: u16,
    include_gusts: bool,
) -> Option<WindComponents> {
    match wind.direction {
        WindDirection::Degrees(direction) => Some(WindComponents::resolve(
            f64::from(direction),
            f64::from(wind.effective_speed(include_gusts)),
            f64::from(true_heading_deg),
        )),
        WindDirection::Variable => None,
    }
}

/// Worst-case wind figures for one runway end
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindComponentResult {
    pub max_headwind_kt: f64,
    pub max_tailwind_kt: f64,
    pub max_crosswind_kt: f64,
    pub max_wind_kt: f64,
    /// Side of the strongest crosswind, `None` when there is none
    pub crosswind_side: Option<CrosswindSide>,
    /// Observations with a fixed direction; zero means only variable or no wind
    pub directional_observations: usize,
}

impl WindComponentResult {
    /// Whether headwind/tailwind/crosswind were resolved from at least one
    /// directional wind
    #[must_use]
    pub fn components_determined(&self) -> bool {
        self.directional_observations > 0
    }
}

/// Reduce observations to per-metric maxima using sustained speeds.
///
/// Each maximum is taken independently. Variable winds only count towards
/// `max_wind_kt`. An empty slice gives an all-zero result; callers tell
/// "no wind reported" apart by the slice length, not the result.
#[must_use]
pub fn reduce_max(observations: &[WindObservation], true_heading_deg: u16) -> WindComponentResult {
    reduce_max_with(observations, true_heading_deg, false)
}

/// Same as [`reduce_max`], optionally using reported gusts as the speed
#[must_use]
pub fn reduce_max_with(
    observations: &[WindObservation],
    true_heading_deg: u16,
    include_gusts: bool,
) -> WindComponentResult {
    let mut result = WindComponentResult::default();

    for wind in observations {
        result.max_wind_kt = result
            .max_wind_kt
            .max(f64::from(wind.effective_speed(include_gusts)));

        let Some(c) = components_at_speed(wind, true_heading_deg, include_gusts) else {
            continue;
        };
        result.directional_observations += 1;

        if c.headwind_kt > 0.0 {
            result.max_headwind_kt = result.max_headwind_kt.max(c.headwind_kt);
        } else if c.headwind_kt < 0.0 {
            result.max_tailwind_kt = result.max_tailwind_kt.max(-c.headwind_kt);
        }

        if c.crosswind_kt.abs() > result.max_crosswind_kt {
            result.max_crosswind_kt = c.crosswind_kt.abs();
            result.crosswind_side = c.crosswind_side();
        }
    }

    result
}

fn snap_to_zero(value: f64) -> f64 {
    if value.abs() < COMPONENT_EPSILON { 0.0 } else { value }
}
