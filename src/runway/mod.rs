//! Runway module
//!
//! This module provides everything that is tied to a runway:
//! - Heading registry decoding and runway designators
//! - Headwind/tailwind/crosswind resolution and worst-case reduction
//! - Approach procedure minima and alternate planning minima

pub mod components;
pub mod procedures;
pub mod registry;

pub use components::{
    CrosswindSide, WindComponentResult, WindComponents, components, reduce_max, reduce_max_with,
};
pub use procedures::{
    ALL_RUNWAYS_KEY, AlternateMinima, ApproachProcedure, alternate_minima, group_by_runway,
    parse_procedures,
};
pub use registry::{RunwayEnd, format_runway_name, parse_runways};
