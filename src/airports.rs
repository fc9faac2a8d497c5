//! Airport registry
//!
//! Loads the airport table (ICAO code, name, runway encoding, procedure
//! encoding, optional coordinates) and decodes each row into structured
//! runway ends and approach procedures.

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::RunwayWindError;
use crate::runway::{ApproachProcedure, RunwayEnd, group_by_runway, parse_procedures, parse_runways};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// An airport with its decoded runway and procedure data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub icao: String,
    pub name: String,
    pub runways: Vec<RunwayEnd>,
    pub procedures: Vec<ApproachProcedure>,
    pub location: Option<Coordinates>,
}

impl Airport {
    /// Procedures keyed by the runway designator in their name
    #[must_use]
    pub fn procedures_by_runway(&self) -> BTreeMap<String, Vec<ApproachProcedure>> {
        group_by_runway(&self.procedures)
    }
}

/// Raw airport table row
#[derive(Debug, Deserialize)]
struct AirportRow {
    #[serde(rename = "ICAO")]
    icao: String,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Runways", default)]
    runways: String,
    #[serde(rename = "Procedures", default)]
    procedures: String,
    #[serde(rename = "Latitude", default, deserialize_with = "csv::invalid_option")]
    latitude: Option<f64>,
    #[serde(rename = "Longitude", default, deserialize_with = "csv::invalid_option")]
    longitude: Option<f64>,
}

impl AirportRow {
    fn into_airport(self) -> Airport {
        let location = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        };

        let icao = self.icao.to_ascii_uppercase();
        if location.is_none() && (self.latitude.is_some() || self.longitude.is_some()) {
            debug!("Incomplete coordinates for {}", icao);
        }
        let runways = parse_runways(&self.runways);
        if runways.is_empty() {
            debug!("No runway data for {}", icao);
        }

        Airport {
            icao,
            name: self.name,
            runways,
            procedures: parse_procedures(&self.procedures),
            location,
        }
    }
}

/// Load the airport table from a CSV file
pub fn load_airports(path: &Path) -> crate::Result<Vec<Airport>> {
    info!("Loading airports from: {:?}", path);
    let file = std::fs::File::open(path)
        .map_err(|e| RunwayWindError::data_file(path.display().to_string(), e.to_string()))?;
    load_airports_from_reader(file)
        .map_err(|e| RunwayWindError::data_file(path.display().to_string(), e.to_string()))
}

/// Load the airport table from CSV content.
///
/// Only the `ICAO` column is required. Rows that fail to decode or have an
/// empty ICAO code are skipped with a warning. Unreadable coordinates only
/// drop the location.
pub fn load_airports_from_reader<R: Read>(reader: R) -> Result<Vec<Airport>, csv::Error> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    // Fail on a header without ICAO before looking at rows
    let headers = csv_reader.headers()?.clone();
    if !headers.iter().any(|h| h == "ICAO") {
        return Err(csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("missing ICAO column, found: {}", headers.iter().collect::<Vec<_>>().join(", ")),
        )));
    }

    let mut airports = Vec::new();
    let mut skipped = 0;

    for (line, row) in csv_reader.deserialize::<AirportRow>().enumerate() {
        match row {
            Ok(row) if !row.icao.is_empty() => airports.push(row.into_airport()),
            Ok(_) => {
                warn!("Skipping airport row {} without ICAO code", line + 1);
                skipped += 1;
            }
            Err(e) => {
                warn!("Skipping airport row {}: {}", line + 1, e);
                skipped += 1;
            }
        }
    }

    info!(
        "Loaded {} airports ({} rows skipped)",
        airports.len(),
        skipped
    );
    Ok(airports)
}
