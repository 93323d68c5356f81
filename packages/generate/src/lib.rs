#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CSV export of the state and client risk tables.
//!
//! The dashboard reads two row-oriented files from its output directory:
//!
//! - [`STATE_RISK_FILE`] with columns `state,count,avg_mag,risk_score`
//! - [`CLIENT_RISK_FILE`] with columns `name,address,state,risk_score`,
//!   followed by `lat,lon` for the map markers
//!
//! Column names and order are the contract with the dashboard. Writers
//! are generic over [`Write`] so they can target files or buffers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use quake_risk_analytics_models::{ClientRiskRecord, RiskScore, StateRiskTable};
use serde::Serialize;

/// File name of the state risk table.
pub const STATE_RISK_FILE: &str = "state_risk_scores.csv";

/// File name of the client risk table.
pub const CLIENT_RISK_FILE: &str = "client_location_risks.csv";

/// Errors that can occur while writing the output files.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Creating or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing a row failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Paths of the files written by [`write_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// State risk table.
    pub state_risk: PathBuf,
    /// Client risk table.
    pub client_risk: PathBuf,
}

#[derive(Serialize)]
struct StateRow<'a> {
    state: &'a str,
    count: u64,
    avg_mag: f64,
    risk_score: f64,
}

#[derive(Serialize)]
struct ClientRow<'a> {
    name: &'a str,
    address: &'a str,
    state: &'a str,
    risk_score: RiskScore,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Writes the state risk table as CSV, in rank order.
///
/// # Errors
///
/// Returns [`GenerateError`] if a row cannot be written.
pub fn write_state_table<W: Write>(writer: W, table: &StateRiskTable) -> Result<(), GenerateError> {
    let mut csv = csv::Writer::from_writer(writer);

    // An empty table still gets a header so the dashboard can load it.
    if table.is_empty() {
        csv.write_record(["state", "count", "avg_mag", "risk_score"])?;
    }

    for record in table {
        csv.serialize(StateRow {
            state: &record.state,
            count: record.event_count,
            avg_mag: record.average_magnitude,
            risk_score: record.risk_score,
        })?;
    }

    csv.flush()?;
    Ok(())
}

/// Writes the client risk table as CSV, in input order.
///
/// # Errors
///
/// Returns [`GenerateError`] if a row cannot be written.
pub fn write_client_table<W: Write>(
    writer: W,
    records: &[ClientRiskRecord],
) -> Result<(), GenerateError> {
    let mut csv = csv::Writer::from_writer(writer);

    if records.is_empty() {
        csv.write_record(["name", "address", "state", "risk_score", "lat", "lon"])?;
    }

    for record in records {
        csv.serialize(ClientRow {
            name: &record.name,
            address: &record.address,
            state: record.state_label(),
            risk_score: record.risk_score,
            lat: record.coordinates.map(|c| c.latitude),
            lon: record.coordinates.map(|c| c.longitude),
        })?;
    }

    csv.flush()?;
    Ok(())
}

/// Writes both tables into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns [`GenerateError`] if the directory or either file cannot be
/// written.
pub fn write_outputs(
    dir: &Path,
    table: &StateRiskTable,
    clients: &[ClientRiskRecord],
) -> Result<OutputPaths, GenerateError> {
    std::fs::create_dir_all(dir)?;

    let state_risk = dir.join(STATE_RISK_FILE);
    write_state_table(BufWriter::new(File::create(&state_risk)?), table)?;
    log::info!("State risk table written: {}", state_risk.display());

    let client_risk = dir.join(CLIENT_RISK_FILE);
    write_client_table(BufWriter::new(File::create(&client_risk)?), clients)?;
    log::info!("Client risk table written: {}", client_risk.display());

    Ok(OutputPaths {
        state_risk,
        client_risk,
    })
}

#[cfg(test)]
mod tests {
    use quake_risk_analytics_models::{StateRiskRecord, UnscoredReason};
    use quake_risk_geography_models::Coordinates;

    use super::*;

    fn table() -> StateRiskTable {
        StateRiskTable::new(vec![
            StateRiskRecord::from_magnitudes("Nevada".to_string(), &[1.5]),
            StateRiskRecord::from_magnitudes("California".to_string(), &[4.0, 4.0, 4.0]),
        ])
    }

    fn render_state(table: &StateRiskTable) -> String {
        let mut buf = Vec::new();
        write_state_table(&mut buf, table).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn render_clients(records: &[ClientRiskRecord]) -> String {
        let mut buf = Vec::new();
        write_client_table(&mut buf, records).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn state_table_has_contract_columns_in_rank_order() {
        let out = render_state(&table());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "state,count,avg_mag,risk_score");
        assert_eq!(lines[1], "California,3,4.0,12.0");
        assert_eq!(lines[2], "Nevada,1,1.5,1.5");
    }

    #[test]
    fn empty_state_table_still_has_header() {
        let out = render_state(&StateRiskTable::default());
        assert_eq!(out, "state,count,avg_mag,risk_score\n");
    }

    #[test]
    fn client_table_renders_unknown_and_blank_coordinates() {
        let records = vec![
            ClientRiskRecord {
                name: "City Hall".to_string(),
                address: "1 Dr Carlton B Goodlett Pl, San Francisco, CA 94102".to_string(),
                state: Some("California".to_string()),
                risk_score: RiskScore::Score(12.0),
                coordinates: Some(Coordinates::new(37.5, -122.25)),
                unscored_reason: None,
            },
            ClientRiskRecord {
                name: "X".to_string(),
                address: "<unresolvable>".to_string(),
                state: None,
                risk_score: RiskScore::Unknown,
                coordinates: None,
                unscored_reason: Some(UnscoredReason::AddressUnresolved),
            },
        ];

        let out = render_clients(&records);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "name,address,state,risk_score,lat,lon");
        assert_eq!(
            lines[1],
            "City Hall,\"1 Dr Carlton B Goodlett Pl, San Francisco, CA 94102\",California,12.0,37.5,-122.25"
        );
        assert_eq!(lines[2], "X,<unresolvable>,Unknown,Unknown,,");
    }

    #[test]
    fn client_score_matches_state_table_text() {
        let table = table();
        let california = table.get("California").unwrap();
        let records = [ClientRiskRecord {
            name: "Depot".to_string(),
            address: "100 Main St".to_string(),
            state: Some(california.state.clone()),
            risk_score: RiskScore::Score(california.risk_score),
            coordinates: None,
            unscored_reason: None,
        }];

        let state_line = render_state(&table).lines().nth(1).unwrap().to_string();
        let client_line = render_clients(&records).lines().nth(1).unwrap().to_string();
        let state_score = state_line.rsplit(',').next().unwrap();
        let client_score = client_line.split(',').nth(3).unwrap();
        assert_eq!(state_score, "12.0");
        assert_eq!(client_score, state_score);
    }

    #[test]
    fn empty_client_table_still_has_header() {
        assert_eq!(render_clients(&[]), "name,address,state,risk_score,lat,lon\n");
    }
}
