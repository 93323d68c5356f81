#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! State and client risk table types.
//!
//! The state table is the ranked output of event aggregation; the client
//! table joins each client location against it. Both are consumed
//! read-only by the exporter and the dashboard.

use std::fmt;

use quake_risk_geography_models::Coordinates;
use serde::{Deserialize, Serialize, Serializer};
use strum_macros::{AsRefStr, Display};

/// Label rendered for a state or score that could not be determined.
pub const UNKNOWN: &str = "Unknown";

/// Aggregated earthquake exposure for one state.
///
/// `risk_score` is `event_count × average_magnitude`, a simple
/// explainable heuristic rather than a calibrated hazard estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateRiskRecord {
    /// Resolved state name.
    pub state: String,
    /// Number of events attributed to the state.
    pub event_count: u64,
    /// Mean magnitude of those events.
    pub average_magnitude: f64,
    /// `event_count × average_magnitude`.
    pub risk_score: f64,
}

impl StateRiskRecord {
    /// Builds a record from the magnitudes of the events attributed to
    /// `state`. An empty slice yields a zero average.
    ///
    /// Magnitudes are taken as reported. Small events can carry negative
    /// magnitudes, so a state made up only of those scores below zero and
    /// ranks last.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_magnitudes(state: String, magnitudes: &[f64]) -> Self {
        let event_count = magnitudes.len() as u64;
        let average_magnitude = if magnitudes.is_empty() {
            0.0
        } else {
            magnitudes.iter().sum::<f64>() / magnitudes.len() as f64
        };

        Self {
            state,
            event_count,
            average_magnitude,
            risk_score: event_count as f64 * average_magnitude,
        }
    }
}

/// State risk records sorted by descending risk score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StateRiskTable {
    records: Vec<StateRiskRecord>,
}

impl StateRiskTable {
    /// Sorts `records` by descending risk score. The sort is stable, so
    /// ties keep their input order.
    #[must_use]
    pub fn new(mut records: Vec<StateRiskRecord>) -> Self {
        records.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
        Self { records }
    }

    /// Records in rank order.
    #[must_use]
    pub fn records(&self) -> &[StateRiskRecord] {
        &self.records
    }

    /// Looks up a state by its exact resolved name.
    #[must_use]
    pub fn get(&self, state: &str) -> Option<&StateRiskRecord> {
        self.records.iter().find(|r| r.state == state)
    }

    /// Number of scored states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no state was scored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, StateRiskRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a StateRiskTable {
    type Item = &'a StateRiskRecord;
    type IntoIter = std::slice::Iter<'a, StateRiskRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A client site whose exposure should be looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientLocation {
    /// Display name (e.g., "City Hall").
    pub name: String,
    /// Free-text street address.
    pub address: String,
}

/// A risk score, or `Unknown` when the client's state has no score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RiskScore {
    /// The matching state's score.
    Score(f64),
    /// Geocoding failed or the state is not in the table.
    Unknown,
}

impl RiskScore {
    /// The numeric score, if known.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Score(score) => Some(score),
            Self::Unknown => None,
        }
    }

    /// Returns `true` for [`RiskScore::Unknown`].
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Score(score) => write!(f, "{score}"),
            Self::Unknown => f.write_str(UNKNOWN),
        }
    }
}

impl Serialize for RiskScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Score(score) => serializer.serialize_f64(*score),
            Self::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

/// Why a client record carries no score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UnscoredReason {
    /// The address could not be forward-geocoded.
    AddressUnresolved,
    /// The coordinates could not be reverse-geocoded to a state.
    StateUnresolved,
    /// The state resolved but has no row in the state table.
    StateNotScored,
}

/// Risk lookup result for one client location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRiskRecord {
    /// Client display name.
    pub name: String,
    /// Client address as given.
    pub address: String,
    /// Resolved state, `None` if geocoding failed.
    pub state: Option<String>,
    /// Matching state's risk score.
    pub risk_score: RiskScore,
    /// Forward-geocoded position, `None` if the address did not resolve.
    pub coordinates: Option<Coordinates>,
    /// Set when `risk_score` is [`RiskScore::Unknown`].
    pub unscored_reason: Option<UnscoredReason>,
}

impl ClientRiskRecord {
    /// State name, or `"Unknown"`.
    #[must_use]
    pub fn state_label(&self) -> &str {
        self.state.as_deref().unwrap_or(UNKNOWN)
    }
}
