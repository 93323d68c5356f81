#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! U.S. state names and the set of states excluded from risk scoring.

pub mod states;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// States omitted from the risk table by default.
pub const DEFAULT_EXCLUDED_STATES: &[&str] = &["HI"];

/// A latitude/longitude pair (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// States that never appear in the risk table, regardless of event volume.
///
/// Entries may be abbreviations or full names. A resolved state matches
/// when it names the same state in either form, case-insensitively, so
/// `"HI"` excludes a geocoder result of `"Hawaii"`. Names outside the
/// 50 states + DC only match themselves (ignoring case).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedStates {
    keys: BTreeSet<String>,
}

impl ExcludedStates {
    /// An empty set.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            keys: BTreeSet::new(),
        }
    }

    /// Builds a set from abbreviations and/or full names.
    pub fn new<I, S>(states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keys: states.into_iter().map(|s| match_key(s.as_ref())).collect(),
        }
    }

    /// Parses a comma-separated list (e.g. `"HI,AK"`). Blank entries are
    /// ignored.
    #[must_use]
    pub fn parse_list(list: &str) -> Self {
        Self::new(list.split(',').map(str::trim).filter(|s| !s.is_empty()))
    }

    /// Returns `true` if `state` names an excluded state.
    #[must_use]
    pub fn contains(&self, state: &str) -> bool {
        self.keys.contains(&match_key(state))
    }

    /// Number of configured exclusions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` when nothing is excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for ExcludedStates {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_STATES)
    }
}

fn match_key(state: &str) -> String {
    states::canonical_abbr(state)
        .map_or_else(|| state.trim().to_uppercase(), ToString::to_string)
}
