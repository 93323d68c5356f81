#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Raw earthquake event types and catalog query parameters.
//!
//! Every earthquake catalog produces [`RawEvent`] records for a
//! [`BoundingBox`] and a trailing [`FetchWindow`]. Events are consumed by
//! the state aggregation step and discarded afterwards.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Date format used for catalog `starttime` / `endtime` parameters.
pub const CATALOG_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default length of the trailing time window, in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Longest trailing window accepted on the command line, in days.
pub const MAX_WINDOW_DAYS: u32 = 36_500;

/// A single earthquake as reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Reported magnitude. `None` when the catalog has no value yet.
    pub magnitude: Option<f64>,
}

impl RawEvent {
    /// Creates an event from a position and optional magnitude.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, magnitude: Option<f64>) -> Self {
        Self {
            longitude,
            latitude,
            magnitude,
        }
    }

    /// Magnitude with a missing value counted as `0.0`.
    #[must_use]
    pub fn magnitude_or_zero(&self) -> f64 {
        self.magnitude.unwrap_or(0.0)
    }
}

/// A latitude/longitude rectangle used to filter catalog queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Southern edge.
    pub min_latitude: f64,
    /// Northern edge.
    pub max_latitude: f64,
    /// Western edge.
    pub min_longitude: f64,
    /// Eastern edge.
    pub max_longitude: f64,
}

impl BoundingBox {
    /// Bounds of the contiguous United States.
    pub const CONTINENTAL_US: Self = Self {
        min_latitude: 24.396_308,
        max_latitude: 49.384_358,
        min_longitude: -125.0,
        max_longitude: -66.934_57,
    };

}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::CONTINENTAL_US
    }
}

/// A trailing time window ending at a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    /// End of the window (usually "now").
    pub end: DateTime<Utc>,
    /// Window length in days.
    pub days: u32,
}

impl FetchWindow {
    /// A window of `days` ending now.
    #[must_use]
    pub fn trailing_days(days: u32) -> Self {
        Self {
            end: Utc::now(),
            days,
        }
    }

    /// Start of the window, clamped to the earliest representable instant.
    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.end
            .checked_sub_signed(Duration::days(i64::from(self.days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// `starttime` query value (`YYYY-MM-DD`, UTC).
    #[must_use]
    pub fn start_date(&self) -> String {
        self.start().format(CATALOG_DATE_FORMAT).to_string()
    }

    /// `endtime` query value (`YYYY-MM-DD`, UTC).
    #[must_use]
    pub fn end_date(&self) -> String {
        self.end.format(CATALOG_DATE_FORMAT).to_string()
    }
}

impl Default for FetchWindow {
    fn default() -> Self {
        Self::trailing_days(DEFAULT_WINDOW_DAYS)
    }
}
