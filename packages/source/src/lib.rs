#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Earthquake catalog adapter.
//!
//! Queries an FDSN event web service (the USGS catalog by default) for
//! every event inside a [`BoundingBox`] during a trailing [`FetchWindow`]
//! and turns the `GeoJSON` response into [`RawEvent`] records.
//!
//! Catalog endpoints are defined as TOML files embedded at compile time
//! (see [`registry`]). A failed fetch is fatal for the run: there is no
//! retry and the error propagates to the caller.
//!
//! [`BoundingBox`]: quake_risk_source_models::BoundingBox
//! [`FetchWindow`]: quake_risk_source_models::FetchWindow
//! [`RawEvent`]: quake_risk_source_models::RawEvent

pub mod fdsn;
pub mod progress;
pub mod registry;

pub use fdsn::fetch_events;

/// Errors that can occur while fetching catalog data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The catalog could not be reached or answered with a non-success
    /// status.
    #[error("Earthquake catalog unavailable: {message}")]
    Unavailable {
        /// Description of what went wrong.
        message: String,
    },

    /// The catalog answered, but the body is not a `GeoJSON` feature
    /// collection.
    #[error("Malformed catalog response: {message}")]
    Malformed {
        /// Description of what went wrong.
        message: String,
    },
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        Self::Unavailable {
            message: e.to_string(),
        }
    }
}
