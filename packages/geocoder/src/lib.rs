#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geocoding for earthquake risk attribution.
//!
//! Two lookups are needed:
//!
//! 1. **Reverse** — latitude/longitude to a U.S. state name, used to
//!    attribute each earthquake and each client location to a state.
//! 2. **Forward** — free-text address to latitude/longitude, used for
//!    client locations.
//!
//! Both go through the [`Geocoder`] trait. Production wiring uses
//! [`nominatim::NominatimGeocoder`] configured from the [`service_registry`];
//! tests substitute the deterministic [`fixed::FixedGeocoder`].
//!
//! A failed lookup is never fatal. Implementations return a
//! [`GeocodeError`] so callers can count failures, and the provided
//! [`Geocoder::resolve_state`] / [`Geocoder::resolve_location`] methods
//! collapse it to `None` for callers that only care about "resolved or
//! not".

pub mod fixed;
pub mod nominatim;
pub mod service_registry;

use async_trait::async_trait;
use quake_risk_geography_models::Coordinates;
use thiserror::Error;

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed (including timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Geocoder returned HTTP {status}")]
    Status {
        /// Response status code.
        status: u16,
    },

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// The service found nothing for the query.
    #[error("No match")]
    NoMatch,

    /// A reverse lookup matched a place without a `state` component
    /// (e.g., offshore or outside the country).
    #[error("Matched address has no state")]
    MissingState,

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// Reverse and forward geocoding, the single integration point with an
/// external geocoding service.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves a coordinate to the name of the state containing it.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the lookup fails or the matched place
    /// has no state.
    async fn reverse_state(&self, latitude: f64, longitude: f64) -> Result<String, GeocodeError>;

    /// Resolves a free-text address to coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the lookup fails or nothing matches.
    async fn forward_location(&self, address: &str) -> Result<Coordinates, GeocodeError>;

    /// Like [`Self::reverse_state`], with any failure treated as
    /// "unresolved".
    async fn resolve_state(&self, latitude: f64, longitude: f64) -> Option<String> {
        match self.reverse_state(latitude, longitude).await {
            Ok(state) => Some(state),
            Err(e) => {
                log::debug!("Reverse geocode ({latitude}, {longitude}) failed: {e}");
                None
            }
        }
    }

    /// Like [`Self::forward_location`], with any failure treated as
    /// "unresolved".
    async fn resolve_location(&self, address: &str) -> Option<Coordinates> {
        match self.forward_location(address).await {
            Ok(coords) => Some(coords),
            Err(e) => {
                log::debug!("Forward geocode '{address}' failed: {e}");
                None
            }
        }
    }
}
