//! Deterministic in-memory geocoder.
//!
//! [`FixedGeocoder`] answers from a fixed table of coordinates and
//! addresses and never touches the network, so aggregation and client
//! mapping can be tested reproducibly. It also counts calls, which lets
//! tests assert how many round trips a pipeline step performs.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use quake_risk_geography_models::Coordinates;

use crate::{GeocodeError, Geocoder};

/// Coordinates closer than this (in degrees) are treated as the same point.
const COORDINATE_TOLERANCE: f64 = 1e-6;

/// A [`Geocoder`] backed by a fixed mapping.
#[derive(Debug, Default)]
pub struct FixedGeocoder {
    points: Vec<(Coordinates, String)>,
    addresses: Vec<(String, Coordinates)>,
    reverse_calls: AtomicUsize,
    forward_calls: AtomicUsize,
}

impl FixedGeocoder {
    /// An empty geocoder that resolves nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps the point `(latitude, longitude)` to `state`.
    #[must_use]
    pub fn with_point(mut self, latitude: f64, longitude: f64, state: &str) -> Self {
        self.points
            .push((Coordinates::new(latitude, longitude), state.to_string()));
        self
    }

    /// Maps `address` to `(latitude, longitude)`. Addresses are compared
    /// ignoring case and repeated whitespace.
    #[must_use]
    pub fn with_address(mut self, address: &str, latitude: f64, longitude: f64) -> Self {
        self.addresses
            .push((normalize(address), Coordinates::new(latitude, longitude)));
        self
    }

    /// Number of reverse lookups performed so far.
    #[must_use]
    pub fn reverse_calls(&self) -> usize {
        self.reverse_calls.load(Ordering::Relaxed)
    }

    /// Number of forward lookups performed so far.
    #[must_use]
    pub fn forward_calls(&self) -> usize {
        self.forward_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn reverse_state(&self, latitude: f64, longitude: f64) -> Result<String, GeocodeError> {
        self.reverse_calls.fetch_add(1, Ordering::Relaxed);

        self.points
            .iter()
            .find(|(point, _)| {
                (point.latitude - latitude).abs() < COORDINATE_TOLERANCE
                    && (point.longitude - longitude).abs() < COORDINATE_TOLERANCE
            })
            .map(|(_, state)| state.clone())
            .ok_or(GeocodeError::NoMatch)
    }

    async fn forward_location(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        self.forward_calls.fetch_add(1, Ordering::Relaxed);

        let key = normalize(address);
        self.addresses
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, coords)| *coords)
            .ok_or(GeocodeError::NoMatch)
    }
}

fn normalize(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geocoder() -> FixedGeocoder {
        FixedGeocoder::new()
            .with_point(37.7, -122.4, "California")
            .with_address("1 Main St,  Springfield", 37.7, -122.4)
    }

    #[tokio::test]
    async fn resolves_known_point_and_address() {
        let geocoder = geocoder();
        assert_eq!(
            geocoder.resolve_state(37.7, -122.4).await.as_deref(),
            Some("California")
        );
        let coords = geocoder
            .resolve_location("1 main st, springfield")
            .await
            .unwrap();
        assert!((coords.latitude - 37.7).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unknown_inputs_are_unresolved() {
        let geocoder = geocoder();
        assert!(geocoder.resolve_state(0.0, 0.0).await.is_none());
        assert!(geocoder.resolve_location("nowhere").await.is_none());
        assert!(matches!(
            geocoder.reverse_state(1.0, 1.0).await,
            Err(GeocodeError::NoMatch)
        ));
    }

    #[tokio::test]
    async fn counts_calls() {
        let geocoder = geocoder();
        let _ = geocoder.resolve_state(37.7, -122.4).await;
        let _ = geocoder.resolve_state(0.0, 0.0).await;
        let _ = geocoder.resolve_location("nowhere").await;
        assert_eq!(geocoder.reverse_calls(), 2);
        assert_eq!(geocoder.forward_calls(), 1);
    }
}
