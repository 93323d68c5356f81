//! Nominatim / OpenStreetMap geocoder client.
//!
//! Reverse lookups use the `/reverse` endpoint with `addressdetails=1`
//! and read the state from `address.state`. Forward lookups use the
//! free-form `/search` endpoint and take the first result.
//!
//! The public instance allows **1 request per second** and requires an
//! identifying `User-Agent`; both are configured in
//! `services/nominatim.toml` and enforced here.
//!
//! See <https://nominatim.org/release-docs/develop/api/Reverse/>

use std::time::Duration;

use async_trait::async_trait;
use quake_risk_geography_models::Coordinates;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::service_registry::{self, NominatimConfig};
use crate::{GeocodeError, Geocoder};

/// Network-backed [`Geocoder`] talking to a Nominatim instance.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    config: NominatimConfig,
    last_request: Mutex<Option<Instant>>,
}

impl NominatimGeocoder {
    /// Builds a client with the configured user agent and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            last_request: Mutex::new(None),
        })
    }

    /// Builds a client from the registry's highest-priority Nominatim
    /// service, optionally overriding its user agent and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Parse`] if no Nominatim service is enabled
    /// and [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn from_registry(
        user_agent: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, GeocodeError> {
        let mut config =
            service_registry::nominatim_config().ok_or_else(|| GeocodeError::Parse {
                message: "No enabled Nominatim service in the registry".to_string(),
            })?;

        if let Some(user_agent) = user_agent {
            config.user_agent = user_agent;
        }
        if let Some(timeout_secs) = timeout_secs {
            config.timeout_secs = timeout_secs;
        }

        Self::new(config)
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &NominatimConfig {
        &self.config
    }

    /// Waits until at least `rate_limit_ms` has passed since the previous
    /// request.
    async fn throttle(&self) {
        let interval = Duration::from_millis(self.config.rate_limit_ms);
        let mut last = self.last_request.lock().await;

        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < interval {
                tokio::time::sleep(interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }

    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, GeocodeError> {
        self.throttle().await;

        let resp = self.client.get(url).query(query).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::RateLimited);
        }
        if !status.is_success() {
            return Err(GeocodeError::Status {
                status: status.as_u16(),
            });
        }

        Ok(resp.json().await?)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn reverse_state(&self, latitude: f64, longitude: f64) -> Result<String, GeocodeError> {
        let query = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("format", "jsonv2".to_string()),
            ("addressdetails", "1".to_string()),
            ("accept-language", "en".to_string()),
        ];

        let body = self.get_json(&self.config.reverse_url, &query).await?;
        parse_reverse_response(&body)
    }

    async fn forward_location(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let mut query = vec![
            ("q", address.to_string()),
            ("format", "jsonv2".to_string()),
            ("limit", "1".to_string()),
        ];
        if let Some(codes) = &self.config.country_codes {
            query.push(("countrycodes", codes.clone()));
        }

        let body = self.get_json(&self.config.search_url, &query).await?;
        parse_search_response(&body)
    }
}

/// Extracts the state name from a `/reverse` response.
fn parse_reverse_response(body: &serde_json::Value) -> Result<String, GeocodeError> {
    // Nominatim answers 200 with {"error": "Unable to geocode"} for
    // points it cannot place (e.g., open ocean).
    if body.get("error").is_some() {
        return Err(GeocodeError::NoMatch);
    }

    let address = body
        .get("address")
        .and_then(serde_json::Value::as_object)
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing address in Nominatim reverse response".to_string(),
        })?;

    address
        .get("state")
        .and_then(serde_json::Value::as_str)
        .map(String::from)
        .ok_or(GeocodeError::MissingState)
}

/// Extracts coordinates from a `/search` response.
fn parse_search_response(body: &serde_json::Value) -> Result<Coordinates, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Err(GeocodeError::NoMatch);
    };

    let lat = first["lat"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lat in Nominatim response".to_string(),
        })?;

    let lon = first["lon"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lon in Nominatim response".to_string(),
        })?;

    Ok(Coordinates::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reverse_state() {
        let body = serde_json::json!({
            "display_name": "Market Street, San Francisco, California, United States",
            "address": {
                "road": "Market Street",
                "city": "San Francisco",
                "state": "California",
                "country_code": "us"
            }
        });
        assert_eq!(parse_reverse_response(&body).unwrap(), "California");
    }

    #[test]
    fn reverse_without_state_is_missing_state() {
        let body = serde_json::json!({
            "address": {"country": "United States", "country_code": "us"}
        });
        assert!(matches!(
            parse_reverse_response(&body),
            Err(GeocodeError::MissingState)
        ));
    }

    #[test]
    fn reverse_error_body_is_no_match() {
        let body = serde_json::json!({"error": "Unable to geocode"});
        assert!(matches!(
            parse_reverse_response(&body),
            Err(GeocodeError::NoMatch)
        ));
    }

    #[test]
    fn reverse_without_address_is_parse_error() {
        let body = serde_json::json!({"place_id": 1});
        assert!(matches!(
            parse_reverse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[test]
    fn parses_search_result() {
        let body = serde_json::json!([{
            "lat": "37.7792",
            "lon": "-122.4191",
            "display_name": "San Francisco City Hall, San Francisco, California, United States"
        }]);
        let coords = parse_search_response(&body).unwrap();
        assert!((coords.latitude - 37.7792).abs() < 1e-4);
        assert!((coords.longitude - -122.4191).abs() < 1e-4);
    }

    #[test]
    fn empty_search_is_no_match() {
        let body = serde_json::json!([]);
        assert!(matches!(
            parse_search_response(&body),
            Err(GeocodeError::NoMatch)
        ));
    }

    #[test]
    fn search_with_bad_lat_is_parse_error() {
        let body = serde_json::json!([{"lat": "north", "lon": "-122.4"}]);
        assert!(matches!(
            parse_search_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[test]
    fn from_registry_applies_overrides() {
        let geocoder =
            NominatimGeocoder::from_registry(Some("quake-test/0.1".to_string()), Some(3)).unwrap();
        assert_eq!(geocoder.config().user_agent, "quake-test/0.1");
        assert_eq!(geocoder.config().timeout_secs, 3);
    }
}
