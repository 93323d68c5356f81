//! FDSN event web service client.
//!
//! Issues a single `GET` against the catalog's `query` endpoint with
//! `format=geojson` and converts each returned feature into a
//! [`RawEvent`]. Feature geometry is `[lon, lat, depth]`; the magnitude
//! lives in `properties.mag` and may be `null`.
//!
//! See <https://earthquake.usgs.gov/fdsnws/event/1/>

use geojson::{FeatureCollection, GeoJson, Value};
use quake_risk_source_models::{BoundingBox, FetchWindow, RawEvent};

use crate::SourceError;
use crate::registry::CatalogConfig;

/// Builds the query string for a catalog request.
#[must_use]
pub fn query_params(window: &FetchWindow, bbox: &BoundingBox) -> Vec<(&'static str, String)> {
    vec![
        ("format", "geojson".to_string()),
        ("starttime", window.start_date()),
        ("endtime", window.end_date()),
        ("minlatitude", bbox.min_latitude.to_string()),
        ("maxlatitude", bbox.max_latitude.to_string()),
        ("minlongitude", bbox.min_longitude.to_string()),
        ("maxlongitude", bbox.max_longitude.to_string()),
    ]
}

/// Fetches every event inside `bbox` during `window` from `catalog`.
///
/// # Errors
///
/// Returns [`SourceError::Unavailable`] if the request fails or the
/// catalog answers with a non-success status, and
/// [`SourceError::Malformed`] if the body is not a `GeoJSON` feature
/// collection.
pub async fn fetch_events(
    client: &reqwest::Client,
    catalog: &CatalogConfig,
    window: &FetchWindow,
    bbox: &BoundingBox,
) -> Result<Vec<RawEvent>, SourceError> {
    log::info!(
        "{}: querying events from {} to {}",
        catalog.name,
        window.start_date(),
        window.end_date(),
    );

    let resp = client
        .get(&catalog.base_url)
        .query(&query_params(window, bbox))
        .send()
        .await?;

    check_status(&catalog.name, resp.status())?;

    let body = resp.text().await?;
    let events = parse_events(&body)?;

    log::info!("{}: {} events received", catalog.name, events.len());
    Ok(events)
}

/// Maps a non-success catalog response to [`SourceError::Unavailable`].
///
/// # Errors
///
/// Returns [`SourceError::Unavailable`] unless `status` is 2xx.
pub fn check_status(catalog: &str, status: reqwest::StatusCode) -> Result<(), SourceError> {
    if status.is_success() {
        return Ok(());
    }
    Err(SourceError::Unavailable {
        message: format!("{catalog} returned HTTP {status}"),
    })
}

/// Parses a `GeoJSON` feature collection into raw events.
///
/// Features without a point geometry cannot be placed on a map and are
/// skipped with a warning.
///
/// # Errors
///
/// Returns [`SourceError::Malformed`] if `body` is not a feature
/// collection.
pub fn parse_events(body: &str) -> Result<Vec<RawEvent>, SourceError> {
    let geojson: GeoJson = body.parse().map_err(|e| SourceError::Malformed {
        message: format!("Failed to parse GeoJSON: {e}"),
    })?;

    let collection = FeatureCollection::try_from(geojson).map_err(|e| SourceError::Malformed {
        message: format!("Expected a FeatureCollection: {e}"),
    })?;

    let mut events = Vec::with_capacity(collection.features.len());
    let mut skipped = 0_usize;

    for feature in &collection.features {
        let position = match feature.geometry.as_ref().map(|g| &g.value) {
            Some(Value::Point(position)) if position.len() >= 2 => position,
            _ => {
                skipped += 1;
                continue;
            }
        };

        let magnitude = feature
            .property("mag")
            .and_then(serde_json::Value::as_f64);

        events.push(RawEvent {
            longitude: position[0],
            latitude: position[1],
            magnitude,
        });
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} features without a point geometry");
    }

    Ok(events)
}
