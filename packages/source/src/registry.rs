//! Compile-time registry of earthquake catalog endpoints.
//!
//! Each catalog is defined in a TOML file under `catalogs/` and embedded
//! via `include_str!`. Adding a catalog requires a new TOML file and a
//! matching entry in [`CATALOG_TOMLS`].

use quake_risk_source_models::{BoundingBox, DEFAULT_WINDOW_DAYS, FetchWindow};
use serde::Deserialize;

/// Identifier of the catalog used when none is requested.
pub const DEFAULT_CATALOG_ID: &str = "usgs";

/// An earthquake catalog endpoint loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Unique identifier (e.g., `"usgs"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// FDSN event query URL.
    pub base_url: String,
    /// Default trailing window length in days.
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    /// Default geographic filter.
    #[serde(default)]
    pub bbox: BoundingBox,
}

impl CatalogConfig {
    /// A window of [`Self::window_days`] ending now.
    #[must_use]
    pub fn default_window(&self) -> FetchWindow {
        FetchWindow::trailing_days(self.window_days)
    }
}

const fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

const CATALOG_TOMLS: &[(&str, &str)] = &[("usgs", include_str!("../catalogs/usgs.toml"))];

#[cfg(test)]
const EXPECTED_CATALOG_COUNT: usize = 1;

/// Returns every registered catalog.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. The files are
/// compile-time constants, so a failure is a development error.
#[must_use]
pub fn all_catalogs() -> Vec<CatalogConfig> {
    CATALOG_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse catalog '{name}': {e}"))
        })
        .collect()
}

/// Looks up a catalog by id.
#[must_use]
pub fn catalog(id: &str) -> Option<CatalogConfig> {
    all_catalogs().into_iter().find(|c| c.id == id)
}
