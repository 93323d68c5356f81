#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Earthquake risk assessment pipeline.
//!
//! Fetches the trailing week of earthquakes over the continental U.S.,
//! attributes each to a state by reverse geocoding, scores states as
//! `count × mean magnitude`, looks up each client site's home state, and
//! writes both tables as CSV for the dashboard.
//!
//! Every flag is optional; running the binary with none reproduces the
//! default assessment. A catalog failure aborts the run with a non-zero
//! exit code. Individual geocoding failures only reduce completeness.

mod config;
mod table;

use std::path::PathBuf;

use clap::Parser;
use quake_risk_analytics::{aggregate_with_report, map_clients};
use quake_risk_cli_utils::IndicatifProgress;
use quake_risk_geocoder::nominatim::NominatimGeocoder;
use quake_risk_geography_models::ExcludedStates;
use quake_risk_source::registry::{self, DEFAULT_CATALOG_ID};
use quake_risk_source_models::{FetchWindow, MAX_WINDOW_DAYS};

#[derive(Parser)]
#[command(
    name = "quake_risk",
    about = "Per-state earthquake risk scores and client site lookups"
)]
struct Cli {
    /// Trailing window in days, 1 to 36500 (defaults to the catalog's setting, 7)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_WINDOW_DAYS)))]
    days: Option<u32>,
    /// Comma-separated states to leave out of the risk table, as
    /// abbreviations or names (e.g., "HI,AK")
    #[arg(long, default_value = "HI")]
    exclude: String,
    /// TOML file with `[[clients]]` entries (defaults to the built-in list)
    #[arg(long)]
    clients: Option<PathBuf>,
    /// Directory for the CSV outputs (env: `QUAKE_RISK_OUTPUT_DIR`, default: "dashboard")
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Geocoder `User-Agent` (env: `QUAKE_RISK_USER_AGENT`)
    #[arg(long)]
    user_agent: Option<String>,
    /// Per-request geocoder timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Earthquake catalog id
    #[arg(long, default_value = DEFAULT_CATALOG_ID)]
    catalog: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = quake_risk_cli_utils::init_logger();
    let cli = Cli::parse();

    let catalog = registry::catalog(&cli.catalog)
        .ok_or_else(|| format!("Unknown catalog: {}", cli.catalog))?;
    let window = cli
        .days
        .map_or_else(|| catalog.default_window(), FetchWindow::trailing_days);
    let excluded = ExcludedStates::parse_list(&cli.exclude);
    let clients = config::load_clients(cli.clients.as_deref())?;
    let output_dir = config::output_dir(cli.output_dir);
    let geocoder =
        NominatimGeocoder::from_registry(config::user_agent(cli.user_agent), cli.timeout_secs)?;
    log::debug!("Geocoding as '{}'", geocoder.config().user_agent);

    log::info!("Fetching earthquake data...");
    let http = reqwest::Client::new();
    let events = quake_risk_source::fetch_events(&http, &catalog, &window, &catalog.bbox).await?;

    log::info!("Analyzing state-level risk...");
    let progress = IndicatifProgress::lookup_bar(&multi, "Attributing events");
    let aggregation =
        aggregate_with_report(&geocoder, &events, &excluded, progress.as_ref()).await;
    println!("{}", table::format_state_table(&aggregation.table));

    log::info!("Analyzing client locations...");
    let progress = IndicatifProgress::lookup_bar(&multi, "Resolving clients");
    let records = map_clients(&geocoder, &clients, &aggregation.table, progress.as_ref()).await;
    println!("{}", table::format_client_table(&records));

    let paths = quake_risk_generate::write_outputs(&output_dir, &aggregation.table, &records)?;
    println!(
        "Wrote {} and {}",
        paths.state_risk.display(),
        paths.client_risk.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_defaults_to_catalog_setting() {
        let cli = Cli::try_parse_from(["quake_risk"]).unwrap();
        assert_eq!(cli.days, None);
        assert_eq!(cli.exclude, "HI");
        assert_eq!(cli.catalog, DEFAULT_CATALOG_ID);
    }

    #[test]
    fn days_accepts_the_full_range() {
        let cli = Cli::try_parse_from(["quake_risk", "--days", "1"]).unwrap();
        assert_eq!(cli.days, Some(1));
        let cli = Cli::try_parse_from(["quake_risk", "--days", "36500"]).unwrap();
        assert_eq!(cli.days, Some(MAX_WINDOW_DAYS));
    }

    #[test]
    fn days_outside_range_is_rejected() {
        assert!(Cli::try_parse_from(["quake_risk", "--days", "0"]).is_err());
        assert!(Cli::try_parse_from(["quake_risk", "--days", "36501"]).is_err());
        assert!(Cli::try_parse_from(["quake_risk", "--days", "4294967295"]).is_err());
    }
}
