#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Earthquake risk aggregation.
//!
//! [`state_risk`] turns raw catalog events into a ranked per-state risk
//! table; [`client_risk`] joins client addresses against that table.
//! Both take the [`Geocoder`](quake_risk_geocoder::Geocoder) as an
//! explicit dependency and run their lookups sequentially, one network
//! round trip at a time.
//!
//! Per-item geocoding failures never abort a run. They surface as
//! dropped events (counted in [`state_risk::Aggregation`]) or as client
//! records with an `Unknown` score.

pub mod client_risk;
pub mod state_risk;

pub use client_risk::map_clients;
pub use state_risk::{Aggregation, aggregate, aggregate_with_report};
