//! Per-state risk aggregation.
//!
//! Each event is reverse-geocoded to a state. Events whose state cannot
//! be resolved, or resolves to an excluded state, are dropped and not
//! counted anywhere. Surviving events are grouped by state in the order
//! states are first seen, scored as `count × mean magnitude`, and ranked.

use std::collections::BTreeMap;

use quake_risk_analytics_models::{StateRiskRecord, StateRiskTable};
use quake_risk_geocoder::Geocoder;
use quake_risk_geography_models::ExcludedStates;
use quake_risk_source::progress::ProgressCallback;
use quake_risk_source_models::RawEvent;

/// A ranked state table plus how many events were dropped and why.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// Ranked per-state scores.
    pub table: StateRiskTable,
    /// Events attributed to a scored state.
    pub attributed: u64,
    /// Events whose state could not be resolved.
    pub unresolved: u64,
    /// Events in an excluded state.
    pub excluded: u64,
}

impl Aggregation {
    /// Total events dropped before scoring.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.unresolved + self.excluded
    }
}

/// Aggregates `events` into a ranked per-state risk table.
pub async fn aggregate(
    geocoder: &dyn Geocoder,
    events: &[RawEvent],
    excluded: &ExcludedStates,
    progress: &dyn ProgressCallback,
) -> StateRiskTable {
    aggregate_with_report(geocoder, events, excluded, progress)
        .await
        .table
}

/// Like [`aggregate`], also reporting how many events were dropped.
pub async fn aggregate_with_report(
    geocoder: &dyn Geocoder,
    events: &[RawEvent],
    excluded: &ExcludedStates,
    progress: &dyn ProgressCallback,
) -> Aggregation {
    progress.set_total(events.len() as u64);
    progress.set_message("Attributing events to states".to_string());

    // Groups in first-seen order; `index` maps a state to its group.
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    let mut index: BTreeMap<String, usize> = BTreeMap::new();
    let mut report = Aggregation::default();

    for event in events {
        progress.inc(1);

        let state = match geocoder
            .reverse_state(event.latitude, event.longitude)
            .await
        {
            Ok(state) => state,
            Err(e) => {
                log::debug!(
                    "Dropping event at ({}, {}): {e}",
                    event.latitude,
                    event.longitude
                );
                report.unresolved += 1;
                continue;
            }
        };

        if excluded.contains(&state) {
            report.excluded += 1;
            continue;
        }

        report.attributed += 1;
        let magnitude = event.magnitude_or_zero();
        if let Some(&i) = index.get(&state) {
            groups[i].1.push(magnitude);
        } else {
            index.insert(state.clone(), groups.len());
            groups.push((state, vec![magnitude]));
        }
    }

    let records = groups
        .into_iter()
        .map(|(state, magnitudes)| StateRiskRecord::from_magnitudes(state, &magnitudes))
        .collect();
    report.table = StateRiskTable::new(records);

    progress.finish(format!("{} states scored", report.table.len()));

    if report.dropped() > 0 {
        log::warn!(
            "Dropped {} of {} events ({} unresolved, {} in excluded states)",
            report.dropped(),
            events.len(),
            report.unresolved,
            report.excluded,
        );
    }
    log::info!(
        "Attributed {} events to {} states",
        report.attributed,
        report.table.len()
    );

    report
}

#[cfg(test)]
mod tests {
    use quake_risk_geocoder::fixed::FixedGeocoder;
    use quake_risk_source::progress::NullProgress;

    use super::*;

    fn geocoder() -> FixedGeocoder {
        FixedGeocoder::new()
            .with_point(37.7, -122.4, "CA")
            .with_point(39.5, -119.8, "Nevada")
            .with_point(44.0, -114.0, "Idaho")
            .with_point(21.3, -157.8, "Hawaii")
            .with_point(40.7, -111.9, "Utah")
    }

    fn event(lat: f64, lon: f64, mag: Option<f64>) -> RawEvent {
        RawEvent::new(lat, lon, mag)
    }

    #[tokio::test]
    async fn three_california_events_score_twelve() {
        let events = vec![event(37.7, -122.4, Some(4.0)); 3];
        let table = aggregate(
            &geocoder(),
            &events,
            &ExcludedStates::new(["HI"]),
            &NullProgress,
        )
        .await;

        assert_eq!(table.len(), 1);
        let ca = &table.records()[0];
        assert_eq!(ca.state, "CA");
        assert_eq!(ca.event_count, 3);
        assert!((ca.average_magnitude - 4.0).abs() < 1e-9);
        assert!((ca.risk_score - 12.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn drops_unresolved_and_excluded_events() {
        let events = vec![
            event(37.7, -122.4, Some(2.0)),
            event(21.3, -157.8, Some(6.0)),
            event(0.0, 0.0, Some(5.0)),
            event(39.5, -119.8, Some(1.0)),
        ];
        let report = aggregate_with_report(
            &geocoder(),
            &events,
            &ExcludedStates::default(),
            &NullProgress,
        )
        .await;

        assert_eq!(report.attributed, 2);
        assert_eq!(report.unresolved, 1);
        assert_eq!(report.excluded, 1);
        assert_eq!(report.dropped(), 2);
        assert!(report.table.get("Hawaii").is_none());
        assert_eq!(report.table.len(), 2);
    }

    #[tokio::test]
    async fn output_is_ranked_with_stable_ties_and_consistent_scores() {
        let events = vec![
            event(44.0, -114.0, Some(2.0)),
            event(39.5, -119.8, Some(1.0)),
            event(39.5, -119.8, Some(3.0)),
            event(40.7, -111.9, Some(4.0)),
            event(37.7, -122.4, None),
        ];
        let table = aggregate(
            &geocoder(),
            &events,
            &ExcludedStates::none(),
            &NullProgress,
        )
        .await;

        let states: Vec<&str> = table.iter().map(|r| r.state.as_str()).collect();
        // Idaho 2.0, Nevada 2×2.0 = 4.0, Utah 4.0, CA 0.0
        assert_eq!(states, ["Nevada", "Utah", "Idaho", "CA"]);

        for pair in table.records().windows(2) {
            assert!(pair[0].risk_score >= pair[1].risk_score);
        }
        for r in &table {
            #[allow(clippy::cast_precision_loss)]
            let expected = r.event_count as f64 * r.average_magnitude;
            assert!((r.risk_score - expected).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn missing_magnitude_counts_as_zero_in_mean() {
        let events = vec![
            event(40.7, -111.9, Some(3.0)),
            event(40.7, -111.9, None),
        ];
        let table = aggregate(
            &geocoder(),
            &events,
            &ExcludedStates::none(),
            &NullProgress,
        )
        .await;

        let utah = table.get("Utah").unwrap();
        assert_eq!(utah.event_count, 2);
        assert!((utah.average_magnitude - 1.5).abs() < 1e-9);
        assert!((utah.risk_score - 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn one_reverse_lookup_per_event() {
        let geocoder = geocoder();
        let events = vec![event(37.7, -122.4, Some(1.0)); 4];
        let _ = aggregate(&geocoder, &events, &ExcludedStates::none(), &NullProgress).await;
        assert_eq!(geocoder.reverse_calls(), 4);
        assert_eq!(geocoder.forward_calls(), 0);
    }

    #[tokio::test]
    async fn aggregation_is_idempotent() {
        let geocoder = geocoder();
        let events = vec![
            event(37.7, -122.4, Some(2.5)),
            event(44.0, -114.0, Some(1.1)),
            event(39.5, -119.8, None),
        ];
        let excluded = ExcludedStates::default();
        let first = aggregate(&geocoder, &events, &excluded, &NullProgress).await;
        let second = aggregate(&geocoder, &events, &excluded, &NullProgress).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn no_events_yield_empty_table() {
        let report = aggregate_with_report(
            &geocoder(),
            &[],
            &ExcludedStates::default(),
            &NullProgress,
        )
        .await;
        assert!(report.table.is_empty());
        assert_eq!(report.dropped(), 0);
    }
}
