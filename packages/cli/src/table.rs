//! Plain-text rendering of the risk tables for stdout.

use std::fmt::Write as _;

use quake_risk_analytics_models::{ClientRiskRecord, StateRiskTable};

/// Renders the state table, one row per state in rank order.
#[must_use]
pub fn format_state_table(table: &StateRiskTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<24} {:>6} {:>8} {:>10}", "STATE", "COUNT", "AVG_MAG", "RISK");
    let _ = writeln!(out, "{}", "-".repeat(51));

    if table.is_empty() {
        let _ = writeln!(out, "(no events attributed to a state)");
    }

    for r in table {
        let _ = writeln!(
            out,
            "{:<24} {:>6} {:>8.2} {:>10.2}",
            r.state, r.event_count, r.average_magnitude, r.risk_score
        );
    }
    out
}

/// Renders the client table in input order.
#[must_use]
pub fn format_client_table(records: &[ClientRiskRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<32} {:<24} {:>10}", "NAME", "STATE", "RISK");
    let _ = writeln!(out, "{}", "-".repeat(68));

    for r in records {
        let risk = r
            .risk_score
            .value()
            .map_or_else(|| r.risk_score.to_string(), |v| format!("{v:.2}"));
        let _ = writeln!(out, "{:<32} {:<24} {:>10}", r.name, r.state_label(), risk);
    }
    out
}
