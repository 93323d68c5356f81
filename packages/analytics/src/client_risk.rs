//! Client location risk lookup.
//!
//! Each client address goes through two separate geocoding round trips:
//! a forward lookup to coordinates, then a reverse lookup of those
//! coordinates to a state. The state is never taken from the forward
//! result, so clients and events are attributed by the same reverse
//! lookup. The resolved state is then joined against the state table.

use quake_risk_analytics_models::{
    ClientLocation, ClientRiskRecord, RiskScore, StateRiskTable, UnscoredReason,
};
use quake_risk_geocoder::Geocoder;
use quake_risk_geography_models::Coordinates;
use quake_risk_source::progress::ProgressCallback;

/// Looks up the risk score of each client's home state.
///
/// The output has one record per client, in input order.
pub async fn map_clients(
    geocoder: &dyn Geocoder,
    clients: &[ClientLocation],
    table: &StateRiskTable,
    progress: &dyn ProgressCallback,
) -> Vec<ClientRiskRecord> {
    progress.set_total(clients.len() as u64);
    progress.set_message("Resolving client locations".to_string());

    let mut records = Vec::with_capacity(clients.len());
    for client in clients {
        records.push(map_client(geocoder, client, table).await);
        progress.inc(1);
    }

    let unscored = records.iter().filter(|r| r.risk_score.is_unknown()).count();
    progress.finish(format!("{} clients mapped", records.len()));
    if unscored > 0 {
        log::warn!(
            "{unscored} of {} client locations have no risk score",
            records.len()
        );
    }

    records
}

async fn map_client(
    geocoder: &dyn Geocoder,
    client: &ClientLocation,
    table: &StateRiskTable,
) -> ClientRiskRecord {
    let unscored = |state: Option<String>,
                    coordinates: Option<Coordinates>,
                    reason: UnscoredReason| ClientRiskRecord {
        name: client.name.clone(),
        address: client.address.clone(),
        state,
        risk_score: RiskScore::Unknown,
        coordinates,
        unscored_reason: Some(reason),
    };

    let coordinates = match geocoder.forward_location(&client.address).await {
        Ok(coordinates) => coordinates,
        Err(e) => {
            log::debug!("{}: address '{}' unresolved: {e}", client.name, client.address);
            return unscored(None, None, UnscoredReason::AddressUnresolved);
        }
    };

    let state = match geocoder
        .reverse_state(coordinates.latitude, coordinates.longitude)
        .await
    {
        Ok(state) => state,
        Err(e) => {
            log::debug!("{}: state unresolved: {e}", client.name);
            return unscored(None, Some(coordinates), UnscoredReason::StateUnresolved);
        }
    };

    match table.get(&state) {
        Some(record) => ClientRiskRecord {
            name: client.name.clone(),
            address: client.address.clone(),
            state: Some(state),
            risk_score: RiskScore::Score(record.risk_score),
            coordinates: Some(coordinates),
            unscored_reason: None,
        },
        None => unscored(
            Some(state),
            Some(coordinates),
            UnscoredReason::StateNotScored,
        ),
    }
}
