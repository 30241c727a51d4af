//! Farm data lookup

use axum::{extract::State, Json};
use shared::FarmData;

use crate::AppState;

/// Location and soil data for the caller
///
/// Never fails on data-source errors: an unresolved location and default soil
/// values are still a 200.
pub async fn farm_data(State(state): State<AppState>) -> Json<FarmData> {
    let farm = state.advisory.farm_snapshot().await;
    if !farm.location.resolved {
        tracing::warn!("Serving farm data without a resolved location");
    }
    Json(farm)
}
