//! Route definitions for the Farm Advisory service

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Advisory routes, mounted at the root
pub fn advisory_routes() -> Router<AppState> {
    Router::new()
        .route("/govscheme", post(handlers::govscheme))
        .route("/plant-disease", post(handlers::plant_disease))
        .route("/translate", post(handlers::translate))
        .route("/postharvest", post(handlers::postharvest))
        .nest("/api", farm_routes())
}

/// Two-step fertilizer flow: fetch farm data, then ask for a recommendation
fn farm_routes() -> Router<AppState> {
    Router::new()
        .route("/farm_data", get(handlers::farm_data))
        .route(
            "/fertilizer_recommendation",
            post(handlers::fertilizer_recommendation),
        )
}
