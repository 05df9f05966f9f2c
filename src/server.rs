//! Read-only HTTP surface over the live vehicle set.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::{watch, Notify};

use crate::models::VehicleRecord;
use crate::poller::PollStatus;
use crate::reconciler::Snapshot;

#[derive(Clone)]
pub struct AppState {
    /// All normalized vehicles, including those without a position
    pub vehicles: watch::Receiver<Snapshot>,
    pub status: watch::Receiver<PollStatus>,
    pub refresh: Arc<Notify>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/vehicles", get(list_vehicles))
        .route("/api/refresh", post(request_refresh))
        .route("/health", get(health))
        .with_state(state)
}

/// Current vehicles; an empty list until the first poll succeeds.
pub async fn list_vehicles(State(state): State<AppState>) -> Json<Vec<VehicleRecord>> {
    let snapshot = state.vehicles.borrow().clone();

    for vehicle in snapshot.iter().take(5) {
        tracing::debug!(id = %vehicle.id, summary = %vehicle.summary(), "Serving vehicle");
    }

    Json(Vec::clone(&snapshot))
}

/// Ask the poller for an early cycle. Coalesced with any cycle in flight.
pub async fn request_refresh(State(state): State<AppState>) -> StatusCode {
    state.refresh.notify_one();
    StatusCode::ACCEPTED
}

pub async fn health(State(state): State<AppState>) -> Json<PollStatus> {
    Json(state.status.borrow().clone())
}
