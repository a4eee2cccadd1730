//! Liveness and readiness probes

use axum::{Json, Router, routing::get};
use csvcal_core::GeocodeProvider;
use serde::Serialize;

use crate::state::AppState;

pub fn router<P: GeocodeProvider + 'static>() -> Router<AppState<P>> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}

#[derive(Serialize)]
pub struct Status {
    pub status: &'static str,
}

/// GET /healthz
async fn healthz() -> Json<Status> {
    Json(Status { status: "ok" })
}

/// GET /readyz
async fn readyz() -> Json<Status> {
    Json(Status { status: "ready" })
}
