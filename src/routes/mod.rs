pub mod calendars;
pub mod health;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use csvcal_core::{CsvCalError, GeocodeProvider};
use serde::Serialize;

use crate::state::AppState;

pub fn router<P: GeocodeProvider + 'static>(state: AppState<P>) -> Router {
    Router::new()
        .merge(calendars::router::<P>())
        .merge(health::router::<P>())
        .with_state(state)
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Convert anyhow errors to HTTP responses
///
/// Unknown calendars become 404, everything else 500.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<CsvCalError>() {
            Some(CsvCalError::CalendarNotFound(_)) => StatusCode::NOT_FOUND,
            _ => {
                tracing::error!(error = %self.0, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
