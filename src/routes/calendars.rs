//! Calendar listing and ICS feed endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use csvcal_core::{CsvCalError, GeocodeProvider, calendar_path, csv_to_ical, list_calendars};
use serde::Serialize;

use crate::routes::AppError;
use crate::state::AppState;

const ICS_SUFFIX: &str = ".ics";
const ICS_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

pub fn router<P: GeocodeProvider + 'static>() -> Router<AppState<P>> {
    Router::new()
        .route("/", get(list::<P>))
        .route("/{file}", get(calendar_feed::<P>))
}

/// Calendar names returned by API
#[derive(Serialize)]
pub struct CalendarList {
    pub calendars: Vec<String>,
}

/// GET / - List all calendars
async fn list<P: GeocodeProvider>(State(state): State<AppState<P>>) -> Json<CalendarList> {
    Json(CalendarList {
        calendars: list_calendars(&state.settings.data_dir),
    })
}

/// GET /{name}.ics - Convert a calendar's CSV source to ICS
async fn calendar_feed<P: GeocodeProvider>(
    State(state): State<AppState<P>>,
    Path(file): Path<String>,
) -> Result<Response, AppError> {
    let name = file
        .strip_suffix(ICS_SUFFIX)
        .ok_or_else(|| CsvCalError::CalendarNotFound(file.clone()))?;

    let path = calendar_path(&state.settings.data_dir, name)?;
    let ics = csv_to_ical(&path, name, &state.settings, &state.geocoder).await?;

    tracing::info!(calendar = name, bytes = ics.len(), "served calendar");
    Ok(([(header::CONTENT_TYPE, ICS_CONTENT_TYPE)], ics).into_response())
}
