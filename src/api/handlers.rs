//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{
    ErrorResponse, ProfileQuery, ProfileRecord, ScheduleRecord, StateResponse, Summary,
};

/// Returns market configuration and report totals.
///
/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse {
        config: state.config.clone(),
        summary: Summary::from(&state.report),
    })
}

/// Returns one record per vehicle.
///
/// `GET /schedule` → 200 + `Vec<ScheduleRecord>` JSON
pub async fn get_schedule(State(state): State<Arc<AppState>>) -> Json<Vec<ScheduleRecord>> {
    Json(
        state
            .report
            .vehicles
            .iter()
            .map(ScheduleRecord::from)
            .collect(),
    )
}

/// Returns slot records, optionally filtered by slot range.
///
/// `GET /profile` → 200 + `Vec<ProfileRecord>` JSON
/// `GET /profile?from=N&to=M` → filtered range (inclusive)
/// `GET /profile?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProfileQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<ProfileRecord> = state
        .report
        .slot_range(from, to)
        .iter()
        .map(ProfileRecord::from)
        .collect();

    Ok(Json(records))
}
