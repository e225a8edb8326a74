//! Admin shift routes: create, list, open or close, and delete shifts.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Json, Router,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    CreateShiftRequest, SetShiftOpenStateRequest, Shift, ShiftListResponse, ShiftWithCount,
};
use persistence::repositories::ShiftRepository;

use crate::app::AppState;
use crate::error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_shift).get(list_all_shifts))
        .route("/:id/status", patch(set_shift_status))
        .route("/:id", delete(delete_shift))
}

/// POST / - create a shift. New shifts start open.
#[axum::debug_handler]
async fn create_shift(
    State(state): State<AppState>,
    Json(payload): Json<CreateShiftRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.sanitized();
    payload.validate()?;
    payload.schedule_checks()?;

    let repo = ShiftRepository::new(state.pool.clone());
    let shift: Shift = repo
        .create(
            &payload.title,
            payload.shift_date,
            payload.start_time,
            payload.end_time,
            payload.min_people,
            payload.max_people,
            payload.remarks.as_deref(),
        )
        .await?
        .into();

    info!(
        shift_id = %shift.id,
        shift_date = %shift.shift_date,
        title = %shift.title,
        "Shift created"
    );

    Ok((StatusCode::CREATED, Json(shift)))
}

/// GET / - every shift, past included, with live counts.
#[axum::debug_handler]
async fn list_all_shifts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = ShiftRepository::new(state.pool.clone());
    let shifts: Vec<ShiftWithCount> = repo
        .list_all_with_counts()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let total = shifts.len();
    Ok(Json(ShiftListResponse { shifts, total }))
}

/// PATCH /:id/status - toggle a shift between open and closed.
///
/// The stored status never becomes `full`; that value is derived from the
/// active count on every read.
#[axum::debug_handler]
async fn set_shift_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetShiftOpenStateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ShiftRepository::new(state.pool.clone());
    let shift: Shift = repo
        .set_open_state(id, payload.open)
        .await?
        .ok_or_else(|| ApiError::NotFound("Shift not found".to_string()))?
        .into();

    info!(shift_id = %shift.id, open = payload.open, "Shift status updated");

    Ok(Json(shift))
}

/// DELETE /:id - remove a shift. Registrations and sent-log rows cascade.
#[axum::debug_handler]
async fn delete_shift(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ShiftRepository::new(state.pool.clone());
    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Shift not found".to_string()));
    }

    info!(shift_id = %id, "Shift deleted");

    Ok(StatusCode::NO_CONTENT)
}
