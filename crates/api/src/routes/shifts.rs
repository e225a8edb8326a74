//! Public shift routes: browse the schedule and sign up.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    CreateRegistrationRequest, Registration, ShiftListResponse, ShiftWithCount,
};
use persistence::repositories::{RegistrationRepository, ShiftRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_registration_admitted;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_shifts))
        .route("/:id", get(get_shift))
        .route("/:id/registrations", post(register))
}

/// GET / - upcoming shifts with live counts and derived status.
#[axum::debug_handler]
async fn list_shifts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = ShiftRepository::new(state.pool.clone());
    let shifts: Vec<ShiftWithCount> = repo
        .list_upcoming_with_counts()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let total = shifts.len();
    Ok(Json(ShiftListResponse { shifts, total }))
}

/// GET /:id - one shift with its live count.
#[axum::debug_handler]
async fn get_shift(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ShiftRepository::new(state.pool.clone());
    let shift: ShiftWithCount = repo
        .find_with_count(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Shift not found".to_string()))?
        .into();

    Ok(Json(shift))
}

/// POST /:id/registrations - sign up for a shift.
///
/// Capacity and duplicate checks run inside the admission transaction, so a
/// full or closed shift refuses with a conflict even under concurrent signups.
#[axum::debug_handler]
async fn register(
    State(state): State<AppState>,
    Path(shift_id): Path<Uuid>,
    Json(payload): Json<CreateRegistrationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.sanitized();
    payload.validate()?;

    let repo = RegistrationRepository::new(state.pool.clone());
    let registration: Registration = repo
        .admit(shift_id, &payload.name, &payload.email, &payload.phone)
        .await?
        .into();

    record_registration_admitted();
    info!(
        registration_id = %registration.id,
        shift_id = %shift_id,
        "Volunteer registered for shift"
    );

    Ok((StatusCode::CREATED, Json(registration)))
}
