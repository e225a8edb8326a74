//! Public registration routes: review own signups and request removal.
//!
//! Registrants never delete rows themselves. An unsubscribe moves the
//! registration to `pending_removal` and leaves the final word to an admin,
//! so capacity only frees once someone approves.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    BulkUnsubscribeResponse, Registration, RegistrationListResponse, RegistrationWithShift,
    UnsubscribeRequest,
};
use persistence::repositories::{RegistrationRepository, ShiftRepository};

use crate::app::AppState;
use crate::error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_own_registrations))
        .route("/unsubscribe", post(bulk_unsubscribe))
        .route("/:id/unsubscribe", post(request_unsubscribe))
}

#[derive(Debug, Deserialize, Validate)]
struct OwnRegistrationsQuery {
    #[validate(custom(function = "shared::validation::validate_email"))]
    email: String,
}

/// GET /?email= - a registrant's signups for upcoming shifts, both statuses.
#[axum::debug_handler]
async fn list_own_registrations(
    State(state): State<AppState>,
    Query(query): Query<OwnRegistrationsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    query.validate()?;
    let email = shared::validation::normalize_email(&query.email);

    let repo = RegistrationRepository::new(state.pool.clone());
    let registrations: Vec<RegistrationWithShift> = repo
        .list_by_email_upcoming(&email)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let total = registrations.len();
    Ok(Json(RegistrationListResponse {
        registrations,
        total,
    }))
}

/// POST /:id/unsubscribe - request removal of one registration.
///
/// The body email must match the registration; it is the only proof of
/// ownership this surface has. Past shifts are frozen.
#[axum::debug_handler]
async fn request_unsubscribe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UnsubscribeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let email = payload.normalized_email();

    let repo = RegistrationRepository::new(state.pool.clone());
    let registration = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Registration not found".to_string()))?;

    if registration.email != email {
        return Err(ApiError::Forbidden(
            "Email does not match this registration".to_string(),
        ));
    }

    let shift = ShiftRepository::new(state.pool.clone())
        .find_by_id(registration.shift_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Shift not found".to_string()))?;
    if shift.shift_date < Utc::now().date_naive() {
        return Err(ApiError::StaleShift);
    }

    // Conditional update: only an active registration can move to
    // pending_removal, even when another request races this one.
    let updated: Registration = repo
        .request_removal(id)
        .await?
        .ok_or_else(|| {
            ApiError::PreconditionFailed(
                "Removal has already been requested for this registration".to_string(),
            )
        })?
        .into();

    info!(
        registration_id = %updated.id,
        shift_id = %updated.shift_id,
        "Removal requested"
    );

    Ok(Json(updated))
}

/// POST /unsubscribe - request removal of every upcoming signup of an email.
#[axum::debug_handler]
async fn bulk_unsubscribe(
    State(state): State<AppState>,
    Json(payload): Json<UnsubscribeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let email = payload.normalized_email();

    let repo = RegistrationRepository::new(state.pool.clone());
    let updated = repo.request_removal_bulk(&email).await?;

    info!(updated = updated, "Bulk removal requested");

    Ok(Json(BulkUnsubscribeResponse { updated }))
}
