//! Admin registration routes: review, settle removal requests, override.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use domain::models::{
    Registration, RegistrationListResponse, RegistrationStatus, RegistrationWithShift,
};
use persistence::repositories::RegistrationRepository;

use crate::app::AppState;
use crate::error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_registrations))
        .route("/:id/approve-removal", post(approve_removal))
        .route("/:id/reject-removal", post(reject_removal))
        .route("/:id", delete(delete_registration))
}

#[derive(Debug, Default, Deserialize)]
struct RegistrationsQuery {
    status: Option<RegistrationStatus>,
    shift_id: Option<Uuid>,
}

/// GET /?status=&shift_id= - registrations with shift details, newest first.
#[axum::debug_handler]
async fn list_registrations(
    State(state): State<AppState>,
    Query(query): Query<RegistrationsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = RegistrationRepository::new(state.pool.clone());
    let registrations: Vec<RegistrationWithShift> = repo
        .list_filtered(query.status.map(Into::into), query.shift_id)
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

/// POST /:id/approve-removal - confirm a pending removal and delete the row.
///
/// Deleting frees a seat, so the shift may flip back from full to open.
#[axum::debug_handler]
async fn approve_removal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = RegistrationRepository::new(state.pool.clone());
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Registration not found".to_string()))?;

    let approved = repo.approve_removal(id).await?;
    if !approved {
        return Err(ApiError::PreconditionFailed(
            "Registration is not awaiting removal approval".to_string(),
        ));
    }

    info!(registration_id = %id, "Removal approved, registration deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /:id/reject-removal - decline a pending removal, restoring `active`.
#[axum::debug_handler]
async fn reject_removal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = RegistrationRepository::new(state.pool.clone());
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Registration not found".to_string()))?;

    let registration: Registration = repo
        .reject_removal(id)
        .await?
        .ok_or_else(|| {
            ApiError::PreconditionFailed(
                "Registration is not awaiting removal approval".to_string(),
            )
        })?
        .into();

    info!(
        registration_id = %registration.id,
        shift_id = %registration.shift_id,
        "Removal rejected, registration restored"
    );

    Ok(Json(registration))
}

/// DELETE /:id - admin override, removes a registration in any status.
#[axum::debug_handler]
async fn delete_registration(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = RegistrationRepository::new(state.pool.clone());
    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Registration not found".to_string()));
    }

    info!(registration_id = %id, "Registration deleted by admin");

    Ok(StatusCode::NO_CONTENT)
}
