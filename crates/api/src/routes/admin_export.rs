//! Admin export route: active registrations with shift schedule details.

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use tracing::info;

use domain::models::{RegistrationExportResponse, RegistrationExportRow};
use persistence::repositories::RegistrationRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminAuth;

pub fn router() -> Router<AppState> {
    Router::new().route("/registrations", get(export_registrations))
}

/// GET /registrations - every active registration, sorted by shift date.
///
/// Returns structured rows; turning them into a spreadsheet is the caller's
/// concern.
#[axum::debug_handler]
async fn export_registrations(
    State(state): State<AppState>,
    admin: AdminAuth,
) -> Result<impl IntoResponse, ApiError> {
    let repo = RegistrationRepository::new(state.pool.clone());
    let rows: Vec<RegistrationExportRow> = repo
        .export_active()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let total = rows.len();
    info!(admin = %admin.email, rows = total, "Registrations exported");

    Ok(Json(RegistrationExportResponse { rows, total }))
}
