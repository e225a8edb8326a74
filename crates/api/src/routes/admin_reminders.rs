//! Admin reminder routes: preview due candidates and dispatch a batch now.
//!
//! The scheduler runs the same dispatch on an interval; this surface exists
//! for catch-up after downtime and for verifying what a run would do.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use domain::models::{DispatchRemindersRequest, DueRemindersResponse, ReminderKind};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminAuth;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/due", get(list_due))
        .route("/dispatch", post(dispatch))
}

#[derive(Debug, Deserialize)]
struct DueQuery {
    lead_days: i64,
}

fn milestone(lead_days: i64) -> Result<ReminderKind, ApiError> {
    ReminderKind::from_lead_days(lead_days)
        .ok_or_else(|| ApiError::Validation("lead_days must be 7 or 3".to_string()))
}

/// GET /due?lead_days= - candidates a dispatch run would process right now.
#[axum::debug_handler]
async fn list_due(
    State(state): State<AppState>,
    Query(query): Query<DueQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = milestone(query.lead_days)?;
    let candidates = state.reminder_service.preview(kind).await?;

    let total = candidates.len();
    Ok(Json(DueRemindersResponse {
        lead_days: kind.lead_days(),
        candidates,
        total,
    }))
}

/// POST /dispatch - run one reminder batch immediately.
#[axum::debug_handler]
async fn dispatch(
    State(state): State<AppState>,
    admin: AdminAuth,
    Json(payload): Json<DispatchRemindersRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = milestone(payload.lead_days)?;
    let report = state.reminder_service.dispatch(kind).await?;

    info!(
        admin = %admin.email,
        lead_days = report.lead_days,
        successful = report.successful,
        failed = report.failed,
        "Manual reminder dispatch finished"
    );

    Ok(Json(report))
}
