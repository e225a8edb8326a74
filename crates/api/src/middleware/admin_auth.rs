//! Admin authentication middleware.
//!
//! Gates the admin route group behind bearer-token identity plus roster
//! membership.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::app::AppState;
use crate::extractors::admin::AdminAuth;

/// Middleware that requires an authenticated admin.
///
/// Validates the `Authorization: Bearer` token, resolves the verified email
/// against the admin roster, and rejects outsiders. Admin information is
/// stored in request extensions for use by downstream handlers.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string());

    let token = match token {
        Some(token) => token,
        None => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    match AdminAuth::authenticate(&state, &token).await {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

/// Helper to create unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}
