//! Admin authentication extractor.
//!
//! Resolves a verified bearer identity against the admin roster.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::app::AppState;
use crate::error::ApiError;
use persistence::repositories::AdminUserRepository;

/// Authenticated admin information.
///
/// Produced by validating the `Authorization: Bearer` token and checking that
/// the verified email belongs to the admin roster.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    /// Database ID of the admin user.
    pub admin_id: uuid::Uuid,
    /// Verified email address.
    pub email: String,
    /// Display name from the roster.
    pub name: String,
}

impl AdminAuth {
    /// Validates a bearer token and returns admin authentication info.
    ///
    /// This is the core authentication logic, extracted for testability.
    pub async fn authenticate(state: &AppState, token: &str) -> Result<Self, ApiError> {
        // Token signature and expiry checks yield the verified email
        let identity = state.verifier.verify(token)?;

        let repo = AdminUserRepository::new(state.pool.clone());
        let admin = repo
            .find_by_email(&identity.email)
            .await
            .map_err(|e| {
                tracing::error!("Database error during admin lookup: {}", e);
                ApiError::Internal("Authentication service unavailable".to_string())
            })?
            .ok_or_else(|| ApiError::Forbidden("Admin access required".to_string()))?;

        Ok(AdminAuth {
            admin_id: admin.id,
            email: admin.email,
            name: admin.name,
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // The admin middleware has usually run already and stashed the context
        if let Some(auth) = parts.extensions.get::<AdminAuth>() {
            return Ok(auth.clone());
        }

        let token = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or_else(|| {
                ApiError::Unauthorized("Missing or invalid Authorization header".to_string())
            })?;

        Self::authenticate(state, token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_auth_clone() {
        let auth = AdminAuth {
            admin_id: uuid::Uuid::new_v4(),
            email: "admin@vvboskant.nl".to_string(),
            name: "Beheerder".to_string(),
        };
        let cloned = auth.clone();
        assert_eq!(auth.admin_id, cloned.admin_id);
        assert_eq!(auth.email, cloned.email);
    }

    #[test]
    fn test_admin_auth_debug() {
        let auth = AdminAuth {
            admin_id: uuid::Uuid::new_v4(),
            email: "admin@vvboskant.nl".to_string(),
            name: "Beheerder".to_string(),
        };
        let debug_str = format!("{:?}", auth);
        assert!(debug_str.contains("AdminAuth"));
        assert!(debug_str.contains("admin@vvboskant.nl"));
    }
}
