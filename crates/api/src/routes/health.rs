//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: DatabaseHealth,
    pub email: EmailHealth,
}

/// Database health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseHealth {
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

/// Email sink health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EmailHealth {
    /// Whether email sending is enabled.
    pub enabled: bool,
    /// Configured provider name.
    pub provider: String,
    /// Whether the provider has everything it needs to send.
    pub configured: bool,
}

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Full health check endpoint.
///
/// Returns detailed health information including database connectivity
/// and the email sink status.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();
    let db_connected = persistence::db::ping(&state.pool).await.is_ok();
    let latency_ms = start.elapsed().as_millis() as u64;

    let email = EmailHealth {
        enabled: state.email_service.is_enabled(),
        provider: state.email_service.provider().to_string(),
        configured: state.email_service.is_configured(),
    };

    let response = HealthResponse {
        status: if db_connected { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            connected: db_connected,
            latency_ms: if db_connected { Some(latency_ms) } else { None },
        },
        email,
    };

    if db_connected {
        Ok(Json(response))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

/// Liveness probe endpoint.
///
/// Returns 200 OK if the process is running.
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
///
/// Returns 200 OK if the service can accept traffic (database connected).
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    let db_connected = persistence::db::ping(&state.pool).await.is_ok();

    if db_connected {
        Ok(Json(StatusResponse {
            status: "ready".to_string(),
        }))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_healthy() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.6.2".to_string(),
            database: DatabaseHealth {
                connected: true,
                latency_ms: Some(5),
            },
            email: EmailHealth {
                enabled: false,
                provider: "console".to_string(),
                configured: true,
            },
        };
        assert_eq!(response.status, "healthy");
        assert!(response.database.connected);
        assert_eq!(response.database.latency_ms, Some(5));
    }

    #[test]
    fn test_health_response_unhealthy() {
        let response = HealthResponse {
            status: "unhealthy".to_string(),
            version: "0.6.2".to_string(),
            database: DatabaseHealth {
                connected: false,
                latency_ms: None,
            },
            email: EmailHealth {
                enabled: true,
                provider: "resend".to_string(),
                configured: false,
            },
        };
        assert_eq!(response.status, "unhealthy");
        assert!(!response.database.connected);
        assert!(response.database.latency_ms.is_none());
    }

    #[test]
    fn test_email_health_serialization() {
        let health = EmailHealth {
            enabled: true,
            provider: "resend".to_string(),
            configured: true,
        };
        let json = serde_json::to_string(&health).unwrap();
        assert!(json.contains("\"enabled\":true"));
        assert!(json.contains("\"provider\":\"resend\""));
        assert!(json.contains("\"configured\":true"));
    }

    #[test]
    fn test_status_response() {
        let response = StatusResponse {
            status: "alive".to_string(),
        };
        assert_eq!(response.status, "alive");
    }
}
