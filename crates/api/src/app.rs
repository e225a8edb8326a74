use axum::{middleware, routing::get, Router};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_admin,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{
    admin_export, admin_registrations, admin_reminders, admin_shifts, health, registrations,
    shifts,
};
use crate::services::{EmailService, ReminderService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
    pub verifier: Arc<shared::jwt::IdentityVerifier>,
    pub email_service: EmailService,
    pub reminder_service: ReminderService,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    // Rate limiting is enabled when rate_limit_per_minute > 0
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let verifier = Arc::new(shared::jwt::IdentityVerifier::with_leeway(
        &config.auth.jwt_secret,
        config.auth.leeway_secs,
    ));
    let email_service = EmailService::new(config.email.clone());
    let reminder_service = ReminderService::new(
        pool.clone(),
        Arc::new(email_service.clone()),
        config.email.clone(),
    );

    let state = AppState {
        pool,
        config: config.clone(),
        rate_limiter,
        verifier,
        email_service,
        reminder_service,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public self-service surface: browse shifts, sign up, unsubscribe.
    // No authentication; rate limited per client IP.
    let public_routes = Router::new()
        .nest("/api/v1/shifts", shifts::router())
        .nest("/api/v1/registrations", registrations::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Admin surface (bearer token, admin allowlist). The rate limiter is the
    // outer layer so unauthenticated floods are throttled before token checks.
    let admin_routes = Router::new()
        .nest("/api/v1/admin/shifts", admin_shifts::router())
        .nest(
            "/api/v1/admin/registrations",
            admin_registrations::router(),
        )
        .nest("/api/v1/admin/reminders", admin_reminders::router())
        .nest("/api/v1/admin/export", admin_export::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Operational routes (no authentication required)
    let ops_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(ops_routes)
        .merge(public_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
