//! Logging initialization.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Initializes the tracing subscriber from configuration.
///
/// `RUST_LOG` overrides the configured level entirely. Without it, the
/// configured level applies with sqlx statement logging capped at warn,
/// which otherwise drowns the request logs at debug.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},sqlx=warn,hyper=warn", config.level))
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.format == "json" {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_span_events(FmtSpan::CLOSE)
                    .with_current_span(true)
                    .with_target(true),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_span_events(FmtSpan::CLOSE))
            .init();
    }
}
