//! Tracing and logging configuration
//!
//! Development gets pretty, human-readable output; production gets one JSON
//! object per event for log aggregation.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

/// Default filter when `RUST_LOG` is not set.
pub fn default_filter(env: &Environment) -> &'static str {
    if env.is_development() {
        "debug,fd_api=debug,fd_db=debug,tower_http=debug,sqlx=warn,hyper=info,reqwest=info"
    } else {
        "info,tower_http=info,sqlx=warn"
    }
}

/// Initialize tracing/logging based on the environment
///
/// `RUST_LOG` overrides the default level, e.g. `RUST_LOG=debug,tower_http=trace`.
pub fn init_tracing(env: &Environment) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(env)));

    if env.is_development() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .pretty()
                    .with_filter(env_filter),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .flatten_event(true)
                    .with_target(true)
                    .with_filter(env_filter),
            )
            .init();
    }

    tracing::info!(environment = ?env, "Tracing initialized");
}
