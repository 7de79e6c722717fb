use anyhow::Context;
use axum::{Router, middleware, routing::get};
use fd_api::{ApiConfig, ApiState};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables (and `.env` when present)
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env().context("invalid configuration")?;

    fd_api::tracing::init_tracing(&config.env);

    let pool = fd_db::create_pool(&config.database_url, config.db_max_connections).await?;
    fd_db::ensure_db_and_migrate(&config.database_url, &pool).await?;
    tracing::info!("Database ready");

    let metrics_handle = fd_api::metrics::init_metrics()?;

    let state = ApiState::new(&config, pool);

    let cors = fd_api::middleware::create_cors_layer(&config.allowed_origins());

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let metrics_app = Router::new()
        .route("/metrics", get(fd_api::metrics::metrics_handler))
        .with_state(metrics_handle);

    let app = fd_api::router::router()
        .with_state(state)
        .merge(metrics_app)
        .layer(cors)
        .layer(trace_layer)
        .layer(middleware::from_fn(fd_api::metrics::track_metrics))
        .layer(middleware::from_fn(fd_api::middleware::request_id_middleware));

    let app = fd_api::middleware::apply_security_headers(app, config.env);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(environment = ?config.env, %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
