//! CANYON-MED Service
//!
//! HTTP front end and shared startup code for the `canyon-med` binary.

use axum::{
    routing::{get, post},
    Router,
};
use inference_engine::PredictorSet;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod config;
mod error;
mod routes;

pub use crate::config::{AppConfig, LoggingConfig, ServerConfig};
pub use error::ApiError;

/// Application state shared across handlers
pub struct AppState {
    /// Loaded predictors, read-only after startup
    pub predictors: Arc<PredictorSet>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus handle, if a recorder was installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(predictors: PredictorSet, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            predictors: Arc::new(predictors),
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics,
        }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(routes::health::get_health))
        .route("/api/v1/estimates", post(routes::estimates::post_estimates))
        .route("/metrics", get(routes::metrics::get_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Initialize logging
///
/// Output goes to stderr so command output on stdout stays parseable.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Install the global Prometheus recorder
pub fn init_metrics() -> Result<PrometheusHandle, metrics_exporter_prometheus::BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    metrics::describe_counter!("canyon_samples_total", "Samples estimated, per property");
    metrics::describe_counter!("canyon_nan_estimates_total", "Estimates that came out NaN, per property");
    metrics::describe_histogram!("canyon_batch_seconds", "Batch inference time, per property");
    Ok(handle)
}

/// Run the server
pub async fn run_server(addr: &str, state: AppState) -> Result<(), std::io::Error> {
    let app = create_router(Arc::new(state));

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
