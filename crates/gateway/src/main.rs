//! Biospace API Gateway
//!
//! HTTP binding of the research engine.
//! Handles:
//! - Request validation and routing
//! - Shared-credential check for corpus reseed
//! - Rate limiting
//! - Observability (logging, metrics, tracing)

mod handlers;
mod middleware;

use axum::{
    routing::{get, post},
    Router,
};
use biospace_common::{auth::SharedCredential, config::AppConfig, corpus::JsonFileSource, metrics};
use biospace_search::ResearchService;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::Notify;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub service: Arc<ResearchService>,
    pub credential: SharedCredential,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Arc::new(AppConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?);

    init_tracing(&config);

    info!(
        service = %config.observability.service_name,
        "Starting Biospace API Gateway v{}",
        biospace_common::VERSION
    );

    // Initialize metrics
    if config.observability.metrics_port != 0 {
        PrometheusBuilder::new()
            .with_http_listener(([0, 0, 0, 0], config.observability.metrics_port))
            .add_global_label("service", config.observability.service_name.clone())
            .install()?;
        info!(port = config.observability.metrics_port, "Prometheus exporter listening");
    }
    metrics::register_metrics();

    // Load the initial corpus snapshot
    let source = Arc::new(JsonFileSource::new(&config.corpus.path));
    let service = ResearchService::bootstrap(source, config.search.clone()).await?;

    let credential = SharedCredential::new(config.auth.admin_token.as_deref());
    if !credential.is_configured() {
        info!("No admin credential configured, corpus reseed disabled");
    }

    let state = AppState {
        config: config.clone(),
        service: Arc::new(service),
        credential,
    };

    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let signalled = Arc::new(Notify::new());
    let notify = signalled.clone();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            notify.notify_one();
        })
        .into_future();

    if drain_with_deadline(server, signalled, config.shutdown_timeout()).await? {
        info!("Server shutdown complete");
    }
    Ok(())
}

/// Run `server` to completion, allowing in-flight requests `grace` once
/// `signalled` fires. Returns false when the deadline cut the drain short.
async fn drain_with_deadline<F>(server: F, signalled: Arc<Notify>, grace: Duration) -> std::io::Result<bool>
where
    F: Future<Output = std::io::Result<()>>,
{
    let deadline = async {
        signalled.notified().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => result.map(|_| true),
        _ = deadline => {
            warn!(grace_secs = grace.as_secs(), "Shutdown deadline reached, dropping open connections");
            Ok(false)
        }
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.observability.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let limiter = middleware::rate_limit::RateLimitState::from_config(&state.config.rate_limit);

    let api_routes = Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        // Retrieval
        .route("/search", post(handlers::search::search))
        .route("/documents/{id}", get(handlers::documents::get_document))
        .route("/counts", get(handlers::documents::counts))
        // Provenance graph
        .route("/graph", get(handlers::graph::get_graph))
        // Synthesis
        .route("/compare", post(handlers::compare::compare))
        // Administration
        .route("/admin/reseed", post(handlers::admin::reseed));

    let api_routes = match limiter {
        Some(limiter) => api_routes.layer(axum::middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit::rate_limit_middleware,
        )),
        None => api_routes,
    };

    Router::new()
        .nest("/v1", api_routes)
        .layer(axum::middleware::from_fn(middleware::metrics::track_requests))
        .layer(TimeoutLayer::new(state.config.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
