use anyhow::Result;
use arc_swap::ArcSwap;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    auth, config::Config, handlers, metrics, signals::setup_signal_handlers, store::Store,
};

/// Start the Warehouse Rates server
///
/// This function:
/// 1. Initializes metrics
/// 2. Sets up signal handlers for graceful shutdown and config reload
/// 3. Opens the pricing database
/// 4. Creates the Axum application
/// 5. Serves requests with graceful shutdown support
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize metrics
    info!("Initializing Prometheus metrics...");
    let metrics_handle = Arc::new(metrics::init_metrics());

    // Wrap config in ArcSwap for atomic reload support
    let config_swap = Arc::new(ArcSwap::from_pointee(config.clone()));

    // Setup signal handlers (SIGTERM, SIGINT for shutdown; SIGHUP for reload)
    let (shutdown_tx, signal_handle) = setup_signal_handlers(config_swap.clone());
    let mut shutdown_rx = shutdown_tx.subscribe();

    info!("Opening pricing database at {}", config.database.url);
    let store = Store::connect(&config.database.url).await?;

    let app_state = handlers::quote::AppState {
        config: config_swap.clone(),
        store,
    };

    // Build the Axum router
    let app = create_router(config_swap.clone(), app_state, metrics_handle);

    // Create socket address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting Warehouse Rates on {}", addr);
    info!("Configuration: {} API keys", config.api_keys.len());

    // Bind to address
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            // Wait for shutdown signal
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    // Wait for signal handler task to complete
    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(
    config: Arc<arc_swap::ArcSwap<Config>>,
    app_state: handlers::quote::AppState,
    metrics_handle: Arc<metrics_exporter_prometheus::PrometheusHandle>,
) -> Router {
    // Create authenticated routes
    let auth_routes = Router::new()
        .route("/v1/quote", post(handlers::quote::handle_quote))
        .route("/v1/rates", get(handlers::rates::list_rates))
        .route(
            "/v1/reports/occupant-costs",
            get(handlers::reports::occupant_costs),
        )
        .route(
            "/v1/reports/user-costs",
            get(handlers::reports::user_costs),
        )
        .layer(middleware::from_fn_with_state(
            config.clone(),
            auth::auth_middleware,
        ))
        .with_state(app_state.clone());

    // Combine with public routes
    Router::new()
        // Public endpoints (no auth required)
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .with_state(app_state)
        .merge(
            Router::new()
                .route("/metrics", get(handlers::metrics_handler::metrics))
                .with_state(metrics_handle),
        )
        // Merge authenticated routes
        .merge(auth_routes)
        // Quote and report payloads are tiny; 64KB is generous
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(TraceLayer::new_for_http())
}
