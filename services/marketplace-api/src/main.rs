//! Wordforge Marketplace API
//!
//! REST backend for the copywriting-services marketplace.
//!
//! ## REST Endpoints
//!
//! - `POST /api/v1/accounts` - Register an account
//! - `GET /api/v1/accounts/:id` - Get an account
//! - `PUT /api/v1/accounts/:id/billing` - Update the billing profile
//! - `PUT /api/v1/accounts/:id/notifications` - Update notification preferences
//! - `POST /api/v1/orders` - Create an order
//! - `GET /api/v1/orders` - List an account's orders
//! - `GET /api/v1/orders/:id` - Get an order
//! - `POST /api/v1/orders/:id/progress` - Move an order into progress
//! - `POST /api/v1/orders/:id/complete` - Complete an order
//! - `POST /api/v1/orders/:id/cancel` - Cancel an order
//! - `POST /api/v1/orders/:id/deliveries` - Record a staff delivery
//! - `POST /api/v1/orders/:id/uploads` - Record a customer upload
//! - `PUT /api/v1/orders/:id/invoice` - Link the external invoice reference
//! - `POST /api/v1/payments` - Start a top-up or order payment
//! - `GET /api/v1/payments` - List an account's payments
//! - `GET /api/v1/payments/:id` - Get a payment
//! - `POST /webhooks/payments` - Processor webhook handler
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics

mod config;
mod error;
mod handlers;
mod state;

use std::net::SocketAddr;

use axum::extract::connect_info::IntoMakeServiceWithConnectInfo;
use axum::routing::{get, post, put};
use axum::Router;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::handlers::{health, ready};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("marketplace_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Wordforge Marketplace API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(http_port = config.http_port, "Configuration loaded");

    // Initialize metrics
    let metrics_handle = if config.metrics_enabled {
        Some(setup_metrics()?)
    } else {
        None
    };

    // Create database pool
    let pool = wordforge_db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Wire services
    let state = AppState::new(pool, config.clone());

    // One-time administrator bootstrap, idempotent across restarts
    if let (Some(email), Some(hash)) = (&config.admin_email, &config.admin_password_hash) {
        let admin = state.accounts.bootstrap_admin(email, hash).await?;
        tracing::info!(admin_id = %admin.id, "Administrator account ensured");
    }

    // Build HTTP router
    let app = build_router(state, metrics_handle);

    // Start server
    let http_addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    run_http_server(app, http_addr).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let request_timeout = state.request_timeout();

    // API v1 routes
    let api_v1 = Router::new()
        // Account routes
        .route("/accounts", post(handlers::register_account))
        .route("/accounts/{id}", get(handlers::get_account))
        .route("/accounts/{id}/billing", put(handlers::update_billing_profile))
        .route(
            "/accounts/{id}/notifications",
            put(handlers::update_notification_prefs),
        )
        // Order routes
        .route("/orders", post(handlers::create_order).get(handlers::list_orders))
        .route("/orders/{id}", get(handlers::get_order))
        .route("/orders/{id}/progress", post(handlers::mark_in_progress))
        .route("/orders/{id}/complete", post(handlers::complete_order))
        .route("/orders/{id}/cancel", post(handlers::cancel_order))
        .route("/orders/{id}/deliveries", post(handlers::record_delivery))
        .route("/orders/{id}/uploads", post(handlers::record_customer_upload))
        .route("/orders/{id}/invoice", put(handlers::set_invoice_ref))
        // Payment routes
        .route("/payments", post(handlers::start_payment).get(handlers::list_payments))
        .route("/payments/{id}", get(handlers::get_payment));

    // Webhook route (separate - uses raw body, no JSON parsing)
    let webhook_routes = Router::new().route("/webhooks/payments", post(handlers::payment_webhook));

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    // Metrics route (no timeout)
    let metrics_route = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Request ID propagation (outermost)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // CORS
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Request timeout (innermost - closest to handler)
        .layer(TimeoutLayer::new(request_timeout));

    // Combine all routes
    Router::new()
        .nest("/api/v1", api_v1)
        .merge(webhook_routes)
        .layer(middleware)
        .merge(health_routes) // Health routes without timeout
        .merge(metrics_route) // Metrics route without timeout
        .with_state(state)
}

async fn run_http_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let service: IntoMakeServiceWithConnectInfo<Router, SocketAddr> =
        app.into_make_service_with_connect_info();

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    // Latency buckets for marketplace operations; most are single-query
    // paths well under 100ms
    let latency_buckets = &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.2, 0.5, 1.0, 2.5];

    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            latency_buckets,
        )?
        .set_buckets_for_metric(
            Matcher::Full("marketplace_operation_duration_seconds".to_string()),
            latency_buckets,
        )?;

    let handle = builder.install_recorder()?;

    // Register metrics with descriptions
    metrics::describe_counter!(
        "marketplace_accounts_registered_total",
        "Total accounts registered"
    );
    metrics::describe_counter!("marketplace_orders_created_total", "Total orders created");
    metrics::describe_counter!(
        "marketplace_orders_completed_total",
        "Total orders completed"
    );
    metrics::describe_counter!(
        "marketplace_orders_cancelled_total",
        "Total orders cancelled"
    );
    metrics::describe_counter!(
        "marketplace_payments_started_total",
        "Total payments started by kind"
    );
    metrics::describe_counter!(
        "marketplace_webhooks_processed_total",
        "Total webhooks processed by status"
    );
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request latency in seconds"
    );
    metrics::describe_histogram!(
        "marketplace_operation_duration_seconds",
        "Marketplace operation latency in seconds by operation type"
    );

    Ok(handle)
}

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
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
