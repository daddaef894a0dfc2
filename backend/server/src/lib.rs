//! Documentation of a satellite tracking cache.
//!
//! Serves the active satellite population, positioned and enriched, to a
//! globe frontend. Data comes from two public CelesTrak feeds and is kept
//! in Redis so upstream is hit at most once per TTL window.
//!
//!
//!
//! # General Infrastructure
//! - Frontend asks `/api/satellites` once on load
//! - Server reads both regions through the refresh policy, joins them in memory
//! - Redis holds the raw catalog rows and the positioned tracks, never the joined result
//! - Catalog refreshes every 24 hours, tracks every 2 hours, both driven by TTL expiry
//!
//!
//!
//! # Degradation
//!
//! **Goal**: the frontend always gets a 200 with whatever data exists.
//!
//! - Upstream down or malformed: that region is empty for this request, cache untouched
//! - Tracks feed rate limited (403/429): serve the cached copy, however old
//! - Redis connection dropped: reconnect once and rerun the read, then give up with an empty region
//! - Only an unexpected failure in request handling returns a 500
//!
//!
//!
//! # Notes
//!
//! ## Why the join is not cached
//! Both feeds expire on different schedules. Caching the joined result would
//! tie the catalog to the tracks TTL or serve stale owners for a day. Joining
//! ~10k records on every request is cheap compared to the network round trip.
//!
//! ## Positions
//! Lat/lng/alt are propagated once per tracks refresh. The globe animates
//! from the element sets, not from these positions.
//!
//! ## Racing misses
//! Two requests missing the same key both fetch and both write. Last write
//! wins. Upstream data is identical so no lock is taken.
//!
//!
//!
//! # Setup
//!
//! Run against a local Redis.
//! ```sh
//! docker run -p 6379:6379 redis
//! RUST_LOG=info cargo run -p server
//! ```
//!
//! Run without Redis.
//! ```sh
//! CACHE_BACKEND=memory cargo run -p server
//! ```
//!
//! Warm both regions before opening traffic.
//! ```sh
//! cargo run -p warmer -- --region all
//! ```
//!
//!
//!
//! # Endpoints
//!
//! All satellites, optionally filtered by owner code.
//! ```sh
//! curl localhost:3000/api/satellites?country=US
//! ```
//!
//! Satellite counts per owner.
//! ```sh
//! curl localhost:3000/api/countries
//! ```
//!
//! Drop a region and refill it from upstream.
//! ```sh
//! curl -X POST localhost:3000/api/refresh/catalog
//! curl -X POST localhost:3000/api/refresh/tracks
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod refresh;
pub mod routes;
pub mod state;
pub mod store;

use error::AppError;
use routes::{countries_handler, refresh_catalog_handler, refresh_handler, satellites_handler};
use state::State;

pub async fn start_server() -> Result<(), AppError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new().await?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");
    Ok(())
}

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/satellites", get(satellites_handler))
        .route("/api/countries", get(countries_handler))
        .route("/api/refresh/{region}", get(refresh_handler).post(refresh_handler))
        .route("/api/refresh-satcat-cache", get(refresh_catalog_handler))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
