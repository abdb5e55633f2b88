//! Backend for a single-page event invitation.
//!
//! Guests open `/e/{slug}`, unlock the RSVP and pledge dialogs with a shared access code, and
//! submit forms that land here. Hosts read everything back from a key-protected admin page.
//!
//!
//!
//! # Endpoints
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | POST | `/api/events/{slug}/rsvp` | store an RSVP, returns `{ok, id}` |
//! | GET | `/api/events/{slug}/rsvp` | RSVPs newest first, returns `{ok, items}` |
//! | POST | `/api/events/{slug}/pledge` | store a pledge, returns `{ok, id}` |
//! | GET | `/api/events/{slug}/pledge` | pledges newest first, returns `{ok, items}` |
//! | POST | `/api/events/{slug}/verify` | check `{code}` against the configured code |
//! | GET | `/admin/events/{slug}?key=` | admin dashboard (HTML) |
//! | GET | `/health` | liveness |
//!
//! Errors are always `{"error": "..."}` with 400, 401 or 500.
//!
//!
//!
//! # Notes
//!
//! ## Open submissions
//! Intake does not check the access code unless `ENFORCE_INVITE_CODE=true`. The invite page
//! gate is a convenience, anyone with the URL can post directly.
//!
//! ## Slugs
//! Events are never declared anywhere. Any non-empty slug is accepted and simply becomes the
//! partition key for its documents.
//!
//!
//!
//! # Setup
//!
//! ```sh
//! export REDIS_URL=redis://127.0.0.1:6379
//! export INVITE_CODES_JSON='{"peruth-innocent":"WED2025"}'
//! export ADMIN_KEY=change-me
//! RUST_LOG=info cargo run -p invite
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod access;
pub mod admin;
pub mod config;
pub mod database;
pub mod error;
pub mod gate;
pub mod intake;
pub mod listing;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

use access::INVITE_CODE_HEADER;
use routes::{
    admin_handler, create_pledge_handler, create_rsvp_handler, health_handler,
    list_pledges_handler, list_rsvps_handler, verify_handler,
};
use state::AppState;

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            warn!("Invalid CORS_ORIGIN: {e}, allowing any origin");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(INVITE_CODE_HEADER)])
        .max_age(Duration::from_secs(60 * 60))
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/events/{slug}/rsvp",
            get(list_rsvps_handler).post(create_rsvp_handler),
        )
        .route(
            "/api/events/{slug}/pledge",
            get(list_pledges_handler).post(create_pledge_handler),
        )
        .route("/api/events/{slug}/verify", post(verify_handler))
        .route("/admin/events/{slug}", get(admin_handler))
        .route("/health", get(health_handler))
        .layer(cors_layer(state.config.cors_origin.as_deref()))
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = match AppState::new().await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize state: {e}");
            return;
        }
    };

    info!("Starting server...");

    let app = build_router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = match TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {address}: {e}");
            return;
        }
    };
    info!("Server running on {address}");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
    }

    state.store.shutdown().await;
    info!("Server shut down");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
