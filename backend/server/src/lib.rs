//! # Todo API
//!
//! REST service for a single-page to-do list.
//!
//!
//!
//! # Endpoints
//!
//! | Method | Path | Success | Failures |
//! |---|---|---|---|
//! | `GET` | `/api/v1/todos` | 200 `{ data: Todo[] }`, newest first | 500 |
//! | `POST` | `/api/v1/todo` | 201 `{ message, data: Todo }` | 400, 500 |
//! | `PATCH` | `/api/v1/todo/{id}` | 200 `{ data: Todo }` | 400, 404, 500 |
//! | `DELETE` | `/api/v1/todo/{id}` | 200 `{ message }` | 404, 500 |
//!
//! Anything else, including a known path with the wrong method, gets
//! 404 `{ message: "Route not found" }`.
//!
//! Every failure body is `{ message }`. Store failures are logged with their
//! cause but clients only ever see a per-operation message such as
//! `Error fetching todos`.
//!
//!
//!
//! # Notes
//!
//! ## Source of truth
//! The frontend never patches its local list. After any write it fetches the
//! whole collection again, so there is no pagination and no partial response
//! shape to keep in sync.
//!
//! ## Concurrency
//! Handlers share nothing mutable except the store handle. Two writers on the
//! same todo race and the last write wins.
//!
//!
//!
//! # Setup
//!
//! Environment, read once at startup.
//! ```sh
//! PORT=3000
//! STORE=redis            # or memory
//! REDIS_URL=redis://127.0.0.1:6379
//! REDIS_PREFIX=todo
//! ALLOWED_ORIGINS=http://localhost:5173,https://todo.example.com
//! RUST_LOG=info
//! ```
//!
//! `/run/secrets/REDIS_URL` overrides `REDIS_URL` when mounted.
//!
//! Run the service.
//! ```sh
//! cargo run -p todo-backend
//! ```
use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::{get, patch, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod memory;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

use config::Config;
use error::StartupError;
use routes::{create_handler, delete_handler, list_handler, not_found_handler, update_handler};
use state::AppState;

pub async fn start_server() -> Result<(), StartupError> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(config).await?;

    info!("Starting server...");
    let app = build_router(state.clone())?;

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shut down");

    Ok(())
}

pub fn build_router(state: Arc<AppState>) -> Result<Router, StartupError> {
    let cors = cors_layer(&state.config.allowed_origins)?;

    Ok(Router::new()
        .route("/api/v1/todos", get(list_handler).fallback(not_found_handler))
        .route("/api/v1/todo", post(create_handler).fallback(not_found_handler))
        .route(
            "/api/v1/todo/{id}",
            patch(update_handler)
                .delete(delete_handler)
                .fallback(not_found_handler),
        )
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, StartupError> {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    // Credentials cannot be combined with a wildcard origin.
    if allowed_origins.iter().any(|origin| origin == "*") {
        warn!("ALLOWED_ORIGINS contains '*', allowing any origin without credentials");
        return Ok(cors.allow_origin(AllowOrigin::any()));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| StartupError::Origin(origin.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(cors
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_rejects_bad_origin() {
        assert!(cors_layer(&["http://localhost:5173".to_string()]).is_ok());
        assert!(matches!(
            cors_layer(&["http://bad\norigin".to_string()]),
            Err(StartupError::Origin(_))
        ));
    }

    #[test]
    fn test_cors_wildcard_origin() {
        assert!(cors_layer(&["*".to_string()]).is_ok());
        assert!(cors_layer(&["http://localhost:5173".to_string(), "*".to_string()]).is_ok());

        let config = Config {
            allowed_origins: vec!["*".to_string()],
            ..Config::default()
        };
        let state = AppState::with_store(config, Arc::new(memory::MemoryStore::default()));

        assert!(build_router(state).is_ok());
    }
}
