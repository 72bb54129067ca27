//! # tmail HTTP API
//!
//! ## Endpoints
//!
//! - `GET /tmail/info` - host name and version, plain text
//! - `POST /tmail/v1` - ingest one message
//!
//! Response codes for `/tmail/v1`:
//!
//! | Outcome                                      | Status |
//! |----------------------------------------------|--------|
//! | stored                                       | 201    |
//! | already stored                               | 200    |
//! | not POST, invalid JSON, preset id, bad parent | 400    |
//! | no `Content-Length`                          | 411    |
//! | over the size limit                          | 413    |
//! | not `application/json`                       | 415    |
//! | parent not found                             | 422    |
//! | body could not be read                       | 500    |
//! | storage unavailable (`Retry-After: 1`)       | 503    |

mod handlers;
mod types;

pub use handlers::{info_handler, ingest_handler, must_be_post, ApiError};
pub use types::{ErrorResponse, IngestResponse, WireMessage};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tmail_kernel::{ExistenceOracle, Ingestor, StoreGateway};
use tower_http::trace::TraceLayer;

use crate::config::HostConfig;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
pub struct AppState<O: ExistenceOracle, G: StoreGateway> {
    pub ingestor: Ingestor<O, G>,
    pub max_message_size: usize,
}

impl<O: ExistenceOracle, G: StoreGateway> Clone for AppState<O, G> {
    fn clone(&self) -> Self {
        Self {
            ingestor: self.ingestor.clone(),
            max_message_size: self.max_message_size,
        }
    }
}

impl<O: ExistenceOracle, G: StoreGateway> AppState<O, G> {
    pub fn new(ingestor: Ingestor<O, G>, max_message_size: usize) -> Self {
        Self {
            ingestor,
            max_message_size,
        }
    }
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the router with both endpoints and request tracing.
///
/// The body limit layer bounds how much of a request body the ingest
/// handler will buffer.
pub fn create_router<O, G>(state: AppState<O, G>) -> Router
where
    O: ExistenceOracle + 'static,
    G: StoreGateway + 'static,
{
    let limit = state.max_message_size;

    Router::new()
        .route("/tmail/info", get(handlers::info_handler))
        .route(
            "/tmail/v1",
            post(handlers::ingest_handler::<O, G>).fallback(handlers::must_be_post),
        )
        .layer(DefaultBodyLimit::max(limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Bind the configured address and serve until Ctrl-C.
pub async fn run_server<O, G>(config: &HostConfig, ingestor: Ingestor<O, G>) -> std::io::Result<()>
where
    O: ExistenceOracle + 'static,
    G: StoreGateway + 'static,
{
    let state = AppState::new(ingestor, config.max_message_size);
    let router = create_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        %addr,
        max_message_size = config.max_message_size,
        "tmail-host listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
