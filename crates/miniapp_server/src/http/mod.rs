//! Web API and embedded browser client.
//!
//! Endpoints:
//! - GET  /                    - API banner
//! - GET  /health              - Health check
//! - POST /api/new-game        - Create a game
//! - GET  /api/game/{game_id}  - Fetch a game
//! - POST /api/move            - Make a move
//! - GET  /game                - Browser client

mod error;
mod handlers;
mod types;

pub use error::ApiError;
pub use types::{ErrorResponse, GameResponse, HealthResponse, MessageResponse, MoveRequest};

use axum::Router;
use axum::routing::{get, post};
use miniapp_tictactoe::Engine;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Game engine owning the in-memory game table.
    pub engine: Engine,
}

/// Builds the application router.
pub fn create_app(state: Arc<AppState>) -> Router {
    // The Mini App page may be served from a different origin than the API.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/new-game", post(handlers::new_game))
        .route("/api/game/{game_id}", get(handlers::get_game))
        .route("/api/move", post(handlers::make_move))
        .route("/game", get(handlers::game_page))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "HTTP server listening");
        info!("Browser client at http://{}/game", addr);
    }
    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("HTTP server stopped");
    Ok(())
}
