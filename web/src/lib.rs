//! HTTP surface of the inkdrop watch server: the snapshot listing endpoint,
//! the SSE subscription endpoint, and the static `/files` mount.

use axum::http::HeaderValue;
use log::*;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub(crate) mod controller;
mod error;
pub mod router;
pub mod sse;

pub use error::{Error, Result};
pub use service::AppState;

/// Bind the configured interface/port and serve the router until shutdown.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let host = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = app_state.config.port;
    let listen_addr = format!("{host}:{port}");

    let origins: Vec<HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();
    let cors = CorsLayer::new().allow_origin(AllowOrigin::list(origins));

    info!("Local file server running at http://{listen_addr}");

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(
        listener,
        router::define_routes(app_state).layer(cors),
    )
    .await
}
