//! API Handlers
//!
//! HTTP request handlers for the JSON-RPC endpoint and the health check.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::models::{self, HealthResponse, RpcError};
use crate::server::McpServer;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Dispatcher shared with every request
    pub server: Arc<McpServer>,
}

impl AppState {
    pub fn new(server: McpServer) -> Self {
        Self {
            server: Arc::new(server),
        }
    }
}

/// Handler for POST /mcp (and POST /)
///
/// Takes one JSON-RPC message as the body. Requests get the JSON-RPC response
/// with 200; notifications get 202 and an empty body.
pub async fn rpc_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let reply = match serde_json::from_slice::<Value>(&body) {
        Ok(value) => state.server.handle_value(value).await,
        Err(e) => {
            debug!(error = %e, "unparseable request body");
            Some(models::Response::error(
                Value::Null,
                RpcError::parse_error(e.to_string()),
            ))
        }
    };

    match reply {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
