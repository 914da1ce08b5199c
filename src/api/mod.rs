//! API Module
//!
//! HTTP transport for the MCP server.
//!
//! # Endpoints
//! - `POST /mcp` - JSON-RPC request or notification
//! - `POST /` - Alias of `/mcp`
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
