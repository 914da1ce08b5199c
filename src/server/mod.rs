//! Server Module
//!
//! The MCP JSON-RPC dispatcher and the stdio transport. The HTTP transport
//! lives in [`crate::api`] and shares the same dispatcher.

mod dispatcher;
mod stdio;

pub use dispatcher::McpServer;
pub use stdio::{serve_lines, serve_stdio};
