//! Wire models for the JSON-RPC transports
//!
//! This module defines the JSON-RPC envelope, the MCP payloads carried in it,
//! and the few HTTP-only bodies.

pub mod health;
pub mod jsonrpc;
pub mod mcp;

// Re-export commonly used types
pub use health::HealthResponse;
pub use jsonrpc::{error_codes, Request, Response, RpcError};
pub use mcp::{
    CallToolParams, CallToolResult, ContentItem, InitializeResult, ListToolsResult, Tool,
    ToolAnnotations, PROTOCOL_VERSION,
};
