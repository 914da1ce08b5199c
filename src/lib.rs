//! File Context Server - MCP filesystem tools over JSON-RPC
//!
//! Exposes read, search, analysis and write tools for a set of allowed
//! directories. File contents are served from an LRU+TTL cache and every
//! path goes through the access guard before it touches the filesystem.

pub mod access;
pub mod analysis;
pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod logging;
pub mod models;
pub mod server;
pub mod tools;

pub use access::AccessGuard;
pub use api::{create_router, AppState};
pub use cache::ContentCache;
pub use cli::Cli;
pub use config::Config;
pub use server::McpServer;
pub use tools::ToolContext;
