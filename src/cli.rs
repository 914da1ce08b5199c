//! Command-line interface. Every option can also come from its environment
//! variable; a flag wins over the environment, which wins over the default.

use std::path::PathBuf;

use clap::Parser;

use crate::cache::{DEFAULT_CACHE_SIZE, DEFAULT_CACHE_TTL_SECS};
use crate::logging::LogLevel;

/// MCP server giving clients cached, access-controlled filesystem tools.
///
/// Speaks newline-delimited JSON-RPC on stdin/stdout by default, or HTTP
/// with --http.
#[derive(Parser, Debug, Clone)]
#[command(name = "file_context_server")]
#[command(version)]
pub struct Cli {
    /// Comma-separated directories the server may access (default: unrestricted)
    #[arg(long = "root-dir", env = "MCP_ROOT_DIR", value_name = "DIRS")]
    pub root_dir: Option<String>,

    /// Comma-separated globs that are always denied (default: .aws/*,.env,.mcp_env)
    #[arg(long, env = "MCP_BLOCKED_PATTERNS", value_name = "GLOBS")]
    pub blocked_patterns: Option<String>,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long, env = "MCP_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long, env = "MCP_LOG_LEVEL", value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Serve HTTP instead of stdio
    #[arg(long)]
    pub http: bool,

    /// HTTP bind address
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// HTTP port
    #[arg(long, default_value_t = 3000)]
    pub port: u16,

    /// Maximum number of cached files
    #[arg(long, env = "MCP_CACHE_SIZE", default_value_t = DEFAULT_CACHE_SIZE)]
    pub cache_size: usize,

    /// Seconds a cached file stays servable
    #[arg(long, env = "MCP_CACHE_TTL", value_name = "SECONDS", default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_parse() {
        let cli = Cli::try_parse_from([
            "file_context_server",
            "--root-dir",
            "/a,/b",
            "--http",
            "--port",
            "8080",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.root_dir.as_deref(), Some("/a,/b"));
        assert!(cli.http);
        assert_eq!(cli.port, 8080);
        assert_eq!(cli.log_level, LogLevel::Debug);
    }
}
