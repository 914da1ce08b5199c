//! Configuration Module
//!
//! Turns parsed command-line options into validated server configuration.

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::access::resolve_absolute;
use crate::cache::{DEFAULT_CACHE_SIZE, DEFAULT_CACHE_TTL_SECS};
use crate::cli::Cli;
use crate::logging::LogLevel;

/// Patterns blocked when none are configured.
pub const DEFAULT_BLOCKED_PATTERNS: &[&str] = &[".aws/*", ".env", ".mcp_env"];

const BLOCKED_PATTERNS_ENV: &str = "MCP_BLOCKED_PATTERNS";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("root directory {0} does not exist")]
    RootNotFound(PathBuf),

    #[error("root {0} is not a directory")]
    RootNotDirectory(PathBuf),

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Server configuration parameters, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Allowed roots, absolute; empty means unrestricted
    pub roots: Vec<PathBuf>,
    /// Globs that are always denied
    pub blocked_patterns: Vec<String>,
    /// Cache capacity in entries
    pub cache_size: usize,
    /// Cache entry lifetime
    pub cache_ttl: Duration,
    pub log_level: LogLevel,
    pub log_dir: Option<PathBuf>,
    /// Serve HTTP instead of stdio
    pub http: bool,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Validates CLI options. Roots must exist and be directories.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let mut roots = Vec::new();
        for raw in split_list(cli.root_dir.as_deref().unwrap_or("")) {
            let root = resolve_root(&raw)?;
            if !roots.contains(&root) {
                roots.push(root);
            }
        }

        let blocked_patterns = match cli.blocked_patterns.as_deref() {
            Some(list) => split_list(list),
            // clap reports an empty environment value as unset
            None if env::var_os(BLOCKED_PATTERNS_ENV).is_some_and(|v| v.is_empty()) => Vec::new(),
            None => DEFAULT_BLOCKED_PATTERNS.iter().map(|p| p.to_string()).collect(),
        };

        if cli.cache_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "cache-size",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            roots,
            blocked_patterns,
            cache_size: cli.cache_size,
            cache_ttl: Duration::from_secs(cli.cache_ttl),
            log_level: cli.log_level,
            log_dir: cli.log_dir.map(|dir| expand_tilde(&dir.to_string_lossy())),
            http: cli.http,
            host: cli.host,
            port: cli.port,
        })
    }

    /// HTTP bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                name: "host",
                reason: e.to_string(),
            })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            blocked_patterns: DEFAULT_BLOCKED_PATTERNS.iter().map(|p| p.to_string()).collect(),
            cache_size: DEFAULT_CACHE_SIZE,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            log_level: LogLevel::Info,
            log_dir: None,
            http: false,
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Splits a comma-separated list, trimming items and dropping empty ones.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Expands a leading `~` to the current user's home directory.
pub fn expand_tilde(raw: &str) -> PathBuf {
    let home = || directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    if raw == "~" {
        if let Some(home) = home() {
            return home;
        }
    } else if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = home() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

fn resolve_root(raw: &str) -> Result<PathBuf, ConfigError> {
    let expanded = expand_tilde(raw);
    let root = resolve_absolute(&expanded.to_string_lossy()).map_err(|e| ConfigError::InvalidValue {
        name: "root-dir",
        reason: e.to_string(),
    })?;
    check_directory(&root)?;
    Ok(root)
}

fn check_directory(path: &Path) -> Result<(), ConfigError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ConfigError::RootNotDirectory(path.to_path_buf())),
        Err(_) => Err(ConfigError::RootNotFound(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["file_context_server"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.roots.is_empty());
        assert_eq!(config.blocked_patterns, vec![".aws/*", ".env", ".mcp_env"]);
        assert_eq!(config.cache_size, 500);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_split_list_trims_and_drops_empty() {
        assert_eq!(split_list(" a, ,b ,"), vec!["a", "b"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_roots_are_validated_and_deduplicated() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().display().to_string();
        let list = format!("{},{}/", root, root);

        let config = Config::from_cli(cli(&["--root-dir", &list])).unwrap();
        assert_eq!(config.roots, vec![dir.path().to_path_buf()]);
    }

    #[test]
    fn test_missing_root_rejected() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope").display().to_string();

        let err = Config::from_cli(cli(&["--root-dir", &missing])).unwrap_err();
        assert!(matches!(err, ConfigError::RootNotFound(_)));
    }

    #[test]
    fn test_file_root_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("f.txt");
        fs::write(&file, "").unwrap();

        let err = Config::from_cli(cli(&["--root-dir", &file.display().to_string()])).unwrap_err();
        assert!(matches!(err, ConfigError::RootNotDirectory(_)));
    }

    #[test]
    fn test_empty_blocked_patterns_disable_blocking() {
        let config = Config::from_cli(cli(&["--blocked-patterns", ""])).unwrap();
        assert!(config.blocked_patterns.is_empty());
    }

    #[test]
    fn test_zero_cache_size_rejected() {
        let err = Config::from_cli(cli(&["--cache-size", "0"])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "cache-size", .. }));
    }

    #[test]
    fn test_tilde_expansion() {
        let expanded = expand_tilde("~/projects");
        if let Some(dirs) = directories::BaseDirs::new() {
            assert_eq!(expanded, dirs.home_dir().join("projects"));
        }
        assert_eq!(expand_tilde("/abs/~x"), PathBuf::from("/abs/~x"));
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::default();
        assert_eq!(config.socket_addr().unwrap().port(), 3000);

        let bad = Config {
            host: "not a host".to_string(),
            ..Config::default()
        };
        assert!(bad.socket_addr().is_err());
    }
}
