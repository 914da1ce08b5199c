//! Tools Module
//!
//! The MCP tool catalogue and its handlers. Every path argument is checked by
//! the [`AccessGuard`] before any filesystem work, and every file read goes
//! through the [`ContentCache`].

mod args;
mod definitions;
mod read;
mod write;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::access::AccessGuard;
use crate::cache::ContentCache;
use crate::error::{Result, ServerError};
use crate::fs::{modified_time, read_file, FileContent, FileMetadata, DEFAULT_CHUNK_SIZE, MAX_FILE_SIZE};
use crate::models::{CallToolResult, Tool};

pub use args::Args;
pub use definitions::tool_definitions;

/// Shared state handed to every tool handler.
#[derive(Clone)]
pub struct ToolContext {
    pub cache: Arc<ContentCache>,
    pub guard: Arc<AccessGuard>,
    /// Default `maxSize` for reads
    pub max_file_size: u64,
    /// Chunk size used when a file exceeds `maxSize`
    pub chunk_size: u64,
}

impl ToolContext {
    pub fn new(cache: Arc<ContentCache>, guard: Arc<AccessGuard>) -> Self {
        Self {
            cache,
            guard,
            max_file_size: MAX_FILE_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Tool catalogue advertised by `tools/list`.
    pub fn tools(&self) -> Vec<Tool> {
        tool_definitions()
    }

    /// Runs a tool by name. Failures become `isError` results, never panics or
    /// protocol errors.
    pub fn call(&self, name: &str, arguments: &Map<String, Value>) -> CallToolResult {
        info!(tool = name, "tool call");
        let args = Args::new(arguments);

        let outcome = match name {
            "list_allowed_directories" => read::list_allowed_directories(self),
            "list_context_files" => read::list_context_files(self, &args),
            "read_context" => read::read_context(self, &args),
            "search_context" => read::search_context(self, &args),
            "analyze_code" => read::analyze_code(self, &args),
            "generate_outline" => read::generate_outline(self, &args),
            "cache_stats" => read::cache_stats(self, &args),
            "get_chunk_count" => read::get_chunk_count(self, &args),
            "get_files" => read::get_files(self, &args),
            "get_folder_structure" => read::get_folder_structure(self, &args),
            "write_file" => write::write_file(self, &args),
            "create_directory" => write::create_directory(self, &args),
            "copy_file" => write::copy_file(self, &args),
            "move_file" => write::move_file(self, &args),
            "delete_file" => write::delete_file(self, &args),
            "modify_file" => write::modify_file(self, &args),
            _ => {
                warn!(tool = name, "unknown tool");
                return CallToolResult::error(format!("Unknown tool: {}", name));
            }
        };

        match outcome {
            Ok(text) => CallToolResult::text(text),
            Err(e) => {
                warn!(tool = name, code = e.code(), error = %e, "tool failed");
                CallToolResult::error(e.to_string())
            }
        }
    }

    /// Validates a raw path argument against the access guard.
    pub(crate) fn resolve(&self, raw: &str) -> Result<std::path::PathBuf> {
        Ok(self.guard.validate(raw)?)
    }

    /// Listing filter: drops anything the blocklist matches.
    pub(crate) fn visible(&self) -> impl Fn(&Path) -> bool + '_ {
        move |path| !self.guard.is_blocked(path)
    }

    /// Reads a file through the cache.
    ///
    /// The file is stat'ed first so an entry older than the file on disk is
    /// dropped before the lookup; a miss reads the file and caches it.
    pub(crate) fn read_through_cache(&self, path: &Path, max_size: u64) -> Result<FileContent> {
        let meta = fs::metadata(path).map_err(|e| ServerError::from_io(e, path))?;
        if meta.is_dir() {
            return Err(ServerError::InvalidPath(format!(
                "{} is a directory",
                path.display()
            )));
        }

        if max_size > 0 && meta.len() > max_size {
            return Err(ServerError::FileTooLarge(format!(
                "{} is {} bytes, limit is {}",
                path.display(),
                meta.len(),
                max_size
            )));
        }

        let key = path.to_string_lossy();
        let modified = modified_time(&meta);
        if self.cache.invalidate_stale(&key, modified) {
            debug!(path = %key, "cache entry stale");
        }

        if let Some(entry) = self.cache.get(&key) {
            debug!(path = %key, bytes = entry.size, "cache hit");
            return Ok(FileContent::new(
                path,
                entry.content.to_string(),
                FileMetadata::from_fs(path, &meta),
            ));
        }
        debug!(path = %key, "cache miss");

        let content = read_file(path, max_size)?;
        let size = content.content.len() as u64;
        self.cache.set(&key, content.content.as_str(), size, modified);
        debug!(path = %key, bytes = size, "cache set");
        Ok(content)
    }

    /// Fails if anything below `source` is blocked. Copies land under new
    /// names the blocklist may no longer match.
    pub(crate) fn ensure_tree_unblocked(&self, source: &Path) -> Result<()> {
        for entry in WalkDir::new(source).min_depth(1) {
            let entry =
                entry.map_err(|e| ServerError::Io(format!("{} ({})", e, source.display())))?;
            self.guard.validate_path(entry.path())?;
        }
        Ok(())
    }

    /// Drops cached content for a path touched by a mutating tool.
    pub(crate) fn forget(&self, path: &Path) {
        let key = path.to_string_lossy();
        if self.cache.remove(&key) {
            debug!(path = %key, "cache entry removed");
        }
    }

    /// Drops every cached entry at or below `dir`.
    pub(crate) fn forget_tree(&self, dir: &Path) {
        let removed = self.cache.remove_tree(dir);
        if removed > 0 {
            debug!(path = %dir.display(), removed, "cache entries removed");
        }
    }
}

/// Pretty JSON text for a tool result.
pub(crate) fn to_text<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn context(guard: AccessGuard) -> ToolContext {
        ToolContext::new(
            Arc::new(ContentCache::new(10, Duration::from_secs(300))),
            Arc::new(guard),
        )
    }

    #[test]
    fn test_read_through_cache_populates_then_hits() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "hello").unwrap();
        let ctx = context(AccessGuard::unrestricted());

        let first = ctx.read_through_cache(&file, MAX_FILE_SIZE).unwrap();
        assert_eq!(first.content, "hello");
        let second = ctx.read_through_cache(&file, MAX_FILE_SIZE).unwrap();
        assert_eq!(second.content, "hello");

        let stats = ctx.cache.stats(false);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.size, 1);
    }

    #[test]
    fn test_cached_file_still_respects_max_size() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "0123456789").unwrap();
        let ctx = context(AccessGuard::unrestricted());

        ctx.read_through_cache(&file, MAX_FILE_SIZE).unwrap();
        let err = ctx.read_through_cache(&file, 5).unwrap_err();
        assert_eq!(err.code(), "FILE_TOO_LARGE");
    }

    #[test]
    fn test_cached_size_is_content_length() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("latin1.txt");
        fs::write(&file, [b'a', 0xff]).unwrap();
        let ctx = context(AccessGuard::unrestricted());

        let content = ctx.read_through_cache(&file, MAX_FILE_SIZE).unwrap();
        assert_eq!(content.content, "a\u{fffd}");
        let entry = ctx.cache.get(&file.to_string_lossy()).unwrap();
        assert_eq!(entry.size, content.content.len() as u64);
        assert_eq!(entry.size, 4);
    }

    #[test]
    fn test_forget_drops_entry() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "hello").unwrap();
        let ctx = context(AccessGuard::unrestricted());

        ctx.read_through_cache(&file, MAX_FILE_SIZE).unwrap();
        ctx.forget(&file);
        assert!(ctx.cache.is_empty());
    }

    #[test]
    fn test_forget_tree_only_touches_descendants() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("in.txt"), "x").unwrap();
        fs::write(dir.path().join("out.txt"), "y").unwrap();
        let ctx = context(AccessGuard::unrestricted());

        ctx.read_through_cache(&sub.join("in.txt"), MAX_FILE_SIZE).unwrap();
        ctx.read_through_cache(&dir.path().join("out.txt"), MAX_FILE_SIZE).unwrap();
        ctx.forget_tree(&sub);

        assert_eq!(ctx.cache.len(), 1);
    }

    #[test]
    fn test_unknown_tool_is_error_result() {
        let ctx = context(AccessGuard::unrestricted());
        let result = ctx.call("does_not_exist", &Map::new());
        assert!(result.is_error);
        assert_eq!(result.joined_text(), "Unknown tool: does_not_exist");
    }

    #[test]
    fn test_blocked_path_is_error_result() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".env"), "SECRET=1").unwrap();
        let guard = AccessGuard::new(Vec::<std::path::PathBuf>::new(), [".env"]).unwrap();
        let ctx = context(guard);

        let mut args = Map::new();
        args.insert(
            "path".to_string(),
            Value::String(dir.path().join(".env").display().to_string()),
        );
        let result = ctx.call("read_context", &args);
        assert!(result.is_error);
        assert!(result.joined_text().contains("access denied"));
        assert!(!result.joined_text().contains("SECRET"));
    }
}
