//! Read-only tool handlers.

use std::collections::BTreeMap;
use std::fs;

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::analysis::{aggregate, analyze_source, folder_structure, outline_source, read_chunk, chunks_for};
use crate::error::{Result, ServerError};
use crate::fs::{list_files, list_regular_files, search_files, ListOptions, SearchOptions};
use crate::tools::{to_text, Args, ToolContext};

const DEFAULT_MAX_DEPTH: u64 = 5;
const MAX_CONTEXT_LINES: u64 = 100;

fn list_options(args: &Args) -> ListOptions {
    ListOptions::default()
        .recursive(args.bool_or("recursive", true))
        .file_types(args.strings("fileTypes"))
}

pub(super) fn list_allowed_directories(ctx: &ToolContext) -> Result<String> {
    let roots: Vec<String> = ctx
        .guard
        .roots()
        .iter()
        .map(|root| root.display().to_string())
        .collect();
    let instructions = if ctx.guard.is_unrestricted() {
        "No directory restrictions. All paths are accessible except those matching blocked patterns."
    } else {
        "File access is restricted to the listed directories. Paths matching blocked patterns are always denied."
    };

    to_text(&json!({
        "allowed_directories": roots,
        "blocked_patterns": ctx.guard.blocked_patterns(),
        "instructions": instructions,
    }))
}

pub(super) fn list_context_files(ctx: &ToolContext, args: &Args) -> Result<String> {
    let dir = ctx.resolve(args.required_str("path")?)?;
    let options = list_options(args).include_hidden(args.bool_or("includeHidden", false));

    let entries = list_files(&dir, &options, ctx.visible())?;
    info!(path = %dir.display(), entries = entries.len(), "directory listed");
    to_text(&entries)
}

// == Read Context ==
pub(super) fn read_context(ctx: &ToolContext, args: &Args) -> Result<String> {
    let path = ctx.resolve(args.required_str("path")?)?;
    let max_size = args.u64_or("maxSize", ctx.max_file_size);
    let meta = fs::metadata(&path).map_err(|e| ServerError::from_io(e, &path))?;

    if meta.is_dir() {
        let mut contents = BTreeMap::new();
        for file in list_regular_files(&path, &list_options(args), ctx.visible())? {
            match ctx.read_through_cache(&file, max_size) {
                Ok(content) => {
                    contents.insert(file.display().to_string(), content);
                }
                Err(e) => debug!(path = %file.display(), error = %e, "skipping unreadable file"),
            }
        }
        info!(path = %path.display(), files = contents.len(), "directory read");
        return to_text(&contents);
    }

    if meta.len() > max_size {
        let chunk_number = args.u64_or("chunkNumber", 0);
        let chunk = read_chunk(&path, chunk_number, ctx.chunk_size)?;
        info!(
            path = %path.display(),
            chunk = chunk.chunk_number,
            total = chunk.total_chunks,
            bytes = chunk.content.len(),
            "chunk read"
        );
        return to_text(&json!({
            "content": chunk.content,
            "chunkNumber": chunk.chunk_number,
            "totalChunks": chunk.total_chunks,
            "path": path.display().to_string(),
        }));
    }

    let content = ctx.read_through_cache(&path, max_size)?;
    info!(path = %path.display(), bytes = content.metadata.size, "file read");
    to_text(&content)
}

pub(super) fn search_context(ctx: &ToolContext, args: &Args) -> Result<String> {
    let pattern = args.required_str("pattern")?;
    let base = ctx.resolve(args.required_str("path")?)?;
    let defaults = SearchOptions::default();
    let options = SearchOptions {
        list: list_options(args),
        context_lines: args
            .u64_or("contextLines", defaults.context_lines as u64)
            .min(MAX_CONTEXT_LINES) as usize,
        max_results: args.u64_or("maxResults", defaults.max_results as u64) as usize,
    };

    let result = search_files(&base, pattern, &options, ctx.visible())?;
    info!(path = %base.display(), pattern, matches = result.total, "search");
    to_text(&result)
}

// == Analysis ==
pub(super) fn analyze_code(ctx: &ToolContext, args: &Args) -> Result<String> {
    let path = ctx.resolve(args.required_str("path")?)?;

    if !path.is_dir() {
        let content = ctx.read_through_cache(&path, ctx.max_file_size)?;
        return to_text(&analyze_source(&path, &content.content));
    }

    let mut analyses = Vec::new();
    for file in list_regular_files(&path, &list_options(args), ctx.visible())? {
        match ctx.read_through_cache(&file, ctx.max_file_size) {
            Ok(content) => analyses.push(analyze_source(&file, &content.content)),
            Err(e) => debug!(path = %file.display(), error = %e, "skipping file in analysis"),
        }
    }
    info!(path = %path.display(), files = analyses.len(), "directory analyzed");
    to_text(&aggregate(analyses))
}

pub(super) fn generate_outline(ctx: &ToolContext, args: &Args) -> Result<String> {
    let path = ctx.resolve(args.required_str("path")?)?;
    let content = ctx.read_through_cache(&path, ctx.max_file_size)?;
    to_text(&outline_source(&path, &content.content))
}

pub(super) fn cache_stats(ctx: &ToolContext, args: &Args) -> Result<String> {
    to_text(&ctx.cache.stats(args.bool_or("detailed", false)))
}

pub(super) fn get_chunk_count(ctx: &ToolContext, args: &Args) -> Result<String> {
    let path = ctx.resolve(args.required_str("path")?)?;
    let chunk_size = args.u64_or("chunkSize", ctx.chunk_size);
    if chunk_size == 0 {
        return Err(ServerError::InvalidArguments("chunkSize must be positive".to_string()));
    }

    let meta = fs::metadata(&path).map_err(|e| ServerError::from_io(e, &path))?;
    let total_size = if meta.is_dir() {
        let options = ListOptions::default().recursive(true);
        list_files(&path, &options, ctx.visible())?
            .iter()
            .filter(|entry| !entry.metadata.is_directory)
            .map(|entry| entry.metadata.size)
            .sum()
    } else {
        meta.len()
    };

    to_text(&json!({
        "path": path.display().to_string(),
        "chunkCount": chunks_for(total_size, chunk_size),
        "chunkSize": chunk_size,
    }))
}

/// Batch read. Each requested name maps to its content or an `{error}` object.
pub(super) fn get_files(ctx: &ToolContext, args: &Args) -> Result<String> {
    let list = args
        .array("filePathList")
        .ok_or_else(|| ServerError::InvalidArguments("filePathList must be an array".to_string()))?;

    let mut results: BTreeMap<String, Value> = BTreeMap::new();
    for item in list {
        let Some(name) = item.get("fileName").and_then(Value::as_str) else {
            continue;
        };
        let entry = ctx
            .resolve(name)
            .and_then(|path| ctx.read_through_cache(&path, ctx.max_file_size))
            .and_then(|content| Ok(serde_json::to_value(content)?));
        let value = match entry {
            Ok(value) => value,
            Err(e) => {
                debug!(file = name, error = %e, "batch read failed");
                json!({ "error": e.to_string() })
            }
        };
        results.insert(name.to_string(), value);
    }

    debug!(files = results.len(), "batch read");
    to_text(&results)
}

pub(super) fn get_folder_structure(ctx: &ToolContext, args: &Args) -> Result<String> {
    let dir = ctx.resolve(args.required_str("path")?)?;
    let max_depth = args.u64_or("maxDepth", DEFAULT_MAX_DEPTH) as usize;
    folder_structure(&dir, max_depth, ctx.visible())
}
