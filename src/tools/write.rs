//! Mutating tool handlers. Each one drops the cached content of every path it
//! touched once the filesystem change has succeeded.

use serde_json::json;
use tracing::debug;

use crate::error::Result;
use crate::fs;
use crate::tools::{to_text, Args, ToolContext};

pub(super) fn write_file(ctx: &ToolContext, args: &Args) -> Result<String> {
    let path = ctx.resolve(args.required_str("path")?)?;
    let content = args.required_str("content")?;

    let result = fs::write_file(&path, content)?;
    ctx.forget(&path);
    to_text(&result)
}

pub(super) fn create_directory(ctx: &ToolContext, args: &Args) -> Result<String> {
    let path = ctx.resolve(args.required_str("path")?)?;

    fs::create_directory(&path)?;
    to_text(&json!({
        "path": path.display().to_string(),
        "created": true,
    }))
}

pub(super) fn copy_file(ctx: &ToolContext, args: &Args) -> Result<String> {
    let source = ctx.resolve(args.required_str("source")?)?;
    let destination = ctx.resolve(args.required_str("destination")?)?;
    ctx.ensure_tree_unblocked(&source)?;

    let result = fs::copy_file(&source, &destination)?;
    ctx.forget_tree(&destination);
    to_text(&result)
}

pub(super) fn move_file(ctx: &ToolContext, args: &Args) -> Result<String> {
    let source = ctx.resolve(args.required_str("source")?)?;
    let destination = ctx.resolve(args.required_str("destination")?)?;
    ctx.ensure_tree_unblocked(&source)?;

    let result = fs::move_file(&source, &destination)?;
    ctx.forget_tree(&source);
    ctx.forget_tree(&destination);
    to_text(&result)
}

pub(super) fn delete_file(ctx: &ToolContext, args: &Args) -> Result<String> {
    let path = ctx.resolve(args.required_str("path")?)?;
    let recursive = args.bool_or("recursive", false);

    let result = fs::delete_file(&path, recursive)?;
    ctx.forget_tree(&path);
    to_text(&result)
}

pub(super) fn modify_file(ctx: &ToolContext, args: &Args) -> Result<String> {
    let path = ctx.resolve(args.required_str("path")?)?;
    let find = args.required_str("find")?;
    let replace = args.required_str("replace")?;
    let all = args.bool_or("all_occurrences", true);
    let use_regex = args.bool_or("regex", false);

    let result = fs::modify_file(&path, find, replace, all, use_regex)?;
    if result.modified {
        ctx.forget(&path);
    } else {
        debug!(path = %path.display(), "no changes made");
    }
    to_text(&result)
}
