//! Reading files and listing directories.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, ServerError};
use crate::fs::metadata::{file_metadata, FileMetadata};

/// Names skipped by every listing.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git",
    "node_modules",
    ".vscode",
    ".idea",
    "__pycache__",
    ".DS_Store",
    "*.pyc",
    ".env",
    "dist",
    "build",
    "coverage",
    ".next",
    ".nuxt",
    "vendor",
    ".cache",
];

static IGNORED: Lazy<GlobSet> = Lazy::new(|| {
    let mut builder = GlobSetBuilder::new();
    for pattern in DEFAULT_IGNORE_PATTERNS {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }
    builder.build().unwrap_or_else(|_| GlobSet::empty())
});

/// Returns true for names in the default ignore list.
pub fn is_ignored_name(name: &str) -> bool {
    IGNORED.is_match(name)
}

/// A text file read in full.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContent {
    pub content: String,
    pub metadata: FileMetadata,
    pub encoding: String,
    pub truncated: bool,
    pub total_lines: usize,
    pub path: String,
}

impl FileContent {
    pub fn new(path: &Path, content: String, metadata: FileMetadata) -> Self {
        let total_lines = count_lines(&content);
        Self {
            content,
            metadata,
            encoding: "utf-8".to_string(),
            truncated: false,
            total_lines,
            path: path.display().to_string(),
        }
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub path: String,
    pub name: String,
    pub metadata: FileMetadata,
}

/// Listing filters.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub recursive: bool,
    pub include_hidden: bool,
    /// Extensions without the dot, compared case-insensitively; empty keeps all
    pub file_types: Vec<String>,
}

impl ListOptions {
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    pub fn file_types(mut self, file_types: Vec<String>) -> Self {
        self.file_types = file_types;
        self
    }

    fn accepts_extension(&self, path: &Path) -> bool {
        if self.file_types.is_empty() {
            return true;
        }
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.file_types
            .iter()
            .any(|ft| ft.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

/// Line count, treating a final line without a newline as a line.
pub fn count_lines(content: &str) -> usize {
    let newlines = content.matches('\n').count();
    if !content.is_empty() && !content.ends_with('\n') {
        newlines + 1
    } else {
        newlines
    }
}

/// Reads a regular file as UTF-8, replacing invalid sequences.
///
/// Fails with `FileTooLarge` when `max_size` is non-zero and the file is bigger.
pub fn read_file(path: &Path, max_size: u64) -> Result<FileContent> {
    let metadata = file_metadata(path)?;
    if metadata.is_directory {
        return Err(ServerError::InvalidPath(format!(
            "{} is a directory",
            path.display()
        )));
    }
    if max_size > 0 && metadata.size > max_size {
        return Err(ServerError::FileTooLarge(format!(
            "{} is {} bytes, limit is {}",
            path.display(),
            metadata.size,
            max_size
        )));
    }

    let bytes = fs::read(path).map_err(|e| ServerError::from_io(e, path))?;
    let content = String::from_utf8_lossy(&bytes).into_owned();
    debug!(path = %path.display(), bytes = bytes.len(), "read file");
    Ok(FileContent::new(path, content, metadata))
}

/// Lists entries under `dir`, skipping ignored and (unless requested) hidden
/// names without descending into them. `keep` drops further paths, e.g. blocked ones.
///
/// Entries are returned in file-name order per directory.
pub fn list_files<F>(dir: &Path, options: &ListOptions, keep: F) -> Result<Vec<FileEntry>>
where
    F: Fn(&Path) -> bool,
{
    let metadata = file_metadata(dir)?;
    if !metadata.is_directory {
        return Err(ServerError::InvalidPath(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
    if !options.recursive {
        walker = walker.max_depth(1);
    }

    let include_hidden = options.include_hidden;
    let entries = walker
        .into_iter()
        .filter_entry(|entry| visible(entry, include_hidden))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir() || options.accepts_extension(entry.path()))
        .filter(|entry| keep(entry.path()))
        .filter_map(|entry| {
            let meta = entry.metadata().ok()?;
            Some(FileEntry {
                path: entry.path().display().to_string(),
                name: entry.file_name().to_string_lossy().into_owned(),
                metadata: FileMetadata::from_fs(entry.path(), &meta),
            })
        })
        .collect();

    Ok(entries)
}

/// Regular files under `dir` that pass the listing filters.
pub fn list_regular_files<F>(dir: &Path, options: &ListOptions, keep: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    Ok(list_files(dir, options, keep)?
        .into_iter()
        .filter(|entry| !entry.metadata.is_directory)
        .map(|entry| PathBuf::from(entry.path))
        .collect())
}

fn visible(entry: &DirEntry, include_hidden: bool) -> bool {
    // the walk root reaches the predicate too
    if entry.depth() == 0 {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    if !include_hidden && name.starts_with('.') {
        return false;
    }
    !is_ignored_name(&name)
}
