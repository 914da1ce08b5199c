//! File metadata and MIME type lookup.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Result, ServerError};

/// Metadata reported alongside listings and reads.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub size: u64,
    pub mime_type: String,
    pub modified_time: DateTime<Utc>,
    pub created_time: DateTime<Utc>,
    pub is_directory: bool,
}

impl FileMetadata {
    pub fn from_fs(path: &Path, meta: &fs::Metadata) -> Self {
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        let created = meta.created().unwrap_or(modified);
        Self {
            size: meta.len(),
            mime_type: mime_type(path),
            modified_time: modified.into(),
            created_time: created.into(),
            is_directory: meta.is_dir(),
        }
    }
}

/// Stats `path`, following symlinks.
pub fn file_metadata(path: &Path) -> Result<FileMetadata> {
    let meta = fs::metadata(path).map_err(|e| ServerError::from_io(e, path))?;
    Ok(FileMetadata::from_fs(path, &meta))
}

/// Modification time used for cache staleness checks.
pub fn modified_time(meta: &fs::Metadata) -> SystemTime {
    meta.modified().unwrap_or(SystemTime::UNIX_EPOCH)
}

/// MIME type by extension.
///
/// Source extensions are mapped to text types first, since registry lookups
/// return unrelated types for some of them (`.ts` as MPEG transport stream).
pub fn mime_type(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let source = match ext.as_str() {
        "ts" => Some("text/typescript"),
        "tsx" => Some("text/tsx"),
        "jsx" => Some("text/jsx"),
        "go" => Some("text/x-go"),
        "rs" => Some("text/x-rust"),
        "py" => Some("text/x-python"),
        "rb" => Some("text/x-ruby"),
        "java" => Some("text/x-java"),
        "md" => Some("text/markdown"),
        "yaml" | "yml" => Some("text/yaml"),
        "toml" => Some("text/toml"),
        "json" => Some("application/json"),
        _ => None,
    };

    match source {
        Some(mime) => mime.to_string(),
        None => mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_extensions_override_registry() {
        assert_eq!(mime_type(Path::new("app.ts")), "text/typescript");
        assert_eq!(mime_type(Path::new("main.RS")), "text/x-rust");
        assert_eq!(mime_type(Path::new("ci.yml")), "text/yaml");
    }

    #[test]
    fn test_registry_fallback() {
        assert_eq!(mime_type(Path::new("index.html")), "text/html");
        assert_eq!(mime_type(Path::new("logo.png")), "image/png");
    }

    #[test]
    fn test_unknown_extension_is_octet_stream() {
        assert_eq!(mime_type(Path::new("blob.zzzunknown")), "application/octet-stream");
        assert_eq!(mime_type(Path::new("Makefile")), "application/octet-stream");
    }

    #[test]
    fn test_file_metadata_missing_path() {
        let err = file_metadata(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert_eq!(err.code(), "FILE_NOT_FOUND");
    }

    #[test]
    fn test_file_metadata_reports_directory() {
        let dir = tempfile::tempdir().unwrap();
        let meta = file_metadata(dir.path()).unwrap();
        assert!(meta.is_directory);
    }
}
