//! Mutating filesystem operations.

use std::fs;
use std::io;
use std::path::Path;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Result, ServerError};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WriteResult {
    pub path: String,
    pub bytes_written: u64,
    /// false when an existing file was overwritten
    pub created: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CopyResult {
    pub source: String,
    pub destination: String,
    pub bytes_copied: u64,
    pub is_directory: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MoveResult {
    pub source: String,
    pub destination: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub path: String,
    pub is_directory: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModifyResult {
    pub path: String,
    pub replacements: usize,
    pub modified: bool,
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> ServerError + '_ {
    move |e| ServerError::from_io(e, path)
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(io_err(parent))
        }
        _ => Ok(()),
    }
}

// == Write ==
/// Creates or overwrites a file, creating missing parent directories.
pub fn write_file(path: &Path, content: &str) -> Result<WriteResult> {
    if path.is_dir() {
        return Err(ServerError::InvalidPath(format!("{} is a directory", path.display())));
    }
    let created = !path.exists();
    ensure_parent(path)?;
    fs::write(path, content).map_err(io_err(path))?;

    info!(path = %path.display(), bytes = content.len(), created, "wrote file");
    Ok(WriteResult {
        path: path.display().to_string(),
        bytes_written: content.len() as u64,
        created,
    })
}

// == Create Directory ==
/// `mkdir -p`. An existing directory is fine; an existing file is an error.
pub fn create_directory(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => {
            return Err(ServerError::AlreadyExists(format!(
                "{} exists and is not a directory",
                path.display()
            )))
        }
        Err(_) => {}
    }
    fs::create_dir_all(path).map_err(io_err(path))?;
    info!(path = %path.display(), "created directory");
    Ok(())
}

// == Copy ==
/// Copies a file, or a directory tree recursively.
pub fn copy_file(source: &Path, destination: &Path) -> Result<CopyResult> {
    let meta = fs::metadata(source).map_err(io_err(source))?;
    let bytes_copied = if meta.is_dir() {
        copy_tree(source, destination)?
    } else {
        copy_single(source, destination)?
    };

    info!(
        source = %source.display(),
        destination = %destination.display(),
        bytes = bytes_copied,
        "copied"
    );
    Ok(CopyResult {
        source: source.display().to_string(),
        destination: destination.display().to_string(),
        bytes_copied,
        is_directory: meta.is_dir(),
    })
}

fn copy_single(source: &Path, destination: &Path) -> Result<u64> {
    ensure_parent(destination)?;
    // fs::copy carries permissions across
    fs::copy(source, destination).map_err(io_err(destination))
}

fn copy_tree(source: &Path, destination: &Path) -> Result<u64> {
    if destination.starts_with(source) {
        return Err(ServerError::InvalidPath(format!(
            "cannot copy {} into itself",
            source.display()
        )));
    }

    let mut total = 0;
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| ServerError::Io(format!("{} ({})", e, source.display())))?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        let target = destination.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(io_err(&target))?;
        } else {
            total += copy_single(entry.path(), &target)?;
        }
    }
    Ok(total)
}

// == Move ==
/// Renames, falling back to copy and delete when the rename fails (e.g. across devices).
pub fn move_file(source: &Path, destination: &Path) -> Result<MoveResult> {
    let meta = fs::metadata(source).map_err(io_err(source))?;
    ensure_parent(destination)?;

    if let Err(err) = fs::rename(source, destination) {
        debug!(error = %err, "rename failed, falling back to copy");
        if meta.is_dir() {
            copy_tree(source, destination)?;
            fs::remove_dir_all(source).map_err(io_err(source))?;
        } else {
            copy_single(source, destination)?;
            fs::remove_file(source).map_err(io_err(source))?;
        }
    }

    info!(source = %source.display(), destination = %destination.display(), "moved");
    Ok(MoveResult {
        source: source.display().to_string(),
        destination: destination.display().to_string(),
    })
}

// == Delete ==
/// Deletes a file or directory. A non-empty directory needs `recursive`.
pub fn delete_file(path: &Path, recursive: bool) -> Result<DeleteResult> {
    let meta = fs::symlink_metadata(path).map_err(io_err(path))?;
    let is_directory = meta.is_dir();

    if is_directory {
        if recursive {
            fs::remove_dir_all(path).map_err(io_err(path))?;
        } else {
            let has_entries = fs::read_dir(path)
                .map_err(io_err(path))?
                .next()
                .is_some();
            if has_entries {
                return Err(ServerError::NotEmpty(format!(
                    "{} is not empty; pass recursive=true to delete it",
                    path.display()
                )));
            }
            fs::remove_dir(path).map_err(io_err(path))?;
        }
    } else {
        fs::remove_file(path).map_err(io_err(path))?;
    }

    info!(path = %path.display(), is_directory, "deleted");
    Ok(DeleteResult {
        path: path.display().to_string(),
        is_directory,
    })
}

// == Modify ==
/// Find and replace within a file. The file is rewritten only when the text changes.
///
/// Regex replacements expand `$1`-style group references.
pub fn modify_file(
    path: &Path,
    find: &str,
    replace: &str,
    all_occurrences: bool,
    use_regex: bool,
) -> Result<ModifyResult> {
    if find.is_empty() {
        return Err(ServerError::InvalidArguments("find must not be empty".to_string()));
    }

    let original = fs::read_to_string(path).map_err(io_err(path))?;
    let (updated, replacements) = if use_regex {
        let re = Regex::new(find)?;
        let found = re.find_iter(&original).count();
        if all_occurrences {
            (re.replace_all(&original, replace).into_owned(), found)
        } else {
            (re.replacen(&original, 1, replace).into_owned(), found.min(1))
        }
    } else {
        let found = original.matches(find).count();
        if all_occurrences {
            (original.replace(find, replace), found)
        } else {
            (original.replacen(find, replace, 1), found.min(1))
        }
    };

    let modified = updated != original;
    if modified {
        fs::write(path, &updated).map_err(io_err(path))?;
        info!(path = %path.display(), replacements, "modified file");
    }

    Ok(ModifyResult {
        path: path.display().to_string(),
        replacements,
        modified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_then_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/new.txt");

        let first = write_file(&path, "hello").unwrap();
        assert!(first.created);
        assert_eq!(first.bytes_written, 5);

        let second = write_file(&path, "bye").unwrap();
        assert!(!second.created);
        assert_eq!(fs::read_to_string(&path).unwrap(), "bye");
    }

    #[test]
    fn test_write_to_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(write_file(dir.path(), "x").unwrap_err().code(), "INVALID_PATH");
    }

    #[test]
    fn test_create_directory_idempotent_and_file_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("x/y/z");
        create_directory(&nested).unwrap();
        create_directory(&nested).unwrap();
        assert!(nested.is_dir());

        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert_eq!(create_directory(&file).unwrap_err().code(), "ALREADY_EXISTS");
    }

    #[test]
    fn test_copy_file_and_tree() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("inner")).unwrap();
        fs::write(src.join("a.txt"), "aaa").unwrap();
        fs::write(src.join("inner/b.txt"), "bb").unwrap();

        let single = copy_file(&src.join("a.txt"), &dir.path().join("out/a.txt")).unwrap();
        assert_eq!(single.bytes_copied, 3);
        assert!(!single.is_directory);

        let tree = copy_file(&src, &dir.path().join("copy")).unwrap();
        assert!(tree.is_directory);
        assert_eq!(tree.bytes_copied, 5);
        assert_eq!(
            fs::read_to_string(dir.path().join("copy/inner/b.txt")).unwrap(),
            "bb"
        );
    }

    #[test]
    fn test_copy_into_itself_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        let err = copy_file(&src, &src.join("nested")).unwrap_err();
        assert_eq!(err.code(), "INVALID_PATH");
    }

    #[test]
    fn test_copy_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_file(&dir.path().join("nope"), &dir.path().join("dst")).unwrap_err();
        assert_eq!(err.code(), "FILE_NOT_FOUND");
    }

    #[test]
    fn test_move_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("from.txt");
        let dst = dir.path().join("to/dest.txt");
        fs::write(&src, "payload").unwrap();

        move_file(&src, &dst).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "payload");
    }

    #[test]
    fn test_delete_requires_recursive_for_non_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("d");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("f"), "x").unwrap();

        assert_eq!(delete_file(&target, false).unwrap_err().code(), "NOT_EMPTY");
        let result = delete_file(&target, true).unwrap();
        assert!(result.is_directory);
        assert!(!target.exists());
    }

    #[test]
    fn test_delete_empty_dir_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty");
        fs::create_dir(&empty).unwrap();
        delete_file(&empty, false).unwrap();

        let file = dir.path().join("f.txt");
        fs::write(&file, "x").unwrap();
        assert!(!delete_file(&file, false).unwrap().is_directory);
        assert_eq!(delete_file(&file, false).unwrap_err().code(), "FILE_NOT_FOUND");
    }

    #[test]
    fn test_modify_literal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.txt");
        fs::write(&path, "foo bar foo").unwrap();

        let once = modify_file(&path, "foo", "baz", false, false).unwrap();
        assert_eq!(once.replacements, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "baz bar foo");

        let all = modify_file(&path, "o", "0", true, false).unwrap();
        assert_eq!(all.replacements, 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "baz bar f00");
    }

    #[test]
    fn test_modify_regex_with_groups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.txt");
        fs::write(&path, "v1 v2 v3").unwrap();

        let result = modify_file(&path, r"v(\d)", "version-$1", true, true).unwrap();
        assert_eq!(result.replacements, 3);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "version-1 version-2 version-3"
        );
    }

    #[test]
    fn test_modify_without_match_leaves_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("n.txt");
        fs::write(&path, "abc").unwrap();

        let result = modify_file(&path, "zzz", "y", true, false).unwrap();
        assert_eq!(result.replacements, 0);
        assert!(!result.modified);
    }
}
