//! Path resolution helpers used by the access guard.

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::access::AccessError;

/// Resolves `.` and `..` without touching the filesystem.
///
/// `..` never climbs above the root of an absolute path.
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Makes `raw` absolute against the process working directory and normalizes it.
pub fn resolve_absolute(raw: &str) -> Result<PathBuf, AccessError> {
    if raw.trim().is_empty() {
        return Err(AccessError::invalid(raw, "path is empty"));
    }
    if raw.contains('\0') {
        return Err(AccessError::invalid(raw, "path contains a NUL byte"));
    }

    let path = Path::new(raw);
    if path.is_absolute() {
        return Ok(normalize_lexical(path));
    }

    let cwd = env::current_dir()
        .map_err(|e| AccessError::invalid(raw, format!("cannot determine working directory: {}", e)))?;
    Ok(normalize_lexical(&cwd.join(path)))
}

/// Segment-wise containment: true when `path` equals `root` or lies beneath it.
///
/// `/home/alice-other` is not within `/home/alice`.
pub fn is_within(root: &Path, path: &Path) -> bool {
    path.starts_with(root)
}
