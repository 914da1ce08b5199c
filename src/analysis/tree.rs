//! Text tree rendering of a directory.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{Result, ServerError};
use crate::fs::is_ignored_name;

/// Renders `dir` as a box-drawing tree. Hidden and ignored names are left out,
/// as is anything `keep` rejects.
///
/// `max_depth` of 0 means unlimited.
pub fn folder_structure<F>(dir: &Path, max_depth: usize, keep: F) -> Result<String>
where
    F: Fn(&Path) -> bool,
{
    if !dir.is_dir() {
        return Err(ServerError::InvalidPath(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut out = String::new();
    render(dir, "", 0, max_depth, &keep, &mut out)?;
    Ok(out)
}

fn render<F>(dir: &Path, prefix: &str, depth: usize, max_depth: usize, keep: &F, out: &mut String) -> Result<()>
where
    F: Fn(&Path) -> bool,
{
    if max_depth > 0 && depth >= max_depth {
        return Ok(());
    }

    let mut entries: Vec<_> = fs::read_dir(dir)
        .map_err(|e| ServerError::from_io(e, dir))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            !name.starts_with('.') && !is_ignored_name(&name) && keep(&entry.path())
        })
        .collect();
    entries.sort_by_key(|entry| entry.file_name());

    let count = entries.len();
    for (i, entry) in entries.into_iter().enumerate() {
        let last = i + 1 == count;
        let connector = if last { "└── " } else { "├── " };
        let _ = writeln!(out, "{}{}{}", prefix, connector, entry.file_name().to_string_lossy());

        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
            // unreadable subdirectories are shown but not expanded
            let _ = render(&entry.path(), &child_prefix, depth + 1, max_depth, keep, out);
        }
    }
    Ok(())
}
