//! Regex search over file contents with surrounding context lines.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Serialize;

use crate::error::Result;
use crate::fs::read::{list_regular_files, ListOptions};

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct SearchContext {
    pub before: Vec<String>,
    pub after: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchMatch {
    pub path: String,
    /// 1-based line number
    pub line: usize,
    pub content: String,
    pub context: SearchContext,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub matches: Vec<SearchMatch>,
    pub total: usize,
}

/// Search parameters. `max_results` of 0 means unlimited.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub list: ListOptions,
    pub context_lines: usize,
    pub max_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            list: ListOptions::default().recursive(true),
            context_lines: 2,
            max_results: 100,
        }
    }
}

/// Searches every listed file under `base` (or `base` itself when it is a file)
/// line by line. Unreadable files are skipped.
pub fn search_files<F>(
    base: &Path,
    pattern: &str,
    options: &SearchOptions,
    keep: F,
) -> Result<SearchResult>
where
    F: Fn(&Path) -> bool,
{
    let re = Regex::new(pattern)?;

    let files = if base.is_file() {
        vec![base.to_path_buf()]
    } else {
        list_regular_files(base, &options.list, keep)?
    };

    let mut matches = Vec::new();
    for file in files {
        let Ok(bytes) = fs::read(&file) else {
            continue;
        };
        let text = String::from_utf8_lossy(&bytes);
        matches.extend(search_text(&file, &text, &re, options.context_lines));

        if options.max_results > 0 && matches.len() >= options.max_results {
            matches.truncate(options.max_results);
            break;
        }
    }

    let total = matches.len();
    Ok(SearchResult { matches, total })
}

/// Matches within one file's text.
pub fn search_text(path: &Path, text: &str, re: &Regex, context_lines: usize) -> Vec<SearchMatch> {
    let lines: Vec<&str> = text.lines().collect();
    let shown = path.display().to_string();

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| re.is_match(line))
        .map(|(i, line)| {
            let start = i.saturating_sub(context_lines);
            let end = i.saturating_add(context_lines).saturating_add(1).min(lines.len());
            SearchMatch {
                path: shown.clone(),
                line: i + 1,
                content: (*line).to_string(),
                context: SearchContext {
                    before: lines[start..i].iter().map(|s| s.to_string()).collect(),
                    after: lines[i + 1..end].iter().map(|s| s.to_string()).collect(),
                },
            }
        })
        .collect()
}
