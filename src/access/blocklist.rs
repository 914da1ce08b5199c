//! Glob blocklist matched against a path's base name and each of its suffix chains.

use std::path::Path;

use globset::{Glob, GlobBuilder, GlobMatcher};

use crate::access::AccessError;

/// Compiled blocked patterns, kept in configuration order.
#[derive(Debug, Clone, Default)]
pub struct BlockList {
    patterns: Vec<(String, GlobMatcher)>,
}

impl BlockList {
    /// Compiles every pattern. `*` and `?` stop at `/`; `**` crosses it.
    pub fn new<I, S>(patterns: I) -> Result<Self, AccessError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for raw in patterns {
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                continue;
            }
            let normalized = raw.replace('\\', "/");
            let glob: Glob = GlobBuilder::new(&normalized)
                .literal_separator(true)
                .build()
                .map_err(|e| AccessError::BadPattern {
                    pattern: raw.to_string(),
                    reason: e.kind().to_string(),
                })?;
            compiled.push((raw.to_string(), glob.compile_matcher()));
        }
        Ok(Self { patterns: compiled })
    }

    /// Returns the first pattern matching `path`, if any.
    ///
    /// For `/a/b/.env` the candidates are `.env`, `b/.env`, `a/b/.env` and `/a/b/.env`.
    pub fn matching_pattern(&self, path: &Path) -> Option<&str> {
        if self.patterns.is_empty() {
            return None;
        }

        let candidates = suffix_candidates(path);
        self.patterns
            .iter()
            .find(|(_, matcher)| candidates.iter().any(|c| matcher.is_match(c)))
            .map(|(raw, _)| raw.as_str())
    }

    pub fn is_blocked(&self, path: &Path) -> bool {
        self.matching_pattern(path).is_some()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(raw, _)| raw.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Base name first, then progressively longer suffixes, ending with the full path.
fn suffix_candidates(path: &Path) -> Vec<String> {
    let full = path.to_string_lossy().replace('\\', "/");
    let parts: Vec<&str> = full.split('/').collect();

    let mut candidates: Vec<String> = (0..parts.len())
        .rev()
        .map(|i| parts[i..].join("/"))
        .filter(|c| !c.is_empty())
        .collect();
    candidates.dedup();
    candidates
}
