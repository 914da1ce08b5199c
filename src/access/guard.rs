//! The access guard composed from the blocklist and allowed roots.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::access::{is_within, normalize_lexical, resolve_absolute, AccessError, BlockList};

// == Access Guard ==
/// Read-only access policy built once at startup and shared by reference.
#[derive(Debug, Clone, Default)]
pub struct AccessGuard {
    roots: Vec<PathBuf>,
    blocklist: BlockList,
}

impl AccessGuard {
    // == Constructor ==
    /// Builds a guard. An empty `roots` list leaves the filesystem unrestricted
    /// apart from the blocklist.
    ///
    /// Roots are normalized but not checked for existence.
    pub fn new<R, P, S>(roots: R, patterns: P) -> Result<Self, AccessError>
    where
        R: IntoIterator<Item = PathBuf>,
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = Vec::new();
        for root in roots {
            let abs = resolve_absolute(&root.to_string_lossy())?;
            if !normalized.contains(&abs) {
                normalized.push(abs);
            }
        }

        Ok(Self {
            roots: normalized,
            blocklist: BlockList::new(patterns)?,
        })
    }

    /// A guard with no roots and no blocked patterns.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    // == Validate ==
    /// Resolves `raw` and checks it against the policy.
    ///
    /// The blocklist runs first and a match is final, even under an allowed root.
    pub fn validate(&self, raw: &str) -> Result<PathBuf, AccessError> {
        let path = resolve_absolute(raw)?;
        self.check(path)
    }

    /// Same checks as [`validate`](Self::validate) for an already resolved path.
    pub fn validate_path(&self, path: &Path) -> Result<PathBuf, AccessError> {
        let path = if path.is_absolute() {
            normalize_lexical(path)
        } else {
            resolve_absolute(&path.to_string_lossy())?
        };
        self.check(path)
    }

    fn check(&self, path: PathBuf) -> Result<PathBuf, AccessError> {
        if let Some(pattern) = self.blocklist.matching_pattern(&path) {
            warn!(path = %path.display(), rule = pattern, "access denied by blocked pattern");
            return Err(AccessError::Blocked {
                path,
                pattern: pattern.to_string(),
            });
        }

        if self.roots.is_empty() || self.roots.iter().any(|root| is_within(root, &path)) {
            return Ok(path);
        }

        warn!(path = %path.display(), "access denied outside allowed directories");
        Err(AccessError::OutsideRoots { path })
    }

    /// Blocklist-only check used to filter listing and search results.
    pub fn is_blocked(&self, path: &Path) -> bool {
        self.blocklist.is_blocked(path)
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn blocked_patterns(&self) -> Vec<String> {
        self.blocklist.patterns().map(str::to_string).collect()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.roots.is_empty()
    }
}
