//! Access Guard Module
//!
//! Decides whether a path may be touched: blocked globs always win, then
//! allowed-root containment applies.

mod blocklist;
mod guard;
mod paths;


use std::path::PathBuf;

use thiserror::Error;

pub use blocklist::BlockList;
pub use guard::AccessGuard;
pub use paths::{is_within, normalize_lexical, resolve_absolute};

// == Access Error ==
/// Why a path was refused. Messages name the rule that fired.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Input could not be resolved to an absolute path
    #[error("invalid path {input:?}: {reason}")]
    InvalidPath { input: String, reason: String },

    /// Path matched a blocked glob
    #[error("path {} matches blocked pattern {pattern:?}", path.display())]
    Blocked { path: PathBuf, pattern: String },

    /// Roots are configured and the path is under none of them
    #[error("path {} is outside allowed directories", path.display())]
    OutsideRoots { path: PathBuf },

    /// A configured blocked pattern failed to compile
    #[error("invalid blocked pattern {pattern:?}: {reason}")]
    BadPattern { pattern: String, reason: String },
}

impl AccessError {
    pub(crate) fn invalid(input: &str, reason: impl Into<String>) -> Self {
        AccessError::InvalidPath {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// True for refusals that map to access denied rather than bad input.
    pub fn is_denied(&self) -> bool {
        matches!(self, AccessError::Blocked { .. } | AccessError::OutsideRoots { .. })
    }
}
