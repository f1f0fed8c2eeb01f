//! Path inclusion predicate.
//!
//! A path is included iff it is prefixed by the root and, when an ignored
//! subtree is configured, not prefixed by it. The check runs on every
//! file-candidate in the line-event hot path, so it is a pure byte-prefix
//! comparison with no allocation.

use crate::error::ConfigError;
use std::sync::Arc;

/// Include/exclude predicate over absolute file paths.
#[derive(Debug, Clone)]
pub struct PathFilter {
    root: Arc<str>,
    ignored: Option<Arc<str>>,
}

impl PathFilter {
    /// Create a filter. The root must be non-empty; an empty ignored path
    /// is treated as unset.
    pub fn new(
        root: impl Into<Arc<str>>,
        ignored: Option<Arc<str>>,
    ) -> Result<Self, ConfigError> {
        let root = root.into();
        if root.is_empty() {
            return Err(ConfigError::MissingRoot);
        }
        Ok(PathFilter {
            root,
            ignored: ignored.filter(|path| !path.is_empty()),
        })
    }

    /// Check whether a path is inside the root and outside the ignored
    /// subtree.
    #[inline]
    pub fn includes(&self, path: &str) -> bool {
        let bytes = path.as_bytes();
        if !bytes.starts_with(self.root.as_bytes()) {
            return false;
        }
        match &self.ignored {
            Some(ignored) => !bytes.starts_with(ignored.as_bytes()),
            None => true,
        }
    }

    /// The configured root prefix.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The configured ignored prefix, if any.
    pub fn ignored(&self) -> Option<&str> {
        self.ignored.as_deref()
    }
}
