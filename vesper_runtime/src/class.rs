//! Class identity and metadata.
//!
//! Every loaded class gets a `ClassId`, an opaque comparable handle used as
//! a deduplication key by the allocation tracker. Synthetic classes (lambda
//! wrappers, anonymous classes, comprehension scopes) carry names beginning
//! with `<` and never have a resolvable source location.

use crate::registry::SourceLocation;
use std::sync::Arc;

/// Opaque, comparable handle to a loaded class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

impl ClassId {
    /// Get the raw id.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Metadata for a loaded class.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    /// Class name as the runtime prints it (`Foo::Bar`, `<lambda>`, ...).
    pub name: Arc<str>,

    /// Where the class is defined. `None` for natively-defined and
    /// synthetic classes.
    pub location: Option<SourceLocation>,
}

impl ClassInfo {
    /// Create class metadata with a known definition site.
    pub fn new(name: impl Into<Arc<str>>, location: SourceLocation) -> Self {
        ClassInfo {
            name: name.into(),
            location: Some(location),
        }
    }

    /// Create class metadata with no definition site (native or synthetic).
    pub fn unlocated(name: impl Into<Arc<str>>) -> Self {
        ClassInfo {
            name: name.into(),
            location: None,
        }
    }

    /// Check whether this class is synthetic (anonymous marker name).
    #[inline]
    pub fn is_synthetic(&self) -> bool {
        is_synthetic_name(&self.name)
    }
}

/// Check whether a class name denotes a synthetic/anonymous class.
///
/// Single byte inspection so callers on hot paths can skip work that is
/// known to fail (synthetic classes never resolve to a source location).
#[inline]
pub fn is_synthetic_name(name: &str) -> bool {
    name.as_bytes().first() == Some(&b'<')
}
