//! Constant and class registries: the reflection service.
//!
//! `ConstRegistry` answers "where is this qualified name defined"; the
//! compiler records a binding when a constant definition is executed.
//! Lookup failure is a valid result, not an error: natively-defined
//! constants and anonymous classes have no source location.
//!
//! `ClassRegistry` allocates `ClassId`s and maps them back to metadata.

use crate::class::{ClassId, ClassInfo};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// A resolved source definition site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Absolute path of the defining file.
    pub path: Arc<str>,

    /// Line of the definition.
    pub line: u32,
}

impl SourceLocation {
    /// Create a source location.
    pub fn new(path: impl Into<Arc<str>>, line: u32) -> Self {
        SourceLocation {
            path: path.into(),
            line,
        }
    }
}

// =============================================================================
// Constant Registry
// =============================================================================

/// Registry of qualified constant names to their definition sites.
#[derive(Debug, Default)]
pub struct ConstRegistry {
    /// Qualified name (`Foo::Bar`) to definition site.
    bindings: RwLock<FxHashMap<Arc<str>, SourceLocation>>,
}

impl ConstRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a constant definition.
    pub fn define(&self, qualified_name: impl Into<Arc<str>>, location: SourceLocation) {
        self.bindings.write().insert(qualified_name.into(), location);
    }

    /// Look up the definition site of a qualified name.
    ///
    /// `None` when the name is unknown or defined natively. Never fails.
    #[inline]
    pub fn source_location(&self, qualified_name: &str) -> Option<SourceLocation> {
        self.bindings.read().get(qualified_name).cloned()
    }

    /// Number of recorded bindings.
    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Class Registry
// =============================================================================

/// Registry of loaded classes.
#[derive(Debug)]
pub struct ClassRegistry {
    /// ClassId to metadata.
    classes: RwLock<FxHashMap<ClassId, ClassInfo>>,
    /// Counter for generating new ClassIds.
    next_id: AtomicU32,
}

impl ClassRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            classes: RwLock::new(FxHashMap::default()),
            next_id: AtomicU32::new(1),
        }
    }

    /// Register a class, allocating a fresh id.
    pub fn register(&self, info: ClassInfo) -> ClassId {
        let id = ClassId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.classes.write().insert(id, info);
        id
    }

    /// Look up class metadata.
    #[inline]
    pub fn info(&self, id: ClassId) -> Option<ClassInfo> {
        self.classes.read().get(&id).cloned()
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_const_registry_lookup() {
        let registry = ConstRegistry::new();
        registry.define("Foo::Bar", SourceLocation::new("/proj/foo/bar.vsp", 3));

        let loc = registry.source_location("Foo::Bar").unwrap();
        assert_eq!(&*loc.path, "/proj/foo/bar.vsp");
        assert_eq!(loc.line, 3);

        // Unknown names resolve to None, not an error.
        assert!(registry.source_location("Missing").is_none());
    }

    #[test]
    fn test_class_registry_ids_are_unique() {
        let registry = ClassRegistry::new();
        let a = registry.register(ClassInfo::unlocated("A"));
        let b = registry.register(ClassInfo::unlocated("B"));

        assert_ne!(a, b);
        assert_eq!(&*registry.info(a).unwrap().name, "A");
        assert!(registry.info(ClassId(9999)).is_none());
    }
}
