//! Qualified-name to source-file resolution.
//!
//! Delegates to the runtime's reflection service. Failure is the dominant
//! outcome in practice (anonymous classes, natively-defined constants) and
//! is a valid `None`, never an error — the walker and the allocation
//! tracker rely on this being silent.

use std::sync::Arc;
use vesper_runtime::registry::{ConstRegistry, SourceLocation};

/// Seam to the runtime's "where is this name defined" reflection call.
pub trait SourceReflect: Send + Sync {
    /// Look up the definition site of a fully-qualified name.
    /// `None` for unknown, natively-defined, or malformed names.
    fn const_source_location(&self, qualified_name: &str) -> Option<SourceLocation>;
}

impl SourceReflect for ConstRegistry {
    fn const_source_location(&self, qualified_name: &str) -> Option<SourceLocation> {
        self.source_location(qualified_name)
    }
}

/// Resolve a qualified constant name to the file defining it.
///
/// Reduces every failure shape (empty name, unknown name, location without
/// a usable path) to `None`.
pub fn resolve_const_to_file(reflect: &dyn SourceReflect, qualified_name: &str) -> Option<Arc<str>> {
    if qualified_name.is_empty() {
        return None;
    }
    let location = reflect.const_source_location(qualified_name)?;
    if location.path.is_empty() {
        return None;
    }
    Some(location.path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_known_name() {
        let registry = ConstRegistry::new();
        registry.define("Foo::Bar", SourceLocation::new("/proj/foo/bar.vsp", 1));

        let file = resolve_const_to_file(&registry, "Foo::Bar").unwrap();
        assert_eq!(&*file, "/proj/foo/bar.vsp");
    }

    #[test]
    fn test_failures_are_silent() {
        let registry = ConstRegistry::new();
        registry.define("Odd", SourceLocation::new("", 1));

        assert!(resolve_const_to_file(&registry, "").is_none());
        assert!(resolve_const_to_file(&registry, "Unknown").is_none());
        // A binding with no usable path is also "no location".
        assert!(resolve_const_to_file(&registry, "Odd").is_none());
    }
}
