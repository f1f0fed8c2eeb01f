//! File → files dependency map and its builder.
//!
//! `populate` is a full, non-incremental rescan: it enumerates every live
//! compiled code object, scans each through the walker, and returns a map
//! built from scratch. The engine keeps no cross-call cache.

use crate::deps::{enumerator, walker};
use crate::error::{MapperError, MapperResult};
use crate::filter::PathFilter;
use crate::resolver::SourceReflect;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use vesper_runtime::objspace::ObjectSpace;

/// Map from a scanned file to the set of files defining the constants it
/// references. Files with no resolvable reference have no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyMap {
    entries: FxHashMap<Arc<str>, FxHashSet<Arc<str>>>,
}

impl DependencyMap {
    /// Files a given file depends on. `None` when the file was not seen or
    /// had no resolvable reference.
    pub fn dependencies_for(&self, file: &str) -> Option<&FxHashSet<Arc<str>>> {
        self.entries.get(file)
    }

    /// Record one dependency edge. The origin's set is created lazily on
    /// first match; insertion is idempotent.
    pub(crate) fn record(&mut self, origin: &Arc<str>, dependency: Arc<str>) {
        self.entries
            .entry(origin.clone())
            .or_default()
            .insert(dependency);
    }

    /// Iterate over (file, dependencies) entries.
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &FxHashSet<Arc<str>>)> {
        self.entries.iter()
    }

    /// Number of files with at least one dependency.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Static dependency mapper over the live heap.
pub struct StaticDependencyMapper {
    space: Arc<ObjectSpace>,
    reflect: Arc<dyn SourceReflect>,
}

impl StaticDependencyMapper {
    /// Create a mapper over an object space and a reflection service.
    pub fn new(space: Arc<ObjectSpace>, reflect: Arc<dyn SourceReflect>) -> Self {
        StaticDependencyMapper { space, reflect }
    }

    /// Build the dependency map for every live code unit under `root`.
    ///
    /// Each call rescans from scratch. Not safe to call concurrently with
    /// itself on the same instance.
    pub fn populate(&self, root: &str, ignored: Option<&str>) -> MapperResult<DependencyMap> {
        if root.is_empty() {
            return Err(MapperError::RootRequired);
        }
        let filter = PathFilter::new(root, ignored.map(Arc::from))
            .map_err(|_| MapperError::RootRequired)?;

        let mut map = DependencyMap::default();
        enumerator::for_each_code_object(&self.space, |code| {
            walker::scan(&code, &mut map, &filter, self.reflect.as_ref());
        });
        Ok(map)
    }
}

impl std::fmt::Debug for StaticDependencyMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticDependencyMapper")
            .field("live_objects", &self.space.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::walker::OP_LOAD_CONST;
    use vesper_runtime::code::CodeObject;
    use vesper_runtime::literal::Literal;
    use vesper_runtime::objspace::HeapObject;
    use vesper_runtime::registry::{ConstRegistry, SourceLocation};

    fn mapper_with_unit() -> StaticDependencyMapper {
        let registry = Arc::new(ConstRegistry::new());
        registry.define("Foo::Bar", SourceLocation::new("/proj/foo/bar.vsp", 1));

        let space = Arc::new(ObjectSpace::new());
        space.insert(HeapObject::Code(Arc::new(CodeObject::new(
            "a",
            "/proj/a.vsp",
            1,
            Literal::Seq(vec![Literal::Seq(vec![
                Literal::symbol(OP_LOAD_CONST),
                Literal::symbol("Foo::Bar"),
            ])]),
        ))));

        StaticDependencyMapper::new(space, registry)
    }

    #[test]
    fn test_populate_builds_edge() {
        let mapper = mapper_with_unit();
        let map = mapper.populate("/proj", None).unwrap();

        let deps = map.dependencies_for("/proj/a.vsp").unwrap();
        assert!(deps.contains("/proj/foo/bar.vsp"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_populate_is_deterministic() {
        let mapper = mapper_with_unit();
        let first = mapper.populate("/proj", None).unwrap();
        let second = mapper.populate("/proj", None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_root_rejected() {
        let mapper = mapper_with_unit();
        assert_eq!(
            mapper.populate("", None).unwrap_err(),
            MapperError::RootRequired
        );
    }

    #[test]
    fn test_absent_file_has_no_entry() {
        let mapper = mapper_with_unit();
        let map = mapper.populate("/proj", None).unwrap();
        assert!(map.dependencies_for("/proj/never_seen.vsp").is_none());
    }
}
