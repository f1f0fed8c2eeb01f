//! Literal-tree scan for constant-reference instructions.
//!
//! Instructions are sequences tagged with a symbol opcode. Two tags load
//! constants by name:
//!
//! - `load_const` — direct reference, operand is one symbolic name;
//! - `load_const_path` — qualified reference, operand is a sequence of
//!   symbolic segments joined with `::` (non-symbol segments skipped).
//!
//! Every matched name resolves through the reflection seam; resolved files
//! inside the filter are recorded against the scanned unit's path. A
//! malformed node is never an error: it simply fails to match, and the
//! walk recurses into its children regardless.

use crate::deps::mapper::DependencyMap;
use crate::filter::PathFilter;
use crate::resolver::{resolve_const_to_file, SourceReflect};
use smallvec::SmallVec;
use std::sync::Arc;
use vesper_runtime::code::CodeObject;
use vesper_runtime::literal::Literal;

/// Opcode tag of a direct constant reference.
pub const OP_LOAD_CONST: &str = "load_const";

/// Opcode tag of a qualified constant-path reference.
pub const OP_LOAD_CONST_PATH: &str = "load_const_path";

/// The closed set of recognized constant-reference opcodes. Anything else
/// is "unrecognized, recurse anyway".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefOpcode {
    LoadConst,
    LoadConstPath,
}

impl RefOpcode {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            OP_LOAD_CONST => Some(RefOpcode::LoadConst),
            OP_LOAD_CONST_PATH => Some(RefOpcode::LoadConstPath),
            _ => None,
        }
    }
}

/// Scan one code unit's literal tree into the dependency map.
///
/// Units without an absolute path (dynamically evaluated code) and units
/// outside the filter are skipped whole.
pub fn scan(
    code: &CodeObject,
    map: &mut DependencyMap,
    filter: &PathFilter,
    reflect: &dyn SourceReflect,
) {
    let Some(origin) = &code.absolute_path else {
        return;
    };
    if !filter.includes(origin) {
        return;
    }

    // The instruction body is the trailing element of the serialized form.
    let tree = code.literal_tree();
    let Some(items) = tree.as_seq() else {
        return;
    };
    let Some(body) = items.last() else {
        return;
    };

    scan_node(body, origin, map, filter, reflect);
}

fn scan_node(
    node: &Literal,
    origin: &Arc<str>,
    map: &mut DependencyMap,
    filter: &PathFilter,
    reflect: &dyn SourceReflect,
) {
    match node {
        Literal::Seq(items) => {
            if items.len() >= 2 {
                if let Some(op) = items[0].as_symbol().and_then(|tag| RefOpcode::from_tag(tag)) {
                    match op {
                        RefOpcode::LoadConst => {
                            if let Some(name) = items[1].as_symbol() {
                                record_resolved(name, origin, map, filter, reflect);
                            }
                        }
                        RefOpcode::LoadConstPath => {
                            if let Some(segments) = items[1].as_seq() {
                                let name = join_segments(segments);
                                if !name.is_empty() {
                                    record_resolved(&name, origin, map, filter, reflect);
                                }
                            }
                        }
                    }
                }
            }

            // Recurse into all elements whether or not this node matched;
            // nested sequences carry nested instruction streams.
            for item in items {
                scan_node(item, origin, map, filter, reflect);
            }
        }
        Literal::Map(pairs) => {
            for (key, value) in pairs {
                scan_node(key, origin, map, filter, reflect);
                scan_node(value, origin, map, filter, reflect);
            }
        }
        _ => {}
    }
}

/// Join symbolic segments with `::`, skipping non-symbol entries.
fn join_segments(segments: &[Literal]) -> String {
    let parts: SmallVec<[&str; 4]> = segments
        .iter()
        .filter_map(|segment| segment.as_symbol().map(|name| &**name))
        .collect();

    let mut joined = String::new();
    for part in parts {
        if !joined.is_empty() {
            joined.push_str("::");
        }
        joined.push_str(part);
    }
    joined
}

fn record_resolved(
    name: &str,
    origin: &Arc<str>,
    map: &mut DependencyMap,
    filter: &PathFilter,
    reflect: &dyn SourceReflect,
) {
    if let Some(file) = resolve_const_to_file(reflect, name) {
        if filter.includes(&file) {
            map.record(origin, file);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesper_runtime::registry::{ConstRegistry, SourceLocation};

    fn registry() -> ConstRegistry {
        let registry = ConstRegistry::new();
        registry.define("Foo", SourceLocation::new("/proj/foo.vsp", 1));
        registry.define("Foo::Bar", SourceLocation::new("/proj/foo/bar.vsp", 1));
        registry.define("Vendored", SourceLocation::new("/proj/vendor/v.vsp", 1));
        registry
    }

    fn filter() -> PathFilter {
        PathFilter::new("/proj", Some(Arc::from("/proj/vendor"))).unwrap()
    }

    fn direct(name: &str) -> Literal {
        Literal::Seq(vec![Literal::symbol(OP_LOAD_CONST), Literal::symbol(name)])
    }

    fn scan_body(body: Literal) -> DependencyMap {
        let code = CodeObject::new("main", "/proj/a.vsp", 1, body);
        let mut map = DependencyMap::default();
        scan(&code, &mut map, &filter(), &registry());
        map
    }

    #[test]
    fn test_direct_reference_recorded() {
        let map = scan_body(Literal::Seq(vec![direct("Foo")]));
        let deps = map.dependencies_for("/proj/a.vsp").unwrap();
        assert!(deps.contains("/proj/foo.vsp"));
        assert_eq!(deps.len(), 1);
    }

    #[test]
    fn test_qualified_path_joined_with_separator() {
        let body = Literal::Seq(vec![Literal::Seq(vec![
            Literal::symbol(OP_LOAD_CONST_PATH),
            Literal::Seq(vec![
                Literal::symbol("Foo"),
                Literal::Int(0), // non-symbol segment skipped
                Literal::symbol("Bar"),
            ]),
        ])]);
        let map = scan_body(body);
        let deps = map.dependencies_for("/proj/a.vsp").unwrap();
        assert!(deps.contains("/proj/foo/bar.vsp"));
    }

    #[test]
    fn test_unresolvable_and_filtered_names_absent() {
        let body = Literal::Seq(vec![direct("Unknown"), direct("Vendored")]);
        let map = scan_body(body);
        // No resolvable included reference: no entry at all.
        assert!(map.dependencies_for("/proj/a.vsp").is_none());
    }

    #[test]
    fn test_malformed_shapes_never_fail() {
        let body = Literal::Seq(vec![
            // Too short for an operand.
            Literal::Seq(vec![Literal::symbol(OP_LOAD_CONST)]),
            // Operand of the wrong kind.
            Literal::Seq(vec![Literal::symbol(OP_LOAD_CONST), Literal::Int(3)]),
            // Path operand that is not a sequence.
            Literal::Seq(vec![
                Literal::symbol(OP_LOAD_CONST_PATH),
                Literal::symbol("Foo"),
            ]),
            // Path of only non-symbol segments joins to the empty name.
            Literal::Seq(vec![
                Literal::symbol(OP_LOAD_CONST_PATH),
                Literal::Seq(vec![Literal::Int(1)]),
            ]),
            // But a well-formed child nested inside a mapping still matches.
            Literal::Map(vec![(Literal::Int(0), direct("Foo"))]),
        ]);
        let map = scan_body(body);
        let deps = map.dependencies_for("/proj/a.vsp").unwrap();
        assert_eq!(deps.len(), 1);
        assert!(deps.contains("/proj/foo.vsp"));
    }

    #[test]
    fn test_evaluated_and_out_of_root_units_skipped() {
        let mut map = DependencyMap::default();

        let evaluated = CodeObject::evaluated("<eval>", Literal::Seq(vec![direct("Foo")]));
        scan(&evaluated, &mut map, &filter(), &registry());

        let elsewhere =
            CodeObject::new("x", "/other/x.vsp", 1, Literal::Seq(vec![direct("Foo")]));
        scan(&elsewhere, &mut map, &filter(), &registry());

        assert!(map.is_empty());
    }
}
