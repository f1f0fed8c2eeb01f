//! Live code-object enumeration.
//!
//! One pass over the object space's handle snapshot. The heap may be
//! compacted between visits, so every handle is re-resolved immediately
//! before the type-tag check — a handle read obtained earlier must never
//! be reused across a potential relocation point.

use std::sync::Arc;
use vesper_runtime::code::CodeObject;
use vesper_runtime::objspace::{HeapObject, ObjectSpace};

/// Visit every live compiled code object exactly once.
pub fn for_each_code_object(space: &ObjectSpace, mut visitor: impl FnMut(Arc<CodeObject>)) {
    space.each_handle(|handle| {
        // Re-acquire now; the snapshot position may be stale.
        if let Some(HeapObject::Code(code)) = space.resolve(handle) {
            visitor(code);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesper_runtime::class::ClassInfo;
    use vesper_runtime::literal::Literal;
    use vesper_runtime::registry::ClassRegistry;

    #[test]
    fn test_yields_only_code_objects() {
        let space = ObjectSpace::new();
        let classes = ClassRegistry::new();
        let class = classes.register(ClassInfo::unlocated("Foo"));

        space.insert(HeapObject::Instance { class });
        space.insert(HeapObject::Code(Arc::new(CodeObject::new(
            "main",
            "/proj/main.vsp",
            1,
            Literal::Seq(vec![]),
        ))));

        let mut names = Vec::new();
        for_each_code_object(&space, |code| names.push(code.name.clone()));
        assert_eq!(names.len(), 1);
        assert_eq!(&*names[0], "main");
    }

    #[test]
    fn test_survives_compaction_between_visits() {
        let space = ObjectSpace::new();
        for i in 0..4 {
            space.insert(HeapObject::Code(Arc::new(CodeObject::new(
                format!("unit{i}"),
                format!("/proj/unit{i}.vsp"),
                1,
                Literal::Seq(vec![]),
            ))));
        }

        let mut visited = 0;
        for_each_code_object(&space, |_| {
            space.compact();
            visited += 1;
        });
        assert_eq!(visited, 4);
    }
}
