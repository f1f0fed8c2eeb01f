//! Code object representation for compiled units.
//!
//! A `CodeObject` is one compiled chunk of source: a function, block, class
//! body, or top-level script. Code objects are immutable once created and
//! can be shared across threads.

use crate::literal::Literal;
use std::sync::Arc;

/// Serialization format tag, the leading element of a serialized code object.
pub const CODE_FORMAT_TAG: &str = "vesper-code/v1";

/// A compiled code object.
#[derive(Debug, Clone)]
pub struct CodeObject {
    /// Unit name (or `<module>` for module-level code).
    pub name: Arc<str>,

    /// Qualified name (includes enclosing class/function names).
    pub qualname: Arc<str>,

    /// Absolute path of the defining file. `None` for dynamically
    /// evaluated code, which has no originating file.
    pub absolute_path: Option<Arc<str>>,

    /// First line number in source.
    pub first_lineno: u32,

    /// Serialized instruction stream and embedded literal operands.
    pub body: Literal,
}

impl CodeObject {
    /// Create a code object for a unit defined in a file.
    pub fn new(
        name: impl Into<Arc<str>>,
        absolute_path: impl Into<Arc<str>>,
        first_lineno: u32,
        body: Literal,
    ) -> Self {
        let name = name.into();
        CodeObject {
            qualname: name.clone(),
            name,
            absolute_path: Some(absolute_path.into()),
            first_lineno,
            body,
        }
    }

    /// Create a code object for dynamically evaluated code (no file).
    pub fn evaluated(name: impl Into<Arc<str>>, body: Literal) -> Self {
        let name = name.into();
        CodeObject {
            qualname: name.clone(),
            name,
            absolute_path: None,
            first_lineno: 1,
            body,
        }
    }

    /// Serialize to the literal-tree form.
    ///
    /// The result is a sequence whose trailing element is the instruction
    /// body; everything before it is header metadata. Consumers that only
    /// care about instructions take the last element.
    pub fn literal_tree(&self) -> Literal {
        Literal::Seq(vec![
            Literal::str(CODE_FORMAT_TAG),
            Literal::str(self.name.clone()),
            Literal::str(self.qualname.clone()),
            match &self.absolute_path {
                Some(path) => Literal::str(path.clone()),
                None => Literal::None,
            },
            Literal::Int(i64::from(self.first_lineno)),
            self.body.clone(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_object_new() {
        let code = CodeObject::new("main", "/proj/app.vsp", 1, Literal::Seq(vec![]));
        assert_eq!(&*code.name, "main");
        assert_eq!(code.absolute_path.as_deref(), Some("/proj/app.vsp"));
    }

    #[test]
    fn test_evaluated_has_no_path() {
        let code = CodeObject::evaluated("<eval>", Literal::Seq(vec![]));
        assert!(code.absolute_path.is_none());
    }

    #[test]
    fn test_literal_tree_body_is_trailing() {
        let body = Literal::Seq(vec![Literal::symbol("nop")]);
        let code = CodeObject::new("f", "/proj/f.vsp", 3, body.clone());

        let tree = code.literal_tree();
        let items = tree.as_seq().unwrap();
        assert_eq!(items.last(), Some(&body));
        assert_eq!(items[0], Literal::str(CODE_FORMAT_TAG));
    }
}
