//! Literal/instruction trees for serialized code objects.
//!
//! A compiled code object serializes to a nested tree of sequences, mappings
//! and scalars. Instructions are sequences whose first element is a symbol
//! opcode tag; operands and embedded literal data follow. Consumers pattern
//! match on the closed set of tags they recognize and recurse into anything
//! else.

use std::sync::Arc;

/// A node in a serialized literal/instruction tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Ordered sequence of child nodes. Instructions are sequences whose
    /// first element is a `Symbol` opcode tag.
    Seq(Vec<Literal>),

    /// Mapping node, stored as ordered key/value pairs.
    Map(Vec<(Literal, Literal)>),

    /// Interned symbolic name (opcode tags, constant name operands).
    Symbol(Arc<str>),

    /// String scalar.
    Str(Arc<str>),

    /// Integer scalar.
    Int(i64),

    /// Absent value.
    None,
}

impl Literal {
    /// Build a symbol node from a string.
    pub fn symbol(name: impl Into<Arc<str>>) -> Self {
        Literal::Symbol(name.into())
    }

    /// Build a string node.
    pub fn str(value: impl Into<Arc<str>>) -> Self {
        Literal::Str(value.into())
    }

    /// View this node as a sequence.
    #[inline]
    pub fn as_seq(&self) -> Option<&[Literal]> {
        match self {
            Literal::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// View this node as a mapping.
    #[inline]
    pub fn as_map(&self) -> Option<&[(Literal, Literal)]> {
        match self {
            Literal::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// View this node as a symbolic name.
    #[inline]
    pub fn as_symbol(&self) -> Option<&Arc<str>> {
        match self {
            Literal::Symbol(name) => Some(name),
            _ => None,
        }
    }
}
