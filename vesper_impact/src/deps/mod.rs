//! Static dependency mapping.
//!
//! Walks every live compiled code object, scans its serialized literal
//! tree for constant-reference instructions, and resolves each referenced
//! name back to the file defining it — a file → files dependency map built
//! without executing anything.

pub mod enumerator;
pub mod mapper;
pub mod walker;
