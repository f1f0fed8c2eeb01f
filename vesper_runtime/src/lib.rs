//! Vesper Runtime Surface
//!
//! The slice of the Vesper runtime that the test-impact analysis engine
//! instruments and inspects:
//!
//! - **Literal trees**: the serialized form of compiled code (instructions
//!   plus embedded literal operands) as a tagged sequence/mapping/scalar
//!   structure.
//!
//! - **Code objects**: one compiled unit of source (function, block, class
//!   body, top-level script) with an optional originating file path.
//!
//! - **Registries**: the reflection service mapping qualified constant names
//!   and class identities to source locations.
//!
//! - **Object space**: live-object storage with relocatable handles. The
//!   collector may move objects at any allocation point; holders re-acquire
//!   through [`ObjectSpace::resolve`] instead of caching raw positions.
//!
//! - **Hook registry**: process-wide line-execution and object-creation
//!   instrumentation. Hooks fire synchronously on the executing thread.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod class;
pub mod code;
pub mod hooks;
pub mod literal;
pub mod objspace;
pub mod registry;

pub use class::{is_synthetic_name, ClassId, ClassInfo};
pub use code::CodeObject;
pub use hooks::{AllocEvent, HookRegistry, HookToken, LineEvent};
pub use literal::Literal;
pub use objspace::{HeapObject, ObjHandle, ObjectSpace};
pub use registry::{ClassRegistry, ConstRegistry, SourceLocation};
