//! Vesper Test-Impact Analysis
//!
//! Answers "which source files matter for which tests" from two angles:
//!
//! - **Dynamic coverage collection** ([`CoverageCollector`]): instruments
//!   live execution through the runtime's line-execution and
//!   object-creation hooks and accumulates the set of files touched while a
//!   test ran. Hooks fire synchronously on the executing thread; the
//!   per-line cost after the first event for a file is a single pointer
//!   comparison.
//!
//! - **Static dependency mapping** ([`StaticDependencyMapper`]): walks the
//!   live heap's compiled code objects without executing anything, finds
//!   constant-reference instructions in their serialized literal trees, and
//!   resolves each referenced name back to the file defining it, producing
//!   a file → files dependency map.
//!
//! Both narrow their results through the same [`PathFilter`] (include under
//! a root, exclude under an ignored subtree) and the same silent name
//! resolution contract: a name that cannot be resolved to a source location
//! is simply absent from the results, never an error.
//!
//! # Concurrency
//!
//! Two collectors running in [`ThreadingMode::Multi`] share the global hook
//! tables and both see all line events; concurrent multi-mode collection
//! double-records by design. A [`ThreadingMode::Single`] collector must be
//! stopped by the thread that started it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coverage;
pub mod deps;
pub mod error;
pub mod filter;
pub mod resolver;

pub use coverage::collector::{CollectorConfig, CoverageCollector};
pub use coverage::hooks::ThreadingMode;
pub use coverage::state::{CoverageMode, CoverageSet};
pub use deps::mapper::{DependencyMap, StaticDependencyMapper};
pub use error::{ConfigError, CoverageError, MapperError, UsageError};
pub use filter::PathFilter;
pub use resolver::{resolve_const_to_file, SourceReflect};
