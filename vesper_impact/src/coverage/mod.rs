//! Dynamic coverage collection.
//!
//! The collector arms runtime instrumentation hooks for the duration of one
//! test, accumulates the files (optionally file lines) touched, and returns
//! the accumulated set on stop. Instances are reusable across many
//! start/stop cycles, one per test.

pub mod allocation;
pub mod collector;
pub mod hooks;
pub mod state;
