//! Allocation-based fallback coverage.
//!
//! Some classes are only ever *constructed* during a test — plain data
//! holders whose methods never execute a traced line. Object-creation
//! events catch those: the instantiated class identity goes into a dedup
//! set, and at stop time each tracked class resolves to its defining file
//! and folds into the coverage set.
//!
//! Synthetic classes are skipped up front by a one-byte name check; their
//! resolution is known to fail and the resolver call is not worth paying.

use crate::coverage::state::CoverageSet;
use crate::filter::PathFilter;
use rustc_hash::FxHashSet;
use vesper_runtime::class::is_synthetic_name;
use vesper_runtime::hooks::AllocEvent;
use vesper_runtime::registry::ClassRegistry;
use vesper_runtime::ClassId;

/// Deduplicated set of classes instantiated during a run.
#[derive(Debug, Default)]
pub struct AllocationTracker {
    seen: FxHashSet<ClassId>,
}

impl AllocationTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an object-creation event. First-seen wins; no count kept.
    #[inline]
    pub fn record(&mut self, event: &AllocEvent) {
        if is_synthetic_name(&event.class_name) {
            return;
        }
        self.seen.insert(event.class);
    }

    /// Resolve every tracked class and fold the included defining files
    /// into the coverage set. Empties the tracker.
    pub fn drain_into(
        &mut self,
        set: &mut CoverageSet,
        classes: &ClassRegistry,
        filter: &PathFilter,
    ) {
        for id in self.seen.drain() {
            let Some(info) = classes.info(id) else {
                continue;
            };
            let Some(location) = info.location else {
                continue;
            };
            if filter.includes(&location.path) {
                set.insert_file(location.path);
            }
        }
    }

    /// Number of distinct tracked classes.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Check if nothing has been tracked.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
