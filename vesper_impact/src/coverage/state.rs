//! Coverage accumulator with a single-slot identity cache.
//!
//! Consecutive line events overwhelmingly come from the same file, so the
//! hot path keeps the data pointer of the last recorded path and bails on a
//! match before doing any prefix comparison or hashing. The expensive path
//! (filter check, set insertion) runs only when the observed file changes.

use crate::filter::PathFilter;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use vesper_runtime::hooks::LineEvent;

/// Granularity of the accumulated coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageMode {
    /// Record touched files only.
    Files,
    /// Record touched files and the executed lines within each.
    Lines,
}

/// The accumulated record of one collection cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CoverageSet {
    /// Files mode: set of touched file paths.
    Files(FxHashSet<Arc<str>>),
    /// Lines mode: touched file paths with executed line numbers.
    Lines(FxHashMap<Arc<str>, FxHashSet<u32>>),
}

impl CoverageSet {
    /// Create an empty set for a mode.
    pub fn empty(mode: CoverageMode) -> Self {
        match mode {
            CoverageMode::Files => CoverageSet::Files(FxHashSet::default()),
            CoverageMode::Lines => CoverageSet::Lines(FxHashMap::default()),
        }
    }

    /// Number of files in the set.
    pub fn len(&self) -> usize {
        match self {
            CoverageSet::Files(files) => files.len(),
            CoverageSet::Lines(files) => files.len(),
        }
    }

    /// Check if no file was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether a file is in the set.
    pub fn contains_file(&self, path: &str) -> bool {
        match self {
            CoverageSet::Files(files) => files.contains(path),
            CoverageSet::Lines(files) => files.contains_key(path),
        }
    }

    /// Executed lines for a file (lines mode only).
    pub fn lines_for(&self, path: &str) -> Option<&FxHashSet<u32>> {
        match self {
            CoverageSet::Files(_) => None,
            CoverageSet::Lines(files) => files.get(path),
        }
    }

    /// Insert a file without line information. In lines mode the file gets
    /// an empty line set; used when folding in allocation-tracked classes,
    /// whose construction is observed without any traced line.
    pub fn insert_file(&mut self, path: Arc<str>) {
        match self {
            CoverageSet::Files(files) => {
                files.insert(path);
            }
            CoverageSet::Lines(files) => {
                files.entry(path).or_default();
            }
        }
    }

    fn insert_line(&mut self, path: Arc<str>, line: u32) {
        match self {
            CoverageSet::Files(files) => {
                files.insert(path);
            }
            CoverageSet::Lines(files) => {
                files.entry(path).or_default().insert(line);
            }
        }
    }
}

/// Mutable, resettable accumulator driven by hook callbacks.
#[derive(Debug)]
pub struct CoverageState {
    filter: PathFilter,
    mode: CoverageMode,
    set: CoverageSet,

    /// Data pointer of the last observed path. Identity-sized dedup slot;
    /// 0 means no event recorded since the last drain.
    last_path_ptr: usize,
    /// Last observed line, meaningful in lines mode only.
    last_line: u32,
}

impl CoverageState {
    /// Create an empty accumulator.
    pub fn new(filter: PathFilter, mode: CoverageMode) -> Self {
        CoverageState {
            filter,
            mode,
            set: CoverageSet::empty(mode),
            last_path_ptr: 0,
            last_line: 0,
        }
    }

    /// Record one line event.
    ///
    /// Amortized O(1): a repeat of the previous event is recognized by
    /// pointer identity before any other work.
    #[inline]
    pub fn record(&mut self, event: &LineEvent) {
        let ptr = event.path.as_ptr() as usize;
        let hit = match self.mode {
            CoverageMode::Files => ptr == self.last_path_ptr,
            CoverageMode::Lines => ptr == self.last_path_ptr && event.line == self.last_line,
        };
        if hit {
            return;
        }
        self.last_path_ptr = ptr;
        self.last_line = event.line;

        if !self.filter.includes(&event.path) {
            return;
        }
        match self.mode {
            CoverageMode::Files => self.set.insert_file(event.path.clone()),
            CoverageMode::Lines => self.set.insert_line(event.path.clone(), event.line),
        }
    }

    /// Take the accumulated set, leaving the state empty. Clears the
    /// dedup slot so a reused instance starts cold.
    pub fn drain(&mut self) -> CoverageSet {
        self.last_path_ptr = 0;
        self.last_line = 0;
        std::mem::replace(&mut self.set, CoverageSet::empty(self.mode))
    }

    /// The configured path filter.
    pub fn filter(&self) -> &PathFilter {
        &self.filter
    }
}
