//! Coverage collection lifecycle.
//!
//! One collector per test-runner, reused across many start/stop cycles
//! (one cycle per test). `start` arms the runtime hooks against this
//! collector's accumulator; `stop` disarms them, folds in allocation-traced
//! classes, and hands the accumulated set to the caller.
//!
//! Two collectors running concurrently in multi mode share the global hook
//! tables and double-record each other's events; that is an accepted
//! constraint of process-wide instrumentation, not something this type
//! guards against.

use crate::coverage::allocation::AllocationTracker;
use crate::coverage::hooks::{HookManager, ThreadingMode};
use crate::coverage::state::{CoverageMode, CoverageSet, CoverageState};
use crate::error::{ConfigError, CoverageResult, UsageError};
use crate::filter::PathFilter;
use parking_lot::Mutex;
use std::sync::Arc;
use vesper_runtime::hooks::{AllocCallback, AllocEvent, HookRegistry, LineCallback, LineEvent};
use vesper_runtime::registry::ClassRegistry;

/// Collector configuration, immutable once the collector is built.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Root path; only files under it are recorded. Required.
    pub root: Arc<str>,
    /// Subtree under the root to exclude (bundled dependencies, vendored
    /// code). Optional.
    pub ignored_path: Option<Arc<str>>,
    /// Thread scope of the line instrumentation.
    pub threading: ThreadingMode,
    /// Files or file-lines granularity.
    pub mode: CoverageMode,
    /// Track object creation as a fallback coverage channel. Multi mode
    /// only.
    pub allocation_tracing: bool,
}

impl CollectorConfig {
    /// Files-granularity, multi-threaded config with allocation tracing
    /// off; the common starting point.
    pub fn new(root: impl Into<Arc<str>>) -> Self {
        CollectorConfig {
            root: root.into(),
            ignored_path: None,
            threading: ThreadingMode::Multi,
            mode: CoverageMode::Files,
            allocation_tracing: false,
        }
    }
}

/// Start/stop coverage collector.
pub struct CoverageCollector {
    state: Arc<Mutex<CoverageState>>,
    tracker: Arc<Mutex<AllocationTracker>>,
    hooks: HookManager,
    classes: Arc<ClassRegistry>,
    threading: ThreadingMode,
    allocation_tracing: bool,
}

impl CoverageCollector {
    /// Build a collector.
    ///
    /// Fails when the root is empty or when allocation tracing is
    /// requested together with single-threaded scope.
    pub fn new(
        config: CollectorConfig,
        registry: Arc<HookRegistry>,
        classes: Arc<ClassRegistry>,
    ) -> Result<Self, ConfigError> {
        let filter = PathFilter::new(config.root, config.ignored_path)?;
        if config.allocation_tracing && config.threading == ThreadingMode::Single {
            return Err(ConfigError::AllocationTracingUnsupported);
        }

        Ok(CoverageCollector {
            state: Arc::new(Mutex::new(CoverageState::new(filter, config.mode))),
            tracker: Arc::new(Mutex::new(AllocationTracker::new())),
            hooks: HookManager::new(registry),
            classes,
            threading: config.threading,
            allocation_tracing: config.allocation_tracing,
        })
    }

    /// Check whether a collection cycle is in progress.
    pub fn is_running(&self) -> bool {
        self.hooks.is_armed()
    }

    /// Begin a collection cycle: arm the hooks against this collector's
    /// accumulator. In single mode the hooks bind to the calling thread.
    pub fn start(&mut self) -> CoverageResult<()> {
        if self.hooks.is_armed() {
            return Err(UsageError::AlreadyRunning.into());
        }

        let state = Arc::clone(&self.state);
        let on_line: LineCallback = Arc::new(move |event: &LineEvent| {
            state.lock().record(event);
        });

        let on_alloc: Option<AllocCallback> = if self.allocation_tracing {
            let tracker = Arc::clone(&self.tracker);
            Some(Arc::new(move |event: &AllocEvent| {
                tracker.lock().record(event);
            }))
        } else {
            None
        };

        self.hooks.arm(self.threading, on_line, on_alloc)?;
        Ok(())
    }

    /// End the cycle: disarm the hooks, fold in allocation-traced classes,
    /// and return the accumulated set. The collector is reusable
    /// immediately afterwards.
    ///
    /// Fails without detaching anything when called while not running, or
    /// on a single-mode collector from a thread other than the one that
    /// called [`CoverageCollector::start`].
    pub fn stop(&mut self) -> CoverageResult<CoverageSet> {
        self.hooks.disarm()?;

        let mut state = self.state.lock();
        let mut set = state.drain();
        if self.allocation_tracing {
            self.tracker
                .lock()
                .drain_into(&mut set, &self.classes, state.filter());
        }
        Ok(set)
    }
}

impl std::fmt::Debug for CoverageCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoverageCollector")
            .field("threading", &self.threading)
            .field("allocation_tracing", &self.allocation_tracing)
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoverageError;

    fn collector(config: CollectorConfig) -> (CoverageCollector, Arc<HookRegistry>) {
        let registry = Arc::new(HookRegistry::new());
        let classes = Arc::new(ClassRegistry::new());
        let collector =
            CoverageCollector::new(config, Arc::clone(&registry), classes).unwrap();
        (collector, registry)
    }

    fn line(path: &str, line: u32) -> LineEvent {
        LineEvent {
            path: Arc::from(path),
            line,
        }
    }

    #[test]
    fn test_empty_root_rejected() {
        let registry = Arc::new(HookRegistry::new());
        let classes = Arc::new(ClassRegistry::new());
        let err = CoverageCollector::new(CollectorConfig::new(""), registry, classes)
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingRoot);
    }

    #[test]
    fn test_alloc_tracing_with_single_mode_rejected() {
        let registry = Arc::new(HookRegistry::new());
        let classes = Arc::new(ClassRegistry::new());
        let config = CollectorConfig {
            threading: ThreadingMode::Single,
            allocation_tracing: true,
            ..CollectorConfig::new("/proj")
        };
        let err = CoverageCollector::new(config, registry, classes).unwrap_err();
        assert_eq!(err, ConfigError::AllocationTracingUnsupported);
    }

    #[test]
    fn test_stop_without_start_is_an_error() {
        let (mut c, _) = collector(CollectorConfig::new("/proj"));
        assert_eq!(
            c.stop().unwrap_err(),
            CoverageError::Usage(UsageError::NotRunning)
        );
    }

    #[test]
    fn test_start_twice_is_an_error() {
        let (mut c, _) = collector(CollectorConfig::new("/proj"));
        c.start().unwrap();
        assert_eq!(
            c.start().unwrap_err(),
            CoverageError::Usage(UsageError::AlreadyRunning)
        );
        c.stop().unwrap();
    }

    #[test]
    fn test_cycle_with_no_events_is_empty_and_repeatable() {
        let (mut c, _) = collector(CollectorConfig::new("/proj"));

        c.start().unwrap();
        assert!(c.stop().unwrap().is_empty());

        c.start().unwrap();
        assert!(c.stop().unwrap().is_empty());
    }

    #[test]
    fn test_events_between_cycles_do_not_leak() {
        let (mut c, registry) = collector(CollectorConfig::new("/proj"));

        c.start().unwrap();
        registry.dispatch_line(&line("/proj/app/a.vsp", 1));
        let first = c.stop().unwrap();
        assert_eq!(first.len(), 1);

        // Events while idle go nowhere.
        registry.dispatch_line(&line("/proj/app/b.vsp", 1));

        c.start().unwrap();
        assert!(c.stop().unwrap().is_empty());
    }
}
