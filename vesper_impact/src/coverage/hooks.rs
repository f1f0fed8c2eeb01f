//! Hook arming and disarming with thread-scope rules.
//!
//! A thin state machine (`Idle -> Armed -> Idle`) over the runtime's hook
//! registry. Arming attaches the line callback either to the calling thread
//! only (single mode, recording the owner) or process-wide (multi mode),
//! plus an optional global allocation callback. Every attached hook is held
//! as an explicit token and released exactly once on disarm.

use crate::error::{ConfigError, UsageError};
use std::sync::Arc;
use std::thread::ThreadId;
use vesper_runtime::hooks::{AllocCallback, HookRegistry, HookToken, LineCallback};

/// Scope of the line-event instrumentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadingMode {
    /// Hooks bound to exactly one thread, the one that armed them.
    Single,
    /// Hooks bound process-wide, observing all threads.
    Multi,
}

/// Tokens held while armed, plus the owning thread in single mode.
#[derive(Debug)]
struct ArmedHooks {
    tokens: Vec<HookToken>,
    owner: Option<ThreadId>,
}

/// Registers and releases instrumentation against the runtime registry.
#[derive(Debug)]
pub struct HookManager {
    registry: Arc<HookRegistry>,
    armed: Option<ArmedHooks>,
}

impl HookManager {
    /// Create an idle manager over a hook registry.
    pub fn new(registry: Arc<HookRegistry>) -> Self {
        HookManager {
            registry,
            armed: None,
        }
    }

    /// Check whether hooks are currently attached.
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Attach hooks.
    ///
    /// Allocation tracing is defined only in multi mode: creation events
    /// are process-wide and cannot be attributed to one thread. Requesting
    /// it in single mode fails fast.
    ///
    /// The caller guarantees the manager is idle; the collector's
    /// state machine enforces this.
    pub fn arm(
        &mut self,
        mode: ThreadingMode,
        on_line: LineCallback,
        on_alloc: Option<AllocCallback>,
    ) -> Result<(), ConfigError> {
        if mode == ThreadingMode::Single && on_alloc.is_some() {
            return Err(ConfigError::AllocationTracingUnsupported);
        }
        debug_assert!(self.armed.is_none(), "arm while armed");

        let mut tokens = Vec::with_capacity(2);
        let owner = match mode {
            ThreadingMode::Single => {
                let current = std::thread::current().id();
                tokens.push(self.registry.attach_line_thread(current, on_line));
                Some(current)
            }
            ThreadingMode::Multi => {
                tokens.push(self.registry.attach_line_global(on_line));
                None
            }
        };
        if let Some(on_alloc) = on_alloc {
            tokens.push(self.registry.attach_alloc(on_alloc));
        }

        self.armed = Some(ArmedHooks { tokens, owner });
        Ok(())
    }

    /// Detach whichever hooks are attached.
    ///
    /// In single mode this must run on the arming thread; otherwise it
    /// fails and the hooks stay attached.
    pub fn disarm(&mut self) -> Result<(), UsageError> {
        match &self.armed {
            None => return Err(UsageError::NotRunning),
            Some(armed) => {
                if let Some(owner) = armed.owner {
                    let current = std::thread::current().id();
                    if current != owner {
                        return Err(UsageError::WrongThread {
                            started: owner,
                            stopped: current,
                        });
                    }
                }
            }
        }

        if let Some(armed) = self.armed.take() {
            for token in armed.tokens {
                self.registry.detach(token);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_line() -> LineCallback {
        Arc::new(|_| {})
    }

    #[test]
    fn test_arm_disarm_releases_tokens() {
        let registry = Arc::new(HookRegistry::new());
        let mut manager = HookManager::new(Arc::clone(&registry));

        manager
            .arm(ThreadingMode::Multi, noop_line(), Some(Arc::new(|_| {})))
            .unwrap();
        assert!(manager.is_armed());
        assert_eq!(registry.attached_count(), 2);

        manager.disarm().unwrap();
        assert!(!manager.is_armed());
        assert_eq!(registry.attached_count(), 0);
    }

    #[test]
    fn test_alloc_tracing_rejected_in_single_mode() {
        let registry = Arc::new(HookRegistry::new());
        let mut manager = HookManager::new(registry);

        let err = manager
            .arm(ThreadingMode::Single, noop_line(), Some(Arc::new(|_| {})))
            .unwrap_err();
        assert_eq!(err, ConfigError::AllocationTracingUnsupported);
        assert!(!manager.is_armed());
    }

    #[test]
    fn test_disarm_when_idle_fails() {
        let registry = Arc::new(HookRegistry::new());
        let mut manager = HookManager::new(registry);
        assert_eq!(manager.disarm().unwrap_err(), UsageError::NotRunning);
    }

    #[test]
    fn test_single_mode_disarm_from_wrong_thread_fails() {
        let registry = Arc::new(HookRegistry::new());
        let mut manager = HookManager::new(Arc::clone(&registry));
        manager.arm(ThreadingMode::Single, noop_line(), None).unwrap();

        let manager = std::thread::spawn(move || {
            let err = manager.disarm().unwrap_err();
            assert!(matches!(err, UsageError::WrongThread { .. }));
            manager
        })
        .join()
        .unwrap();

        // Hooks are still attached; the owner never disarmed.
        assert!(manager.is_armed());
        assert_eq!(registry.attached_count(), 1);
    }
}
