//! Process-wide instrumentation hook registry.
//!
//! Two event kinds are observable:
//!
//! - **Line events**: the interpreter reports every executed source line.
//!   Callbacks attach globally (all threads) or pinned to one thread.
//! - **Allocation events**: object construction reports the instantiated
//!   class. Global only.
//!
//! Hooks fire synchronously, inline with the instrumented program on the
//! executing thread — never queued or deferred. Each attach returns a
//! `HookToken`; detaching releases it exactly once. There is no
//! per-subscriber isolation: two global subscribers both see all events.
//!
//! Attaching or detaching from inside a firing hook is not supported.

use crate::class::ClassId;
use dashmap::DashMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::ThreadId;

/// A line-execution event.
#[derive(Debug, Clone)]
pub struct LineEvent {
    /// Absolute path of the file owning the executed line.
    pub path: Arc<str>,
    /// Executed line number.
    pub line: u32,
}

/// An object-creation event.
#[derive(Debug, Clone)]
pub struct AllocEvent {
    /// The instantiated class.
    pub class: ClassId,
    /// The class name as the runtime prints it.
    pub class_name: Arc<str>,
}

/// Callback invoked on each line event.
pub type LineCallback = Arc<dyn Fn(&LineEvent) + Send + Sync>;

/// Callback invoked on each allocation event.
pub type AllocCallback = Arc<dyn Fn(&AllocEvent) + Send + Sync>;

/// Resource handle for one attached hook. Released by
/// [`HookRegistry::detach`], exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookToken(u64);

/// Where a token's hook lives, so detach knows which table to touch.
#[derive(Debug, Clone, Copy)]
enum TokenSite {
    GlobalLine,
    ThreadLine(ThreadId),
    GlobalAlloc,
}

/// Process-wide hook tables.
pub struct HookRegistry {
    /// Line hooks observing every thread.
    global_line: RwLock<Vec<(u64, LineCallback)>>,
    /// Line hooks pinned to a single thread.
    thread_line: DashMap<ThreadId, Vec<(u64, LineCallback)>>,
    /// Allocation hooks (always global).
    global_alloc: RwLock<Vec<(u64, AllocCallback)>>,
    /// Token bookkeeping for detach.
    sites: RwLock<FxHashMap<u64, TokenSite>>,
    /// Counter for generating tokens.
    next_token: AtomicU64,
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            global_line: RwLock::new(Vec::new()),
            thread_line: DashMap::new(),
            global_alloc: RwLock::new(Vec::new()),
            sites: RwLock::new(FxHashMap::default()),
            next_token: AtomicU64::new(1),
        }
    }

    fn allocate_token(&self, site: TokenSite) -> HookToken {
        let id = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.sites.write().insert(id, site);
        HookToken(id)
    }

    /// Attach a line hook observing all threads.
    pub fn attach_line_global(&self, callback: LineCallback) -> HookToken {
        let token = self.allocate_token(TokenSite::GlobalLine);
        self.global_line.write().push((token.0, callback));
        token
    }

    /// Attach a line hook observing a single thread.
    pub fn attach_line_thread(&self, thread: ThreadId, callback: LineCallback) -> HookToken {
        let token = self.allocate_token(TokenSite::ThreadLine(thread));
        self.thread_line.entry(thread).or_default().push((token.0, callback));
        token
    }

    /// Attach an allocation hook (global).
    pub fn attach_alloc(&self, callback: AllocCallback) -> HookToken {
        let token = self.allocate_token(TokenSite::GlobalAlloc);
        self.global_alloc.write().push((token.0, callback));
        token
    }

    /// Detach a hook. Returns `false` when the token was already released.
    pub fn detach(&self, token: HookToken) -> bool {
        let site = match self.sites.write().remove(&token.0) {
            Some(site) => site,
            None => return false,
        };

        match site {
            TokenSite::GlobalLine => {
                self.global_line.write().retain(|(id, _)| *id != token.0);
            }
            TokenSite::ThreadLine(thread) => {
                if let Some(mut entry) = self.thread_line.get_mut(&thread) {
                    entry.retain(|(id, _)| *id != token.0);
                }
            }
            TokenSite::GlobalAlloc => {
                self.global_alloc.write().retain(|(id, _)| *id != token.0);
            }
        }
        true
    }

    /// Dispatch a line event from the current thread.
    ///
    /// Called by the interpreter after each executed line; runs every
    /// global hook plus the hooks pinned to the dispatching thread.
    pub fn dispatch_line(&self, event: &LineEvent) {
        for (_, callback) in self.global_line.read().iter() {
            callback(event);
        }
        if let Some(entry) = self.thread_line.get(&std::thread::current().id()) {
            for (_, callback) in entry.iter() {
                callback(event);
            }
        }
    }

    /// Dispatch an allocation event.
    pub fn dispatch_alloc(&self, event: &AllocEvent) {
        for (_, callback) in self.global_alloc.read().iter() {
            callback(event);
        }
    }

    /// Number of currently attached hooks.
    pub fn attached_count(&self) -> usize {
        self.sites.read().len()
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("attached", &self.attached_count())
            .finish()
    }
}
