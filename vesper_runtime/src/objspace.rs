//! Live-object storage with relocatable handles.
//!
//! The collector compacts this space: object slots move and any raw slot
//! position cached across an allocation point goes stale. `ObjHandle` is the
//! stable key — it survives compaction through an indirection table and is
//! re-resolved on every access via [`ObjectSpace::resolve`].
//!
//! Invariant for walkers: never reuse an object read across a call that can
//! trigger collection; re-resolve the handle instead.

use crate::class::ClassId;
use crate::code::CodeObject;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A live object reachable from the runtime heap.
#[derive(Debug, Clone)]
pub enum HeapObject {
    /// A compiled code unit.
    Code(Arc<CodeObject>),

    /// An instance of a class.
    Instance {
        /// The instantiated class.
        class: ClassId,
    },
}

impl HeapObject {
    /// Type-tag check: is this a compiled code unit?
    #[inline]
    pub fn is_code(&self) -> bool {
        matches!(self, HeapObject::Code(_))
    }
}

/// Stable handle to a live object.
///
/// Handles stay valid across compaction; raw slot positions do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjHandle(u32);

/// Interior state: slots plus the handle indirection table.
#[derive(Debug, Default)]
struct SpaceInner {
    /// Object slots. `None` marks a freed slot awaiting compaction.
    slots: Vec<Option<HeapObject>>,
    /// Handle id to current slot index.
    table: FxHashMap<u32, usize>,
    /// Counter for generating handle ids.
    next_id: u32,
}

/// Live-object storage.
#[derive(Debug, Default)]
pub struct ObjectSpace {
    inner: RwLock<SpaceInner>,
}

impl ObjectSpace {
    /// Create an empty object space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object, returning its stable handle.
    pub fn insert(&self, obj: HeapObject) -> ObjHandle {
        let mut inner = self.inner.write();
        let id = inner.next_id;
        inner.next_id += 1;
        let index = inner.slots.len();
        inner.slots.push(Some(obj));
        inner.table.insert(id, index);
        ObjHandle(id)
    }

    /// Re-acquire the object behind a handle.
    ///
    /// This is the only legal way to read after a potential relocation
    /// point. `None` when the object has been freed.
    pub fn resolve(&self, handle: ObjHandle) -> Option<HeapObject> {
        let inner = self.inner.read();
        let index = *inner.table.get(&handle.0)?;
        inner.slots.get(index)?.clone()
    }

    /// Free the object behind a handle.
    pub fn remove(&self, handle: ObjHandle) {
        let mut inner = self.inner.write();
        if let Some(index) = inner.table.remove(&handle.0) {
            if let Some(slot) = inner.slots.get_mut(index) {
                *slot = None;
            }
        }
    }

    /// Compact the space: move survivors down and remap the indirection
    /// table. Raw slot positions become invalid; handles stay valid.
    pub fn compact(&self) {
        let mut inner = self.inner.write();

        let mut survivors = Vec::with_capacity(inner.slots.len());
        let mut relocation: FxHashMap<usize, usize> = FxHashMap::default();
        for (old_index, slot) in inner.slots.iter_mut().enumerate() {
            if let Some(obj) = slot.take() {
                relocation.insert(old_index, survivors.len());
                survivors.push(Some(obj));
            }
        }
        inner.slots = survivors;

        let remapped: FxHashMap<u32, usize> = inner
            .table
            .iter()
            .filter_map(|(id, old_index)| relocation.get(old_index).map(|new| (*id, *new)))
            .collect();
        inner.table = remapped;
    }

    /// Snapshot the current live handles.
    ///
    /// The snapshot is taken once; by the time a handle is visited the
    /// object may have moved or died, so visitors must go through
    /// [`ObjectSpace::resolve`] per handle.
    pub fn handles(&self) -> Vec<ObjHandle> {
        self.inner.read().table.keys().map(|id| ObjHandle(*id)).collect()
    }

    /// Visit every live handle once.
    pub fn each_handle(&self, mut visitor: impl FnMut(ObjHandle)) {
        for handle in self.handles() {
            visitor(handle);
        }
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.inner.read().table.len()
    }

    /// Check if the space is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
