//! "Is this buffer ready to play" bookkeeping
//!
//! Callers register a waiter per buffer handle; when the audio subsystem
//! reports the buffer as decoded, every waiter is released exactly once.
//! Waiters are returned to the caller rather than invoked here, so the
//! caller can apply them with whatever mutable state it owns.

use std::collections::{HashMap, HashSet};

use crate::audio::BufferHandle;

#[derive(Debug)]
pub struct BufferLoadGate<W> {
    loaded: HashSet<BufferHandle>,
    pending: HashMap<BufferHandle, Vec<W>>,
}

impl<W> Default for BufferLoadGate<W> {
    fn default() -> Self {
        Self {
            loaded: HashSet::new(),
            pending: HashMap::new(),
        }
    }
}

impl<W> BufferLoadGate<W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self, handle: BufferHandle) -> bool {
        self.loaded.contains(&handle)
    }

    /// Register `waiter` for `handle`.
    ///
    /// Returns the waiter straight back if the buffer is already loaded;
    /// otherwise it is queued and returned later by [`Self::mark_loaded`].
    #[must_use]
    pub fn notify_once_loaded(&mut self, handle: BufferHandle, waiter: W) -> Option<W> {
        if self.is_loaded(handle) {
            return Some(waiter);
        }
        self.pending.entry(handle).or_default().push(waiter);
        None
    }

    /// Record that `handle` finished decoding and release its waiters.
    ///
    /// Later calls for the same handle release nothing.
    pub fn mark_loaded(&mut self, handle: BufferHandle) -> Vec<W> {
        self.loaded.insert(handle);
        self.pending.remove(&handle).unwrap_or_default()
    }

    /// Drop all bookkeeping for `handle` (its sound left the library)
    pub fn forget(&mut self, handle: BufferHandle) -> Vec<W> {
        self.loaded.remove(&handle);
        self.pending.remove(&handle).unwrap_or_default()
    }

    /// Number of waiters still queued across all buffers
    pub fn pending_count(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }
}
