//! Audio decode/playback contract
//!
//! The pot never touches samples. It asks the backend for a buffer handle
//! per sound, waits for the backend to report that handle as decoded, and
//! starts/stops playback by handle.

use serde::{Deserialize, Serialize};

/// Opaque reference to a (possibly still decoding) audio buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BufferHandle(pub u32);

/// Audio subsystem as seen by the pot
pub trait AudioBackend {
    /// Start loading the buffer for a library sound.
    ///
    /// Completion is reported back through
    /// [`Pot::buffer_loaded`](crate::sim::Pot::buffer_loaded). A backend may
    /// report it before returning (cached buffers) by returning `true` from
    /// [`AudioBackend::is_loaded`].
    fn load_buffer(&mut self, sound: &str) -> BufferHandle;

    /// Whether the buffer has already finished decoding
    fn is_loaded(&self, handle: BufferHandle) -> bool;

    /// Start playing the buffer from the beginning
    fn play(&mut self, handle: BufferHandle);

    /// Stop playback of the buffer
    fn stop(&mut self, handle: BufferHandle);
}

/// Backend that only logs what it would do.
///
/// Buffers are handed out sequentially and reported as loaded immediately.
/// Used by the native binary and in tests.
#[derive(Debug, Default)]
pub struct LogAudio {
    next_handle: u32,
    /// Every `play` call, in order (newest last)
    pub played: Vec<BufferHandle>,
    /// Every `stop` call, in order (newest last)
    pub stopped: Vec<BufferHandle>,
    /// Loads stay pending until `buffer_loaded` is reported externally
    pub deferred_loading: bool,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose buffers only count as loaded once reported
    pub fn deferred() -> Self {
        Self {
            deferred_loading: true,
            ..Self::default()
        }
    }
}

impl AudioBackend for LogAudio {
    fn load_buffer(&mut self, sound: &str) -> BufferHandle {
        let handle = BufferHandle(self.next_handle);
        self.next_handle += 1;
        log::debug!("Loading buffer {:?} for sound \"{}\"", handle, sound);
        handle
    }

    fn is_loaded(&self, _handle: BufferHandle) -> bool {
        !self.deferred_loading
    }

    fn play(&mut self, handle: BufferHandle) {
        log::debug!("Play {:?}", handle);
        self.played.push(handle);
    }

    fn stop(&mut self, handle: BufferHandle) {
        log::debug!("Stop {:?}", handle);
        self.stopped.push(handle);
    }
}
