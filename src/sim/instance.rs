//! Sound instance types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Circle;
use crate::audio::BufferHandle;

/// Instance identifier. Assigned monotonically, never reused.
pub type InstanceId = u32;

/// How an instance came into the pot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CreationOrigin {
    /// Picked from the sound library
    #[default]
    Library,
    /// Placeholder for a merge of two instances
    Merge,
    /// Placeholder for a microphone recording
    Recording,
    /// Placeholder for an external sample download
    Download,
}

/// A single draggable, playable occurrence of a sound in the pot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundInstance {
    pub id: InstanceId,
    /// Library sound name; `None` while a merge/recording/download is in flight
    pub sound: Option<String>,
    pub position: Vec2,
    pub z_index: i32,
    /// Backing buffer not decoded yet (or no sound at all)
    pub loading: bool,
    /// User is holding the instance
    pub dragging: bool,
    /// Buffer backing `sound`, once requested
    pub buffer: Option<BufferHandle>,
    pub origin: CreationOrigin,
}

impl SoundInstance {
    pub fn new(id: InstanceId, sound: Option<String>, position: Vec2, origin: CreationOrigin) -> Self {
        Self {
            id,
            sound,
            position,
            z_index: 0,
            loading: true,
            dragging: false,
            buffer: None,
            origin,
        }
    }

    /// Excluded from every collision query while true
    #[inline]
    pub fn busy(&self) -> bool {
        self.loading || self.dragging
    }

    /// Collision footprint
    pub fn circle(&self) -> Circle {
        Circle::instance(self.position)
    }

    fn apply(&mut self, patch: InstancePatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(sound) = patch.sound {
            self.sound = sound;
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = z_index;
        }
        if let Some(loading) = patch.loading {
            self.loading = loading;
        }
        if let Some(dragging) = patch.dragging {
            self.dragging = dragging;
        }
        if let Some(buffer) = patch.buffer {
            self.buffer = buffer;
        }
    }
}

/// Partial update merged into an existing instance.
///
/// `None` leaves a field untouched. Double options clear the field when
/// set to `Some(None)`.
#[derive(Debug, Clone, Default)]
pub struct InstancePatch {
    pub position: Option<Vec2>,
    pub sound: Option<Option<String>>,
    pub z_index: Option<i32>,
    pub loading: Option<bool>,
    pub dragging: Option<bool>,
    pub buffer: Option<Option<BufferHandle>>,
}

impl InstancePatch {
    pub fn position(position: Vec2) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn sound(sound: impl Into<String>) -> Self {
        Self {
            sound: Some(Some(sound.into())),
            ..Default::default()
        }
    }

    pub fn z_index(z_index: i32) -> Self {
        Self {
            z_index: Some(z_index),
            ..Default::default()
        }
    }

    pub fn dragging(dragging: bool) -> Self {
        Self {
            dragging: Some(dragging),
            ..Default::default()
        }
    }

    pub fn loading(loading: bool) -> Self {
        Self {
            loading: Some(loading),
            ..Default::default()
        }
    }

    pub(crate) fn apply_to(self, instance: &mut SoundInstance) {
        instance.apply(self);
    }
}
