//! Authoritative instance store
//!
//! The registry is the only writer of instance state. Every operation that
//! names an id tolerates that id having vanished in the meantime: async
//! completions routinely land after the user removed their instance.

use std::collections::BTreeMap;

use glam::Vec2;

use super::geometry::circles_overlap;
use super::instance::{CreationOrigin, InstanceId, InstancePatch, SoundInstance};
use super::zorder::ZOrderAllocator;

/// Mapping of id -> instance, plus the id counter and z-order state.
///
/// Ids only grow, so iterating the map by key is insertion order.
#[derive(Debug, Clone, Default)]
pub struct InstanceRegistry {
    instances: BTreeMap<InstanceId, SoundInstance>,
    next_id: InstanceId,
    z_order: ZOrderAllocator,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new instance ID
    fn next_instance_id(&mut self) -> InstanceId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert a new instance and return its id.
    ///
    /// New instances start busy: they have no decoded buffer yet.
    pub fn add(&mut self, sound: Option<String>, position: Vec2, origin: CreationOrigin) -> InstanceId {
        let id = self.next_instance_id();
        self.instances
            .insert(id, SoundInstance::new(id, sound, position, origin));
        id
    }

    /// Merge `patch` into the instance. Returns false if it no longer exists.
    pub fn update(&mut self, id: InstanceId, patch: InstancePatch) -> bool {
        match self.instances.get_mut(&id) {
            Some(instance) => {
                patch.apply_to(instance);
                true
            }
            None => false,
        }
    }

    /// Delete an instance. Idempotent.
    pub fn remove(&mut self, id: InstanceId) -> Option<SoundInstance> {
        self.instances.remove(&id)
    }

    /// Remove every instance matching `predicate`, returning them in id order
    pub fn remove_all_where(&mut self, mut predicate: impl FnMut(&SoundInstance) -> bool) -> Vec<SoundInstance> {
        let doomed: Vec<InstanceId> = self
            .instances
            .values()
            .filter(|inst| predicate(inst))
            .map(|inst| inst.id)
            .collect();
        doomed
            .into_iter()
            .filter_map(|id| self.instances.remove(&id))
            .collect()
    }

    /// Remove every instance referencing the library sound `name`
    pub fn remove_all_where_sound(&mut self, name: &str) -> Vec<SoundInstance> {
        self.remove_all_where(|inst| inst.sound.as_deref() == Some(name))
    }

    /// Raise the instance above everything raised before it
    pub fn bring_to_front(&mut self, id: InstanceId) -> Option<i32> {
        let current = self.instances.get(&id)?.z_index;
        let z_index = self.z_order.allocate(current);
        self.update(id, InstancePatch::z_index(z_index));
        Some(z_index)
    }

    /// Present and not busy
    pub fn eligible_for_collision(&self, id: InstanceId) -> bool {
        self.instances.get(&id).is_some_and(|inst| !inst.busy())
    }

    /// Every other eligible instance overlapping `id`, in registry order.
    ///
    /// Empty if `id` itself is absent or busy.
    pub fn colliding_with(&self, id: InstanceId) -> Vec<InstanceId> {
        match self.instances.get(&id) {
            Some(subject) if !subject.busy() => self.overlapping(subject),
            _ => Vec::new(),
        }
    }

    /// Merge partner for `id`: the first colliding instance in registry order
    pub fn first_colliding(&self, id: InstanceId) -> Option<InstanceId> {
        self.colliding_with(id).into_iter().next()
    }

    /// Merge partner `id` would get if it were dropped right now.
    ///
    /// Ignores the subject's own dragging flag (it is being held) but still
    /// requires its buffer to be loaded.
    pub fn drop_candidate(&self, id: InstanceId) -> Option<InstanceId> {
        let subject = self.instances.get(&id)?;
        if subject.loading {
            return None;
        }
        self.overlapping(subject).into_iter().next()
    }

    fn overlapping(&self, subject: &SoundInstance) -> Vec<InstanceId> {
        let circle = subject.circle();
        self.instances
            .values()
            .filter(|other| other.id != subject.id && !other.busy())
            .filter(|other| circles_overlap(&circle, &other.circle()))
            .map(|other| other.id)
            .collect()
    }

    /// Atomically consume two instances and insert one in their place.
    ///
    /// Returns the two removed instances and the id of the new one, or `None`
    /// (with nothing changed) if either source is missing or they are the
    /// same instance.
    pub fn replace_pair(
        &mut self,
        a: InstanceId,
        b: InstanceId,
        sound: Option<String>,
        position: impl FnOnce(&SoundInstance, &SoundInstance) -> Vec2,
        origin: CreationOrigin,
    ) -> Option<(SoundInstance, SoundInstance, InstanceId)> {
        if a == b || !self.instances.contains_key(&a) || !self.instances.contains_key(&b) {
            return None;
        }
        let first = self.instances.remove(&a)?;
        let second = self.instances.remove(&b)?;
        let position = position(&first, &second);
        let id = self.add(sound, position, origin);
        Some((first, second, id))
    }

    pub fn get(&self, id: InstanceId) -> Option<&SoundInstance> {
        self.instances.get(&id)
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.instances.contains_key(&id)
    }

    /// Instances in id order
    pub fn iter(&self) -> impl Iterator<Item = &SoundInstance> {
        self.instances.values()
    }

    pub fn ids(&self) -> Vec<InstanceId> {
        self.instances.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Highest z-index handed out so far
    pub fn top_z_index(&self) -> i32 {
        self.z_order.current_max()
    }
}
