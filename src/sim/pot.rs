//! The pot: instances, merges and ripples behind one surface
//!
//! This is what the presentation layer talks to. Pointer handling feeds it
//! drag and tap events, the audio subsystem reports decoded buffers, the
//! async runtime hands back merge results, and a fixed-timestep loop calls
//! [`Pot::tick`]. Everything the view needs to animate comes out of
//! [`Pot::drain_events`].

use std::collections::{BTreeMap, HashSet};

use glam::Vec2;

use super::buffer_gate::BufferLoadGate;
use super::instance::{CreationOrigin, InstanceId, InstancePatch, SoundInstance};
use super::merge::{MergeCoordinator, MergeId, MergeOutcome, MergeTicket};
use super::registry::InstanceRegistry;
use super::ripple::{RippleCollision, RippleEngine, RippleId};
use crate::audio::{AudioBackend, BufferHandle};
use crate::error::MergeError;
use crate::settings::Settings;

/// Where a dragged instance was released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Inside the pot surface
    Pot,
    /// Anywhere outside the pot
    Outside,
    /// On the discard target; also cancels pending work for the instance
    Discard,
}

/// Things the view should react to
#[derive(Debug, Clone, PartialEq)]
pub enum PotEvent {
    InstanceAdded { id: InstanceId, origin: CreationOrigin },
    /// Buffer decoded; the instance can play and collide
    InstanceReady { id: InstanceId },
    InstanceRemoved { id: InstanceId },
    MergeStarted { merge: MergeId, placeholder: InstanceId, sources: (InstanceId, InstanceId) },
    MergeResolved { placeholder: InstanceId, sound: String },
    MergeAborted { placeholder: InstanceId },
    /// Microphone arm delay elapsed; capture into the placeholder may start
    RecordingArmed { id: InstanceId },
    RippleSpawned { ripple: RippleId, position: Vec2 },
    RippleFinished { ripple: RippleId },
    /// Scale-up + play cue for the instance
    RippleCollided(RippleCollision),
}

pub struct Pot<A: AudioBackend> {
    registry: InstanceRegistry,
    ripples: RippleEngine,
    merges: MergeCoordinator,
    /// Instances waiting for their buffer
    gate: BufferLoadGate<InstanceId>,
    audio: A,
    settings: Settings,
    /// Dragged instance -> instance it would merge with if dropped now
    preview: BTreeMap<InstanceId, InstanceId>,
    events: Vec<PotEvent>,
}

impl<A: AudioBackend> Pot<A> {
    pub fn new(audio: A, settings: Settings) -> Self {
        let mut pot = Self {
            registry: InstanceRegistry::new(),
            ripples: RippleEngine::new(settings.seed),
            merges: MergeCoordinator::new(),
            gate: BufferLoadGate::new(),
            audio,
            settings: Settings::default(),
            preview: BTreeMap::new(),
            events: Vec::new(),
        };
        pot.apply_settings(settings, &HashSet::new());
        pot
    }

    // === Instance lifecycle ===

    /// Put a new instance in the pot.
    ///
    /// It stays busy until its sound's buffer is decoded; without a sound it
    /// is a placeholder and stays busy until one is assigned.
    pub fn add(&mut self, sound: Option<&str>, position: Vec2, origin: CreationOrigin) -> InstanceId {
        let id = self.registry.add(sound.map(str::to_string), position, origin);
        self.events.push(PotEvent::InstanceAdded { id, origin });
        if let Some(sound) = sound {
            self.attach_buffer(id, sound);
        }
        id
    }

    /// Merge `patch` into an instance; false if it is gone
    pub fn update(&mut self, id: InstanceId, patch: InstancePatch) -> bool {
        self.registry.update(id, patch)
    }

    /// Remove an instance and stop its playback. Idempotent.
    pub fn remove(&mut self, id: InstanceId) -> bool {
        let Some(instance) = self.registry.remove(id) else {
            return false;
        };
        self.forget_instance(&instance);
        true
    }

    /// A library sound was deleted: drop every instance that references it
    pub fn remove_sound(&mut self, name: &str) -> usize {
        let removed = self.registry.remove_all_where_sound(name);
        for instance in &removed {
            self.forget_instance(instance);
        }
        if !removed.is_empty() {
            log::info!("Removed {} instance(s) of deleted sound \"{}\"", removed.len(), name);
        }
        removed.len()
    }

    pub fn bring_to_front(&mut self, id: InstanceId) -> Option<i32> {
        self.registry.bring_to_front(id)
    }

    fn forget_instance(&mut self, instance: &SoundInstance) {
        if let Some(handle) = instance.buffer {
            self.audio.stop(handle);
            // Handles are per instance, so nobody else waits on this one
            let _ = self.gate.forget(handle);
        }
        self.preview.remove(&instance.id);
        self.preview.retain(|_, candidate| *candidate != instance.id);
        self.events.push(PotEvent::InstanceRemoved { id: instance.id });
    }

    /// Load the instance's buffer and clear `loading` once it is decoded
    fn attach_buffer(&mut self, id: InstanceId, sound: &str) {
        let handle = self.audio.load_buffer(sound);
        self.registry.update(
            id,
            InstancePatch {
                buffer: Some(Some(handle)),
                ..Default::default()
            },
        );
        if self.audio.is_loaded(handle) {
            // Nothing can be waiting on a handle we just created
            let _ = self.gate.mark_loaded(handle);
        }
        if let Some(ready) = self.gate.notify_once_loaded(handle, id) {
            self.mark_ready(ready);
        }
    }

    /// The audio subsystem finished decoding `handle`
    pub fn buffer_loaded(&mut self, handle: BufferHandle) {
        for id in self.gate.mark_loaded(handle) {
            self.mark_ready(id);
        }
    }

    fn mark_ready(&mut self, id: InstanceId) {
        if self.registry.update(id, InstancePatch::loading(false)) {
            self.events.push(PotEvent::InstanceReady { id });
        }
    }

    // === Dragging ===

    /// User grabbed an instance
    pub fn drag_start(&mut self, id: InstanceId) -> bool {
        if self.registry.bring_to_front(id).is_none() {
            return false;
        }
        self.registry.update(id, InstancePatch::dragging(true));
        self.refresh_preview(id);
        true
    }

    /// Instance moved under the pointer
    pub fn drag_move(&mut self, id: InstanceId, position: Vec2) -> bool {
        if !self.registry.update(id, InstancePatch::position(position)) {
            self.preview.remove(&id);
            return false;
        }
        self.refresh_preview(id);
        true
    }

    fn refresh_preview(&mut self, id: InstanceId) {
        let dragging = self.registry.get(id).is_some_and(|inst| inst.dragging);
        match self.registry.drop_candidate(id) {
            Some(candidate) if dragging => {
                self.preview.insert(id, candidate);
            }
            _ => {
                self.preview.remove(&id);
            }
        }
    }

    /// Pairs that would merge if their dragged member were dropped now
    pub fn merge_preview(&self) -> Vec<(InstanceId, InstanceId)> {
        self.preview.iter().map(|(a, b)| (*a, *b)).collect()
    }

    /// User released an instance.
    ///
    /// Fixed order: (a) collision check and (b) merge-or-not for drops
    /// inside the pot, then (c) removal if the instance left the pot.
    /// Returns the ticket of a merge that must now be requested.
    pub fn drag_end(&mut self, id: InstanceId, position: Vec2, target: DropTarget) -> Option<MergeTicket> {
        self.preview.remove(&id);
        if !self.registry.update(
            id,
            InstancePatch {
                position: Some(position),
                dragging: Some(false),
                ..Default::default()
            },
        ) {
            return None;
        }

        let ticket = match target {
            DropTarget::Pot => self.merge_if_possible(id),
            DropTarget::Outside | DropTarget::Discard => None,
        };

        match target {
            DropTarget::Pot => {}
            DropTarget::Outside => {
                self.remove(id);
            }
            DropTarget::Discard => {
                self.discard(id);
            }
        }
        ticket
    }

    // === Merging ===

    /// Start merging `id` with the first instance it overlaps, if any
    pub fn merge_if_possible(&mut self, id: InstanceId) -> Option<MergeTicket> {
        let start = self.merges.merge_if_possible(&mut self.registry, id)?;
        let (first, second) = &start.consumed;
        self.forget_instance(first);
        self.forget_instance(second);

        let ticket = start.ticket;
        self.events.push(PotEvent::InstanceAdded {
            id: ticket.placeholder,
            origin: CreationOrigin::Merge,
        });
        self.events.push(PotEvent::MergeStarted {
            merge: ticket.id,
            placeholder: ticket.placeholder,
            sources: ticket.sources,
        });
        Some(ticket)
    }

    /// Apply the merge service's answer for `ticket`
    pub fn complete_merge(&mut self, ticket: &MergeTicket, result: Result<String, MergeError>) -> MergeOutcome {
        let placeholder = ticket.placeholder;
        let was_present = self.registry.contains(placeholder);
        let outcome = self.merges.complete(&mut self.registry, ticket, result);

        match &outcome {
            MergeOutcome::Resolved { sound, .. } => {
                self.events.push(PotEvent::MergeResolved {
                    placeholder,
                    sound: sound.clone(),
                });
                self.attach_buffer(placeholder, sound);
            }
            MergeOutcome::Aborted { .. } => {
                if was_present {
                    self.events.push(PotEvent::InstanceRemoved { id: placeholder });
                }
                self.events.push(PotEvent::MergeAborted { placeholder });
            }
            MergeOutcome::Discarded { .. } | MergeOutcome::Stale { .. } => {}
        }
        outcome
    }

    /// Whether `id` is a placeholder waiting on a merge
    pub fn is_merging(&self, id: InstanceId) -> bool {
        self.merges.is_pending_placeholder(id)
    }

    pub fn merges(&self) -> &MergeCoordinator {
        &self.merges
    }

    // === Pending placeholders (recordings, downloads) ===

    /// Soundless placeholder for work that will produce a sound later
    pub fn create_pending(&mut self, position: Vec2, origin: CreationOrigin) -> InstanceId {
        self.add(None, position, origin)
    }

    /// Give a pending placeholder its sound.
    ///
    /// No-op (false) if the placeholder was removed meanwhile or already has
    /// a sound.
    pub fn fulfil_pending(&mut self, id: InstanceId, sound: &str) -> bool {
        let waiting = self.registry.get(id).is_some_and(|inst| inst.sound.is_none());
        if !waiting || !self.registry.update(id, InstancePatch::sound(sound)) {
            return false;
        }
        self.attach_buffer(id, sound);
        true
    }

    /// The microphone arm delay for recording placeholder `id` elapsed.
    ///
    /// False (and no event) if the placeholder was discarded meanwhile or
    /// is not a recording still waiting for its sound.
    pub fn arm_recording(&mut self, id: InstanceId) -> bool {
        let waiting = self
            .registry
            .get(id)
            .is_some_and(|inst| inst.origin == CreationOrigin::Recording && inst.sound.is_none());
        if waiting {
            log::info!("Recording {} armed", id);
            self.events.push(PotEvent::RecordingArmed { id });
        }
        waiting
    }

    /// Throw an instance away, cancelling the merge it is waiting on.
    ///
    /// Returns the cancelled merge so the caller can abort its request.
    pub fn discard(&mut self, id: InstanceId) -> Option<MergeId> {
        let cancelled = self.merges.cancel(id);
        if self.remove(id) && cancelled.is_some() {
            self.events.push(PotEvent::MergeAborted { placeholder: id });
        }
        cancelled
    }

    // === Ripples ===

    /// User tapped the empty surface
    pub fn tap(&mut self, position: Vec2) -> RippleId {
        let ripple = self.ripples.spawn(position);
        self.events.push(PotEvent::RippleSpawned { ripple, position });
        ripple
    }

    /// Pot bounding box changed
    pub fn resize(&mut self, width: f32, height: f32) {
        self.ripples.set_bounds(width, height);
    }

    pub fn subscribe_ripples(&mut self) -> tokio::sync::mpsc::UnboundedReceiver<RippleCollision> {
        self.ripples.subscribe()
    }

    pub fn ripples(&self) -> &RippleEngine {
        &self.ripples
    }

    // === Simulation ===

    /// Advance ripples and the ripple timer by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        let tick = self.ripples.tick(dt, &self.registry);

        for collision in tick.collisions {
            self.events.push(PotEvent::RippleCollided(collision));
            let handle = self
                .registry
                .get(collision.instance)
                .and_then(|inst| inst.buffer);
            if let Some(handle) = handle
                && self.gate.is_loaded(handle)
            {
                self.audio.play(handle);
            }
        }
        for ripple in tick.finished {
            self.events.push(PotEvent::RippleFinished { ripple });
        }
        for ripple in tick.spawned {
            let position = self.ripples.get(ripple).map(|r| r.position).unwrap_or_default();
            self.events.push(PotEvent::RippleSpawned { ripple, position });
        }
    }

    // === Settings ===

    /// Apply new settings.
    ///
    /// With explicit content disallowed, every instance of a sound in
    /// `explicit_sounds` leaves the pot.
    pub fn apply_settings(&mut self, settings: Settings, explicit_sounds: &HashSet<String>) {
        let settings = settings.sanitized();
        self.ripples.set_interval(settings.ripple_interval_secs);
        self.ripples.set_duration(settings.ripple_duration_secs);
        if settings.effective_auto_ripples() != self.ripples.auto_spawn() {
            self.ripples.set_auto_spawn(settings.effective_auto_ripples());
        }

        if !settings.allow_explicit {
            let removed = self.registry.remove_all_where(|inst| {
                inst.sound
                    .as_ref()
                    .is_some_and(|sound| explicit_sounds.contains(sound))
            });
            for instance in &removed {
                self.forget_instance(instance);
            }
            if !removed.is_empty() {
                log::info!("Removed {} explicit instance(s)", removed.len());
            }
        }
        self.settings = settings;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // === Accessors ===

    pub fn registry(&self) -> &InstanceRegistry {
        &self.registry
    }

    pub fn get(&self, id: InstanceId) -> Option<&SoundInstance> {
        self.registry.get(id)
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    /// Take every event produced since the last call
    pub fn drain_events(&mut self) -> Vec<PotEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::LogAudio;

    fn quiet_settings() -> Settings {
        Settings {
            auto_ripples: false,
            ..Settings::default()
        }
    }

    fn pot() -> Pot<LogAudio> {
        Pot::new(LogAudio::new(), quiet_settings())
    }

    #[test]
    fn test_add_with_loaded_buffer_is_ready() {
        let mut pot = pot();
        let id = pot.add(Some("rain.wav"), Vec2::ZERO, CreationOrigin::Library);
        assert!(pot.get(id).is_some_and(|i| !i.busy()));
        let events = pot.drain_events();
        assert_eq!(
            events,
            vec![
                PotEvent::InstanceAdded { id, origin: CreationOrigin::Library },
                PotEvent::InstanceReady { id },
            ]
        );
    }

    #[test]
    fn test_busy_until_buffer_loaded() {
        let mut pot = Pot::new(LogAudio::deferred(), quiet_settings());
        let id = pot.add(Some("rain.wav"), Vec2::ZERO, CreationOrigin::Library);
        assert!(pot.get(id).is_some_and(|i| i.busy()));

        let handle = pot.get(id).and_then(|i| i.buffer).expect("buffer requested");
        pot.buffer_loaded(handle);
        assert!(pot.get(id).is_some_and(|i| !i.busy()));
    }

    #[test]
    fn test_drag_end_merges_overlapping_pair() {
        let mut pot = pot();
        let a = pot.add(Some("a.wav"), Vec2::new(0.0, 0.0), CreationOrigin::Library);
        let b = pot.add(Some("b.wav"), Vec2::new(200.0, 0.0), CreationOrigin::Library);

        assert!(pot.drag_start(b));
        pot.drag_move(b, Vec2::new(60.0, 0.0));
        assert_eq!(pot.merge_preview(), vec![(b, a)]);

        let ticket = pot.drag_end(b, Vec2::new(60.0, 0.0), DropTarget::Pot).expect("merge started");
        assert_eq!(ticket.sources, (b, a));
        assert_eq!(pot.registry().ids(), vec![ticket.placeholder]);
        assert_eq!(pot.get(ticket.placeholder).map(|p| p.position), Some(Vec2::new(30.0, 0.0)));
        assert!(pot.merge_preview().is_empty());
        assert!(pot.is_merging(ticket.placeholder));

        let outcome = pot.complete_merge(&ticket, Ok("ab.wav".into()));
        assert!(matches!(outcome, MergeOutcome::Resolved { .. }));
        let merged = pot.get(ticket.placeholder).expect("placeholder kept");
        assert_eq!(merged.sound.as_deref(), Some("ab.wav"));
        assert!(!merged.busy());
    }

    #[test]
    fn test_failed_merge_leaves_nothing() {
        let mut pot = pot();
        pot.add(Some("a.wav"), Vec2::new(0.0, 0.0), CreationOrigin::Library);
        let b = pot.add(Some("b.wav"), Vec2::new(60.0, 0.0), CreationOrigin::Library);
        let ticket = pot.drag_end(b, Vec2::new(60.0, 0.0), DropTarget::Pot).expect("merge started");
        pot.drain_events();

        pot.complete_merge(&ticket, Err(MergeError::NoResult));
        assert!(pot.registry().is_empty());
        assert_eq!(
            pot.drain_events(),
            vec![
                PotEvent::InstanceRemoved { id: ticket.placeholder },
                PotEvent::MergeAborted { placeholder: ticket.placeholder },
            ]
        );
    }

    #[test]
    fn test_placeholder_dragged_out_before_answer() {
        let mut pot = pot();
        pot.add(Some("a.wav"), Vec2::new(0.0, 0.0), CreationOrigin::Library);
        let b = pot.add(Some("b.wav"), Vec2::new(60.0, 0.0), CreationOrigin::Library);
        let ticket = pot.drag_end(b, Vec2::new(60.0, 0.0), DropTarget::Pot).expect("merge started");

        pot.drag_start(ticket.placeholder);
        assert!(pot.drag_end(ticket.placeholder, Vec2::new(-500.0, 0.0), DropTarget::Outside).is_none());

        let outcome = pot.complete_merge(&ticket, Ok("ab.wav".into()));
        assert!(matches!(outcome, MergeOutcome::Discarded { .. }));
        assert!(pot.registry().is_empty());
    }

    #[test]
    fn test_discard_cancels_merge() {
        let mut pot = pot();
        pot.add(Some("a.wav"), Vec2::new(0.0, 0.0), CreationOrigin::Library);
        let b = pot.add(Some("b.wav"), Vec2::new(60.0, 0.0), CreationOrigin::Library);
        let ticket = pot.drag_end(b, Vec2::new(60.0, 0.0), DropTarget::Pot).expect("merge started");

        pot.drag_start(ticket.placeholder);
        pot.drag_end(ticket.placeholder, Vec2::ZERO, DropTarget::Discard);
        assert!(!pot.is_merging(ticket.placeholder));

        let outcome = pot.complete_merge(&ticket, Ok("ab.wav".into()));
        assert_eq!(outcome, MergeOutcome::Stale { placeholder: ticket.placeholder });
        assert!(pot.registry().is_empty());
    }

    #[test]
    fn test_drop_outside_removes_and_stops() {
        let mut pot = pot();
        let a = pot.add(Some("a.wav"), Vec2::ZERO, CreationOrigin::Library);
        let handle = pot.get(a).and_then(|i| i.buffer).expect("buffer");
        pot.drag_start(a);
        assert!(pot.drag_end(a, Vec2::new(-10.0, 0.0), DropTarget::Outside).is_none());
        assert!(pot.registry().is_empty());
        assert_eq!(pot.audio().stopped, vec![handle]);
    }

    #[test]
    fn test_drop_outside_never_merges() {
        let mut pot = pot();
        pot.add(Some("a.wav"), Vec2::ZERO, CreationOrigin::Library);
        let b = pot.add(Some("b.wav"), Vec2::new(10.0, 0.0), CreationOrigin::Library);
        assert!(pot.drag_end(b, Vec2::new(10.0, 0.0), DropTarget::Outside).is_none());
        assert_eq!(pot.registry().len(), 1);
    }

    #[test]
    fn test_loading_instance_does_not_merge() {
        let mut pot = Pot::new(LogAudio::deferred(), quiet_settings());
        pot.add(Some("a.wav"), Vec2::ZERO, CreationOrigin::Library);
        let b = pot.add(Some("b.wav"), Vec2::new(10.0, 0.0), CreationOrigin::Library);
        assert!(pot.drag_end(b, Vec2::new(10.0, 0.0), DropTarget::Pot).is_none());
        assert_eq!(pot.registry().len(), 2);
    }

    #[test]
    fn test_remove_sound_clears_references() {
        let mut pot = pot();
        pot.add(Some("rain.wav"), Vec2::ZERO, CreationOrigin::Library);
        pot.add(Some("rain.wav"), Vec2::new(300.0, 0.0), CreationOrigin::Library);
        let keep = pot.add(Some("bell.wav"), Vec2::new(600.0, 0.0), CreationOrigin::Library);

        assert_eq!(pot.remove_sound("rain.wav"), 2);
        assert_eq!(pot.registry().ids(), vec![keep]);
        assert!(pot.registry().iter().all(|i| i.sound.as_deref() != Some("rain.wav")));
    }

    #[test]
    fn test_pending_placeholder_lifecycle() {
        let mut pot = pot();
        let rec = pot.create_pending(Vec2::new(5.0, 5.0), CreationOrigin::Recording);
        assert!(pot.get(rec).is_some_and(|i| i.busy() && i.sound.is_none()));

        assert!(pot.fulfil_pending(rec, "recording-1.wav"));
        assert!(pot.get(rec).is_some_and(|i| !i.busy()));
        assert!(!pot.fulfil_pending(rec, "recording-2.wav"));

        let gone = pot.create_pending(Vec2::ZERO, CreationOrigin::Download);
        pot.discard(gone);
        assert!(!pot.fulfil_pending(gone, "download.wav"));
        assert!(!pot.registry().contains(gone));
    }

    #[test]
    fn test_arm_recording_only_while_waiting() {
        let mut pot = pot();
        let rec = pot.create_pending(Vec2::ZERO, CreationOrigin::Recording);
        let download = pot.create_pending(Vec2::new(300.0, 0.0), CreationOrigin::Download);
        pot.drain_events();

        assert!(pot.arm_recording(rec));
        assert_eq!(pot.drain_events(), vec![PotEvent::RecordingArmed { id: rec }]);
        assert!(!pot.arm_recording(download));

        pot.discard(rec);
        assert!(!pot.arm_recording(rec));
    }

    #[test]
    fn test_tiny_ripple_interval_does_not_stall_tick() {
        let settings = Settings::from_json(r#"{"ripple_interval_secs": 1e-30}"#).expect("valid json");
        let mut pot = Pot::new(LogAudio::new(), settings);
        for _ in 0..120 {
            pot.tick(crate::consts::SIM_DT);
        }
        assert!(pot.ripples().len() <= 11);
        assert!(!pot.ripples().is_empty());
    }

    #[test]
    fn test_ripple_plays_touched_instance() {
        let mut pot = pot();
        let id = pot.add(Some("a.wav"), Vec2::new(100.0, 100.0), CreationOrigin::Library);
        let handle = pot.get(id).and_then(|i| i.buffer).expect("buffer");
        let mut rx = pot.subscribe_ripples();

        let ripple = pot.tap(Vec2::new(110.0, 100.0));
        pot.tick(crate::consts::SIM_DT);

        assert_eq!(pot.audio().played, vec![handle]);
        assert_eq!(rx.try_recv().ok(), Some(RippleCollision { ripple, instance: id }));
        assert!(
            pot.drain_events()
                .contains(&PotEvent::RippleCollided(RippleCollision { ripple, instance: id }))
        );
    }

    #[test]
    fn test_ripple_skips_dragged_instance() {
        let mut pot = pot();
        let id = pot.add(Some("a.wav"), Vec2::new(100.0, 100.0), CreationOrigin::Library);
        pot.drag_start(id);
        pot.tap(Vec2::new(110.0, 100.0));
        pot.tick(crate::consts::SIM_DT);
        assert!(pot.audio().played.is_empty());
    }

    #[test]
    fn test_disallowing_explicit_removes_instances() {
        let mut pot = pot();
        pot.add(Some("swear.wav"), Vec2::ZERO, CreationOrigin::Library);
        let keep = pot.add(Some("bird.wav"), Vec2::new(400.0, 0.0), CreationOrigin::Library);
        let explicit: HashSet<String> = ["swear.wav".to_string()].into_iter().collect();

        pot.apply_settings(quiet_settings(), &explicit);
        assert_eq!(pot.registry().len(), 2);

        let strict = Settings {
            allow_explicit: false,
            ..quiet_settings()
        };
        pot.apply_settings(strict, &explicit);
        assert_eq!(pot.registry().ids(), vec![keep]);
        assert!(!pot.settings().allow_explicit);
    }

    #[test]
    fn test_timer_ripples_reported() {
        let mut pot = Pot::new(
            LogAudio::new(),
            Settings {
                ripple_interval_secs: 1.0,
                ..Settings::default()
            },
        );
        pot.resize(100.0, 100.0);
        pot.tick(1.0);
        let spawned: Vec<_> = pot
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, PotEvent::RippleSpawned { .. }))
            .collect();
        assert_eq!(spawned.len(), 1);
    }
}
