//! Optimistic merge protocol
//!
//! A merge is started synchronously: both sources are consumed and a
//! soundless placeholder appears at their midpoint in a single registry
//! mutation. The external merge request then runs without blocking the
//! registry. Its result is reconciled against whatever the registry looks
//! like by then:
//!
//! ```text
//! IDLE -> PLACEHOLDER_CREATED -> RESOLVED   (sound assigned, or discarded if
//!                                            the placeholder is gone)
//!                             -> ABORTED    (request failed or cancelled;
//!                                            placeholder removed)
//! ```

use std::collections::BTreeMap;

use super::instance::{CreationOrigin, InstanceId, InstancePatch, SoundInstance};
use super::registry::InstanceRegistry;
use crate::error::MergeError;
use crate::midpoint;

/// Merge attempt identifier, unique per coordinator
pub type MergeId = u32;

/// Lifecycle of one merge attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePhase {
    Idle,
    PlaceholderCreated,
    Resolved,
    Aborted,
}

/// Everything needed to issue the external request for a started merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeTicket {
    pub id: MergeId,
    pub placeholder: InstanceId,
    pub sound_a: String,
    pub sound_b: String,
    /// Ids of the two consumed source instances
    pub sources: (InstanceId, InstanceId),
}

/// A merge that just left IDLE
#[derive(Debug, Clone)]
pub struct MergeStart {
    pub ticket: MergeTicket,
    /// The two source instances, already removed from the registry
    pub consumed: (SoundInstance, SoundInstance),
}

/// What reconciling a merge result did to the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Placeholder now carries the merged sound
    Resolved { placeholder: InstanceId, sound: String },
    /// Merge succeeded but the placeholder was removed meanwhile
    Discarded { placeholder: InstanceId, sound: String },
    /// Request failed; placeholder removed
    Aborted { placeholder: InstanceId },
    /// Result for a cancelled or already settled merge; ignored
    Stale { placeholder: InstanceId },
}

impl MergeOutcome {
    /// Final phase of the merge this outcome settled
    pub fn phase(&self) -> MergePhase {
        match self {
            MergeOutcome::Resolved { .. } | MergeOutcome::Discarded { .. } => MergePhase::Resolved,
            MergeOutcome::Aborted { .. } | MergeOutcome::Stale { .. } => MergePhase::Aborted,
        }
    }
}

#[derive(Debug, Default)]
pub struct MergeCoordinator {
    next_id: MergeId,
    /// Placeholder owned by each unsettled merge; settled merges are forgotten
    in_flight: BTreeMap<MergeId, InstanceId>,
}

impl MergeCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a merge of `id` with its first colliding instance, if any.
    ///
    /// Called after a drag ends inside the pot. Returns `None` and leaves
    /// the registry untouched when there is nothing to merge with.
    pub fn merge_if_possible(&mut self, registry: &mut InstanceRegistry, id: InstanceId) -> Option<MergeStart> {
        let other = registry.first_colliding(id)?;
        debug_assert_ne!(other, id, "instance reported as colliding with itself");
        debug_assert!(
            registry.eligible_for_collision(other),
            "busy instance {other} reported as merge candidate"
        );

        // Eligible instances have a loaded buffer, hence a sound
        let sound_a = registry.get(id)?.sound.clone();
        let sound_b = registry.get(other)?.sound.clone();
        let (Some(sound_a), Some(sound_b)) = (sound_a, sound_b) else {
            debug_assert!(false, "eligible instance without a sound");
            return None;
        };

        let (first, second, placeholder) = registry.replace_pair(
            id,
            other,
            None,
            |a, b| midpoint(a.position, b.position),
            CreationOrigin::Merge,
        )?;

        let merge_id = self.next_id;
        self.next_id += 1;
        self.in_flight.insert(merge_id, placeholder);

        log::info!(
            "Merge {} started: {} + {} -> placeholder {} (\"{}\" + \"{}\")",
            merge_id,
            id,
            other,
            placeholder,
            sound_a,
            sound_b
        );

        Some(MergeStart {
            ticket: MergeTicket {
                id: merge_id,
                placeholder,
                sound_a,
                sound_b,
                sources: (id, other),
            },
            consumed: (first, second),
        })
    }

    /// Reconcile the external service's answer with the registry.
    ///
    /// Never resurrects a removed placeholder. Failures always remove the
    /// placeholder (idempotent if it is already gone).
    pub fn complete(
        &mut self,
        registry: &mut InstanceRegistry,
        ticket: &MergeTicket,
        result: Result<String, MergeError>,
    ) -> MergeOutcome {
        let placeholder = ticket.placeholder;
        let live = self.in_flight.remove(&ticket.id).is_some();

        match result {
            Err(err) => {
                registry.remove(placeholder);
                if live {
                    log::warn!("Merge {} failed: {}", ticket.id, err);
                    MergeOutcome::Aborted { placeholder }
                } else {
                    MergeOutcome::Stale { placeholder }
                }
            }
            Ok(_) if !live => {
                log::warn!("Merge {} answered after it was settled, dropping result", ticket.id);
                MergeOutcome::Stale { placeholder }
            }
            Ok(sound) => {
                if registry.update(placeholder, InstancePatch::sound(sound.clone())) {
                    log::info!("Merge {} resolved: placeholder {} is now \"{}\"", ticket.id, placeholder, sound);
                    MergeOutcome::Resolved { placeholder, sound }
                } else {
                    log::debug!("Merge {} resolved but placeholder {} is gone", ticket.id, placeholder);
                    MergeOutcome::Discarded { placeholder, sound }
                }
            }
        }
    }

    /// Cancel the merge that owns `placeholder`, if one is in flight.
    ///
    /// The caller removes the placeholder and aborts the request; any answer
    /// arriving later is reported as [`MergeOutcome::Stale`].
    pub fn cancel(&mut self, placeholder: InstanceId) -> Option<MergeId> {
        let merge_id = self.owner_of(placeholder)?;
        self.in_flight.remove(&merge_id);
        log::info!("Merge {} cancelled", merge_id);
        Some(merge_id)
    }

    /// Phase of a merge that has not settled yet.
    ///
    /// `None` once settled; the final phase is [`MergeOutcome::phase`].
    pub fn phase(&self, merge_id: MergeId) -> Option<MergePhase> {
        if self.in_flight.contains_key(&merge_id) {
            Some(MergePhase::PlaceholderCreated)
        } else if merge_id >= self.next_id {
            Some(MergePhase::Idle)
        } else {
            None
        }
    }

    /// Unsettled merge whose placeholder is `placeholder`
    pub fn owner_of(&self, placeholder: InstanceId) -> Option<MergeId> {
        self.in_flight
            .iter()
            .find(|(_, owned)| **owned == placeholder)
            .map(|(id, _)| *id)
    }

    /// Placeholder owned by an unsettled merge
    pub fn is_pending_placeholder(&self, id: InstanceId) -> bool {
        self.owner_of(id).is_some()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }
}
