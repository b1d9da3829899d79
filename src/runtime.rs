//! Single-threaded async driver
//!
//! The pot itself is synchronous. This runtime owns it behind
//! `Rc<RefCell<_>>` and runs each merge request as a local task on a tokio
//! `LocalSet`, so pointer events, ticks and network completions interleave
//! on one thread. A borrow of the pot is never held across an `.await`.
//!
//! Must be used from within `LocalSet::run_until` (or a task spawned on a
//! `LocalSet`).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::audio::AudioBackend;
use crate::consts::SIM_DT;
use crate::service::MergeService;
use crate::sim::{CreationOrigin, DropTarget, FrameClock, InstanceId, MergeId, MergeTicket, Pot};

type TaskMap = Rc<RefCell<HashMap<MergeId, JoinHandle<()>>>>;

pub struct PotRuntime<A: AudioBackend + 'static, S: MergeService + 'static> {
    pot: Rc<RefCell<Pot<A>>>,
    service: Rc<S>,
    /// Request task per unsettled merge
    tasks: TaskMap,
    /// Signalled whenever a request task leaves `tasks`
    settled: Rc<Notify>,
    clock: RefCell<FrameClock>,
}

impl<A: AudioBackend + 'static, S: MergeService + 'static> PotRuntime<A, S> {
    pub fn new(pot: Pot<A>, service: S) -> Self {
        Self {
            pot: Rc::new(RefCell::new(pot)),
            service: Rc::new(service),
            tasks: Rc::new(RefCell::new(HashMap::new())),
            settled: Rc::new(Notify::new()),
            clock: RefCell::new(FrameClock::new()),
        }
    }

    /// Shared handle to the pot
    pub fn pot(&self) -> Rc<RefCell<Pot<A>>> {
        self.pot.clone()
    }

    /// Run `f` with exclusive access to the pot
    pub fn with_pot<R>(&self, f: impl FnOnce(&mut Pot<A>) -> R) -> R {
        f(&mut self.pot.borrow_mut())
    }

    /// Release a dragged instance; starts the merge request if one began.
    ///
    /// Dropping a merge placeholder on the discard target aborts its request.
    pub fn drag_end(&self, id: InstanceId, position: Vec2, target: DropTarget) -> Option<MergeId> {
        let (ticket, owning) = {
            let mut pot = self.pot.borrow_mut();
            let owning = pot.merges().owner_of(id);
            (pot.drag_end(id, position, target), owning)
        };
        if target == DropTarget::Discard
            && let Some(merge) = owning
        {
            self.abort(merge);
        }
        ticket.map(|ticket| self.spawn_merge(ticket))
    }

    /// Throw an instance away, aborting the request it is waiting on
    pub fn discard(&self, id: InstanceId) -> Option<MergeId> {
        let cancelled = self.pot.borrow_mut().discard(id);
        if let Some(merge) = cancelled {
            self.abort(merge);
        }
        cancelled
    }

    /// Try to merge `id` with whatever it overlaps
    pub fn merge_if_possible(&self, id: InstanceId) -> Option<MergeId> {
        let ticket = self.pot.borrow_mut().merge_if_possible(id)?;
        Some(self.spawn_merge(ticket))
    }

    fn spawn_merge(&self, ticket: MergeTicket) -> MergeId {
        let merge = ticket.id;
        let pot = self.pot.clone();
        let service = self.service.clone();
        let tasks = self.tasks.clone();
        let settled = self.settled.clone();

        let handle = tokio::task::spawn_local(async move {
            let result = service.request_merge(&ticket.sound_a, &ticket.sound_b).await;
            let outcome = pot.borrow_mut().complete_merge(&ticket, result);
            log::debug!("Merge {} settled: {:?}", ticket.id, outcome);
            tasks.borrow_mut().remove(&ticket.id);
            settled.notify_one();
        });
        // The task cannot run before we yield, so it always finds its entry
        self.tasks.borrow_mut().insert(merge, handle);
        merge
    }

    fn abort(&self, merge: MergeId) {
        if let Some(handle) = self.tasks.borrow_mut().remove(&merge) {
            handle.abort();
            self.settled.notify_one();
            log::info!("Aborted request for merge {}", merge);
        }
    }

    /// Put a recording placeholder at `position` and arm the microphone
    /// once the configured delay has passed.
    ///
    /// The host fulfils the placeholder with the recorded sound, or discards
    /// it; a placeholder discarded before the delay elapses is never armed.
    pub fn start_recording(&self, position: Vec2) -> InstanceId {
        let (id, delay_ms) = {
            let mut pot = self.pot.borrow_mut();
            let id = pot.create_pending(position, CreationOrigin::Recording);
            (id, pot.settings().mic_delay_ms)
        };
        if delay_ms == 0 {
            self.pot.borrow_mut().arm_recording(id);
            return id;
        }

        let pot = self.pot.clone();
        tokio::task::spawn_local(async move {
            tokio::time::sleep(Duration::from_millis(u64::from(delay_ms))).await;
            pot.borrow_mut().arm_recording(id);
        });
        id
    }

    /// Merge requests still waiting on the service
    pub fn in_flight(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Wait until every outstanding merge request has settled.
    ///
    /// Requests have no timeout, so this never returns while the service
    /// leaves one unanswered; discard its placeholder to give up on it.
    pub async fn settle(&self) {
        while self.in_flight() > 0 {
            self.settled.notified().await;
        }
    }

    /// Advance the simulation by one host frame
    pub fn run_frame(&self, frame_dt: f32) -> u32 {
        let mut pot = self.pot.borrow_mut();
        self.clock.borrow_mut().run_frame(&mut pot, frame_dt)
    }

    /// Drive fixed-timestep ticks for `duration` of wall time
    pub async fn run_for(&self, duration: Duration) {
        let mut interval = tokio::time::interval(Duration::from_secs_f32(SIM_DT));
        let start = tokio::time::Instant::now();
        let mut last = start;
        while last.duration_since(start) < duration {
            let now = interval.tick().await;
            let frame_dt = now.duration_since(last).as_secs_f32();
            last = now;
            self.run_frame(frame_dt);
        }
    }
}
