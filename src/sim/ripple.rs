//! Ripple propagation and ripple/instance collisions
//!
//! A ripple is an expanding ring. Every tick its radius grows linearly
//! toward the maximum; each instance whose footprint the ring touches gets
//! one "collided" notification per eligibility window. A background timer
//! drops ripples at random positions in addition to user taps.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::geometry::{Circle, circle_fully_contains, circles_overlap};
use super::instance::InstanceId;
use super::registry::InstanceRegistry;
use crate::consts::*;
use crate::max_ripple_radius;

/// Ripple identifier, unique per engine, never reused
pub type RippleId = u32;

/// An expanding ring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ripple {
    pub id: RippleId,
    pub position: Vec2,
    pub radius: f32,
    /// Radius at the end of the growth animation (fixed at spawn)
    pub max_radius: f32,
    /// Seconds since spawn
    pub elapsed: f32,
    /// Instances already notified by this ripple
    pub collided_with: BTreeSet<InstanceId>,
}

impl Ripple {
    fn new(id: RippleId, position: Vec2, max_radius: f32) -> Self {
        Self {
            id,
            position,
            radius: RIPPLE_INITIAL_RADIUS,
            max_radius,
            elapsed: 0.0,
            collided_with: BTreeSet::new(),
        }
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }

    /// Advance the growth animation. Returns true once fully grown.
    fn grow(&mut self, dt: f32, duration: f32) -> bool {
        self.elapsed += dt;
        let t = if duration > 0.0 {
            (self.elapsed / duration).min(1.0)
        } else {
            1.0
        };
        self.radius = RIPPLE_INITIAL_RADIUS + (self.max_radius - RIPPLE_INITIAL_RADIUS) * t;
        t >= 1.0
    }

    /// Notify every instance the ring newly touches.
    ///
    /// Busy instances are evicted from `collided_with` so they can be hit
    /// again once they settle. An instance fully swallowed by the ring is
    /// skipped without being recorded.
    fn collide(&mut self, registry: &InstanceRegistry, out: &mut Vec<RippleCollision>) {
        let ring = self.circle();
        for instance in registry.iter() {
            if instance.busy() {
                self.collided_with.remove(&instance.id);
                continue;
            }
            if self.collided_with.contains(&instance.id) {
                continue;
            }
            let footprint = instance.circle();
            if !circles_overlap(&ring, &footprint) {
                continue;
            }
            // Only once the ring is larger than the token can it pass over it
            if ring.radius > INSTANCE_RADIUS && circle_fully_contains(&ring, &footprint) {
                continue;
            }
            self.collided_with.insert(instance.id);
            out.push(RippleCollision {
                ripple: self.id,
                instance: instance.id,
            });
        }
    }
}

/// "Instance X was touched by ripple Y"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RippleCollision {
    pub ripple: RippleId,
    pub instance: InstanceId,
}

/// Everything one engine tick produced
#[derive(Debug, Clone, Default)]
pub struct RippleTick {
    /// Ripples spawned by the background timer
    pub spawned: Vec<RippleId>,
    pub collisions: Vec<RippleCollision>,
    /// Ripples that finished growing and were destroyed
    pub finished: Vec<RippleId>,
}

#[derive(Debug)]
pub struct RippleEngine {
    /// Live ripples, in id order
    ripples: Vec<Ripple>,
    next_id: RippleId,
    bounds: Vec2,
    max_radius: f32,
    duration_secs: f32,
    interval_secs: f32,
    auto_spawn: bool,
    /// Seconds since the last timer ripple
    timer: f32,
    rng: Pcg32,
    subscribers: Vec<mpsc::UnboundedSender<RippleCollision>>,
}

impl RippleEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            ripples: Vec::new(),
            next_id: 0,
            bounds: Vec2::new(DEFAULT_POT_WIDTH, DEFAULT_POT_HEIGHT),
            max_radius: max_ripple_radius(DEFAULT_POT_WIDTH, DEFAULT_POT_HEIGHT),
            duration_secs: RIPPLE_DURATION_SECS,
            interval_secs: RIPPLE_INTERVAL_SECS,
            auto_spawn: true,
            timer: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            subscribers: Vec::new(),
        }
    }

    /// Pot bounding box changed; affects ripples spawned from now on
    pub fn set_bounds(&mut self, width: f32, height: f32) {
        let width = width.max(0.0);
        let height = height.max(0.0);
        self.bounds = Vec2::new(width, height);
        self.max_radius = max_ripple_radius(width, height);
    }

    pub fn set_duration(&mut self, secs: f32) {
        self.duration_secs = secs.max(0.0);
    }

    /// Timer interval; zero (or less) disables the timer, tiny values are raised
    pub fn set_interval(&mut self, secs: f32) {
        self.interval_secs = if secs > 0.0 {
            secs.max(MIN_RIPPLE_INTERVAL_SECS)
        } else {
            0.0
        };
    }

    /// Enable or disable the background timer
    pub fn set_auto_spawn(&mut self, enabled: bool) {
        self.auto_spawn = enabled;
        self.timer = 0.0;
    }

    pub fn auto_spawn(&self) -> bool {
        self.auto_spawn
    }

    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    /// Start a ripple at `position`
    pub fn spawn(&mut self, position: Vec2) -> RippleId {
        let id = self.next_id;
        self.next_id += 1;
        self.ripples.push(Ripple::new(id, position, self.max_radius));
        log::debug!("Ripple {} spawned at ({:.1}, {:.1})", id, position.x, position.y);
        id
    }

    /// Receive every collision from now on.
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<RippleCollision> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Advance timer and ripples by `dt` seconds against a registry snapshot
    pub fn tick(&mut self, dt: f32, registry: &InstanceRegistry) -> RippleTick {
        let mut out = RippleTick::default();

        let duration = self.duration_secs;
        for ripple in &mut self.ripples {
            let done = ripple.grow(dt, duration);
            ripple.collide(registry, &mut out.collisions);
            if done {
                out.finished.push(ripple.id);
            }
        }
        if !out.finished.is_empty() {
            self.ripples.retain(|r| !out.finished.contains(&r.id));
            log::debug!("Ripples finished: {:?}", out.finished);
        }

        if !out.collisions.is_empty() {
            self.broadcast(&out.collisions);
        }

        // Timer ripples start growing on the next tick
        if self.auto_spawn && self.interval_secs > 0.0 {
            self.timer += dt;
            let mut spawned = 0;
            while self.timer >= self.interval_secs && spawned < MAX_TIMER_RIPPLES_PER_TICK {
                self.timer -= self.interval_secs;
                let position = self.random_position();
                out.spawned.push(self.spawn(position));
                spawned += 1;
            }
            // Long stall: forget the ripples we did not get to
            if self.timer >= self.interval_secs {
                self.timer = 0.0;
            }
        }
        out
    }

    fn broadcast(&mut self, collisions: &[RippleCollision]) {
        self.subscribers.retain(|tx| {
            collisions.iter().all(|collision| tx.send(*collision).is_ok())
        });
    }

    fn random_position(&mut self) -> Vec2 {
        let x: f32 = self.rng.random::<f32>() * self.bounds.x;
        let y: f32 = self.rng.random::<f32>() * self.bounds.y;
        Vec2::new(x.floor(), y.floor())
    }

    pub fn get(&self, id: RippleId) -> Option<&Ripple> {
        self.ripples.iter().find(|r| r.id == id)
    }

    /// Live ripples in id order
    pub fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }

    pub fn len(&self) -> usize {
        self.ripples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ripples.is_empty()
    }
}
