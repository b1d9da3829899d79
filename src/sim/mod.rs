//! Deterministic simulation module
//!
//! All pot logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by instance ID, which is insertion order)
//! - No rendering, audio or network dependencies (those come in via traits)

pub mod buffer_gate;
pub mod geometry;
pub mod instance;
pub mod merge;
pub mod pot;
pub mod registry;
pub mod ripple;
pub mod tick;
pub mod zorder;

pub use buffer_gate::BufferLoadGate;
pub use geometry::{Circle, circle_fully_contains, circles_overlap};
pub use instance::{CreationOrigin, InstanceId, InstancePatch, SoundInstance};
pub use merge::{MergeCoordinator, MergeId, MergeOutcome, MergePhase, MergeStart, MergeTicket};
pub use pot::{DropTarget, Pot, PotEvent};
pub use registry::InstanceRegistry;
pub use ripple::{Ripple, RippleCollision, RippleEngine, RippleId};
pub use tick::FrameClock;
pub use zorder::ZOrderAllocator;
