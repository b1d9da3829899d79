//! Soundpot - drag sounds into a shared pot, merge them, ripple them
//!
//! Core modules:
//! - `sim`: Deterministic simulation (instances, collisions, merges, ripples)
//! - `audio`: Audio decode/playback contract
//! - `service`: External merge service contract
//! - `runtime`: Single-threaded async driver for in-flight merges
//! - `settings`: User preferences

pub mod audio;
pub mod error;
pub mod runtime;
pub mod service;
pub mod settings;
pub mod sim;

pub use audio::{AudioBackend, BufferHandle};
pub use error::{MergeError, SettingsError};
pub use runtime::PotRuntime;
pub use service::MergeService;
pub use settings::Settings;

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Collision radius of a sound instance (half of a 96-unit token)
    pub const INSTANCE_RADIUS: f32 = 48.0;

    /// Radius a ripple starts growing from
    pub const RIPPLE_INITIAL_RADIUS: f32 = 5.0;
    /// Time for a ripple to grow to its maximum radius (seconds)
    pub const RIPPLE_DURATION_SECS: f32 = 3.0;
    /// Interval between timer-spawned ripples (seconds)
    pub const RIPPLE_INTERVAL_SECS: f32 = 5.0;
    /// Shortest accepted timer interval; zero turns the timer off instead
    pub const MIN_RIPPLE_INTERVAL_SECS: f32 = 0.1;
    /// Timer ripples spawned by one tick at most; older backlog is dropped
    pub const MAX_TIMER_RIPPLES_PER_TICK: u32 = 4;

    /// Default pot size until the presentation layer reports real bounds
    pub const DEFAULT_POT_WIDTH: f32 = 800.0;
    pub const DEFAULT_POT_HEIGHT: f32 = 600.0;
}

/// Point halfway between `a` and `b`
#[inline]
pub fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    (a + b) * 0.5
}

/// Maximum ripple radius for a pot of the given size.
///
/// Twice the diagonal, so a ripple started anywhere inside the pot sweeps
/// the whole surface.
#[inline]
pub fn max_ripple_radius(width: f32, height: f32) -> f32 {
    (width * width + height * height).sqrt() * 2.0
}
