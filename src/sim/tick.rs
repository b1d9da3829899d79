//! Fixed timestep driver
//!
//! Frames arrive at whatever rate the host manages; the pot only ever
//! advances in `SIM_DT` steps so ripple growth and the ripple timer are
//! reproducible.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::audio::AudioBackend;
use super::pot::Pot;

/// Largest frame delta accepted; longer stalls are dropped, not replayed
const MAX_FRAME_DT: f32 = 0.1;

/// Accumulates frame time and hands out fixed substeps
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    /// Total fixed steps taken
    pub ticks: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame's elapsed time and return how many fixed steps to run
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Spiral of death guard: forget time we could not catch up on
        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            self.accumulator = 0.0;
        }
        self.ticks += u64::from(substeps);
        substeps
    }

    /// Advance `pot` by one frame's worth of fixed steps
    pub fn run_frame<A: AudioBackend>(&mut self, pot: &mut Pot<A>, frame_dt: f32) -> u32 {
        let steps = self.advance(frame_dt);
        for _ in 0..steps {
            pot.tick(SIM_DT);
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::LogAudio;
    use crate::settings::Settings;
    use glam::Vec2;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(SIM_DT * 0.5), 0);
        assert_eq!(clock.advance(SIM_DT * 0.6), 1);
        assert_eq!(clock.ticks, 1);
    }

    #[test]
    fn test_caps_substeps() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(1.0), MAX_SUBSTEPS);
        // Backlog was dropped
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_determinism() {
        // Two pots with the same seed and frames end up identical
        let settings = Settings {
            seed: 99999,
            ripple_interval_secs: crate::consts::MIN_RIPPLE_INTERVAL_SECS,
            ..Settings::default()
        };
        let mut pot1 = Pot::new(LogAudio::new(), settings.clone());
        let mut pot2 = Pot::new(LogAudio::new(), settings);
        pot1.add(Some("a.wav"), Vec2::new(50.0, 50.0), Default::default());
        pot2.add(Some("a.wav"), Vec2::new(50.0, 50.0), Default::default());

        let mut clock1 = FrameClock::new();
        let mut clock2 = FrameClock::new();
        for frame in [0.016, 0.017, 0.033, 0.016, 0.05] {
            clock1.run_frame(&mut pot1, frame);
            clock2.run_frame(&mut pot2, frame);
        }

        assert_eq!(clock1.ticks, clock2.ticks);
        let p1: Vec<Vec2> = pot1.ripples().ripples().iter().map(|r| r.position).collect();
        let p2: Vec<Vec2> = pot2.ripples().ripples().iter().map(|r| r.position).collect();
        assert!(!p1.is_empty());
        assert_eq!(p1, p2);
        assert_eq!(pot1.audio().played, pot2.audio().played);
    }
}
