//! Pot settings and preferences
//!
//! Encoded as JSON; where the JSON lives is up to the host.

use serde::{Deserialize, Serialize};

use crate::consts::{MIN_RIPPLE_INTERVAL_SECS, RIPPLE_DURATION_SECS, RIPPLE_INTERVAL_SECS};
use crate::error::SettingsError;

/// Upper bound for the microphone arm delay
pub const MAX_MIC_DELAY_MS: u32 = 1000;

/// Pot settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Ripples ===
    /// Seconds between timer-spawned ripples
    pub ripple_interval_secs: f32,
    /// Seconds a ripple takes to reach its maximum radius
    pub ripple_duration_secs: f32,
    /// Spawn ripples on a timer in addition to taps
    pub auto_ripples: bool,

    // === Content ===
    /// Keep instances of sounds flagged explicit in the pot
    pub allow_explicit: bool,

    // === Recording ===
    /// Delay before the microphone starts capturing (ms)
    pub mic_delay_ms: u32,

    /// Seed for timer ripple placement
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ripple_interval_secs: RIPPLE_INTERVAL_SECS,
            ripple_duration_secs: RIPPLE_DURATION_SECS,
            auto_ripples: true,

            allow_explicit: true,

            mic_delay_ms: 0,

            seed: 0x5EED,
        }
    }
}

impl Settings {
    /// Decode settings, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode settings, falling back to defaults on malformed input
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Some(Err(err)) => {
                log::warn!("Ignoring stored settings: {}", err);
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Clamp out-of-range values
    pub fn sanitized(mut self) -> Self {
        if !self.ripple_interval_secs.is_finite() || self.ripple_interval_secs < 0.0 {
            self.ripple_interval_secs = RIPPLE_INTERVAL_SECS;
        } else if self.ripple_interval_secs > 0.0 {
            self.ripple_interval_secs = self.ripple_interval_secs.max(MIN_RIPPLE_INTERVAL_SECS);
        }
        if !self.ripple_duration_secs.is_finite() || self.ripple_duration_secs < 0.0 {
            self.ripple_duration_secs = RIPPLE_DURATION_SECS;
        }
        self.mic_delay_ms = self.mic_delay_ms.min(MAX_MIC_DELAY_MS);
        self
    }

    /// Whether the timer actually spawns ripples
    pub fn effective_auto_ripples(&self) -> bool {
        self.auto_ripples && self.ripple_interval_secs > 0.0
    }
}
