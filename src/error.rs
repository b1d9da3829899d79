//! Error types
//!
//! None of these are fatal. Merge errors end in the placeholder being
//! removed; settings errors fall back to defaults.

use thiserror::Error;

/// Why the external merge service produced no sound
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// Service answered but refused the pair
    #[error("merge of '{sound_a}' and '{sound_b}' rejected: {reason}")]
    Rejected {
        sound_a: String,
        sound_b: String,
        reason: String,
    },

    /// Service answered without a sound
    #[error("merge service returned no sound")]
    NoResult,

    /// Request never got a proper answer
    #[error("merge request failed: {0}")]
    Transport(String),
}

/// Settings could not be decoded or encoded
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}
