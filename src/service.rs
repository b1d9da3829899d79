//! External merge service contract
//!
//! Fusing two sounds happens elsewhere (a model server). The pot only needs
//! "give me the name of a sound made from these two", which may take a
//! long time, fail, or never answer.

use std::future::Future;
use std::time::Duration;

use crate::error::MergeError;

pub trait MergeService {
    /// Ask for a new library sound fused from `sound_a` and `sound_b`
    fn request_merge(&self, sound_a: &str, sound_b: &str) -> impl Future<Output = Result<String, MergeError>>;
}

/// Stand-in service that "merges" by naming, after a fixed latency.
///
/// Refuses to merge a sound with itself.
#[derive(Debug, Clone)]
pub struct SimulatedMergeService {
    pub latency: Duration,
}

impl SimulatedMergeService {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl MergeService for SimulatedMergeService {
    async fn request_merge(&self, sound_a: &str, sound_b: &str) -> Result<String, MergeError> {
        tokio::time::sleep(self.latency).await;
        if sound_a == sound_b {
            return Err(MergeError::Rejected {
                sound_a: sound_a.to_string(),
                sound_b: sound_b.to_string(),
                reason: "identical sounds".to_string(),
            });
        }
        let stem = |s: &str| s.rsplit_once('.').map_or(s, |(stem, _)| stem).to_string();
        Ok(format!("{}+{}.wav", stem(sound_a), stem(sound_b)))
    }
}
