//! Monotonic z-index issuer for "bring to front"

use serde::{Deserialize, Serialize};

/// Hands out z-indices so the most recently raised instance is on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZOrderAllocator {
    current_max: i32,
}

impl Default for ZOrderAllocator {
    fn default() -> Self {
        Self { current_max: 1 }
    }
}

impl ZOrderAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest z-index issued so far
    pub fn current_max(&self) -> i32 {
        self.current_max
    }

    /// Raise an instance currently at `requested`.
    ///
    /// An instance already at (or above) the top keeps its value; anything
    /// lower is placed one above the current maximum.
    pub fn allocate(&mut self, requested: i32) -> i32 {
        if requested >= self.current_max {
            self.current_max = requested;
        } else {
            self.current_max += 1;
        }
        self.current_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lower_goes_above_max() {
        let mut z = ZOrderAllocator::new();
        assert_eq!(z.allocate(0), 2);
        assert_eq!(z.allocate(0), 3);
        assert_eq!(z.current_max(), 3);
    }

    #[test]
    fn test_top_instance_keeps_value() {
        let mut z = ZOrderAllocator::new();
        let top = z.allocate(0);
        assert_eq!(z.allocate(top), top);
        assert_eq!(z.allocate(10), 10);
        assert_eq!(z.allocate(3), 11);
    }

    proptest! {
        #[test]
        fn prop_allocate_is_monotonic(requests in proptest::collection::vec(-5i32..50, 1..64)) {
            let mut z = ZOrderAllocator::new();
            let mut issued_max = i32::MIN;
            for req in requests {
                let out = z.allocate(req);
                prop_assert!(out >= req);
                prop_assert!(out >= issued_max);
                issued_max = out;
            }
        }
    }
}
