//! Collision math over circles
//!
//! Pure functions, no state. Instances are circles of radius
//! [`INSTANCE_RADIUS`](crate::consts::INSTANCE_RADIUS); ripples are circles
//! whose radius grows over time.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::INSTANCE_RADIUS;

/// A circle in pot coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Footprint of a sound instance centered at `center`
    pub fn instance(center: Vec2) -> Self {
        Self::new(center, INSTANCE_RADIUS)
    }
}

/// True iff the circles touch or overlap.
///
/// Closed interval: tangent circles count as overlapping.
#[inline]
pub fn circles_overlap(a: &Circle, b: &Circle) -> bool {
    a.center.distance(b.center) <= a.radius + b.radius
}

/// True iff `inner` lies strictly inside `outer` without the perimeters
/// crossing.
///
/// Used to let a ripple ring "pass over" an instance once it has swallowed
/// the whole footprint.
#[inline]
pub fn circle_fully_contains(outer: &Circle, inner: &Circle) -> bool {
    outer.center.distance(inner.center) < (outer.radius - inner.radius).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_within_reach() {
        let a = Circle::instance(Vec2::new(0.0, 0.0));
        let b = Circle::instance(Vec2::new(60.0, 0.0));
        assert!(circles_overlap(&a, &b));
    }

    #[test]
    fn test_overlap_tangent_counts() {
        let a = Circle::instance(Vec2::ZERO);
        let b = Circle::instance(Vec2::new(96.0, 0.0));
        assert!(circles_overlap(&a, &b));

        let c = Circle::instance(Vec2::new(96.5, 0.0));
        assert!(!circles_overlap(&a, &c));
    }

    #[test]
    fn test_fully_contains() {
        let ripple = Circle::new(Vec2::new(10.0, 10.0), 200.0);
        let instance = Circle::instance(Vec2::new(10.0, 10.0));
        assert!(circle_fully_contains(&ripple, &instance));
        // Still overlapping, but the ring no longer touches the token
        assert!(circles_overlap(&ripple, &instance));
    }

    #[test]
    fn test_not_contained_when_perimeters_cross() {
        let ripple = Circle::new(Vec2::ZERO, 100.0);
        let instance = Circle::instance(Vec2::new(90.0, 0.0));
        assert!(circles_overlap(&ripple, &instance));
        assert!(!circle_fully_contains(&ripple, &instance));
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -1000.0f32..1000.0, ay in -1000.0f32..1000.0,
            bx in -1000.0f32..1000.0, by in -1000.0f32..1000.0,
            ar in 0.0f32..500.0, br in 0.0f32..500.0,
        ) {
            let a = Circle::new(Vec2::new(ax, ay), ar);
            let b = Circle::new(Vec2::new(bx, by), br);
            prop_assert_eq!(circles_overlap(&a, &b), circles_overlap(&b, &a));
        }

        #[test]
        fn prop_containment_implies_overlap(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            ar in 0.0f32..500.0, br in 0.0f32..500.0,
        ) {
            let a = Circle::new(Vec2::new(ax, ay), ar);
            let b = Circle::new(Vec2::new(bx, by), br);
            if circle_fully_contains(&a, &b) {
                prop_assert!(circles_overlap(&a, &b));
            }
        }
    }
}
