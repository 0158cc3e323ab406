//! Swept segment detection.
//!
//! Detects when the club head's path during one tick passes within a radius of
//! the ball center using continuous collision detection.

use crate::types::{constants, Vec3};

/// Closest approach of a swept segment to a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// Closest point on the segment
    pub point: Vec3,
    /// Fraction of the segment at the closest point, in `[0, 1]`
    pub t: f64,
    /// Distance from the closest point to the target
    pub distance: f64,
}

/// Closest point on segment `[start, end]` to `target`.
///
/// A zero-length segment reports its start point.
pub fn closest_point_on_segment(start: Vec3, end: Vec3, target: Vec3) -> SegmentHit {
    let seg = end - start;
    let len_sq = seg.magnitude_squared();

    let t = if len_sq < constants::EPSILON {
        0.0
    } else {
        ((target - start).dot(&seg) / len_sq).clamp(0.0, 1.0)
    };

    let point = start + seg * t;
    SegmentHit {
        point,
        t,
        distance: point.distance(&target),
    }
}

/// Sweep the segment `[start, end]` against a sphere of `radius` around `target`.
///
/// # Returns
/// The closest approach if it lies within `radius`, or None.
pub fn sweep_segment(start: Vec3, end: Vec3, target: Vec3, radius: f64) -> Option<SegmentHit> {
    let hit = closest_point_on_segment(start, end, target);
    (hit.distance <= radius).then_some(hit)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_point_interior() {
        let hit = closest_point_on_segment(
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.03, 0.5),
        );
        assert!((hit.t - 0.75).abs() < 1e-12);
        assert!((hit.point.z - 0.5).abs() < 1e-12);
        assert!((hit.distance - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_closest_point_clamps_to_end() {
        let hit = closest_point_on_segment(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(hit.t, 1.0);
        assert!((hit.distance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_length_segment() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let hit = closest_point_on_segment(p, p, Vec3::new(1.0, 2.0, 4.0));
        assert_eq!(hit.t, 0.0);
        assert_eq!(hit.point, p);
        assert!((hit.distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fast_segment_does_not_tunnel() {
        // Endpoints both far from the ball, but the path runs through it
        let ball = Vec3::new(0.0, 0.02, 0.0);
        let hit = sweep_segment(
            Vec3::new(0.0, 0.03, -0.4),
            Vec3::new(0.0, 0.03, 0.4),
            ball,
            0.05,
        );
        assert!(hit.is_some(), "Segment through the ball should be detected");
        assert!((hit.unwrap().t - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_miss_outside_radius() {
        let hit = sweep_segment(
            Vec3::new(0.2, 0.0, -0.4),
            Vec3::new(0.2, 0.0, 0.4),
            Vec3::ZERO,
            0.05,
        );
        assert!(hit.is_none());
    }
}
