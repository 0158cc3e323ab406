//! Swing arc geometry.
//!
//! The arc is parameterized by an angle θ in degrees. In the local plane frame
//! the head sits at `(0, -cos θ · height, sin θ · radius)`, so θ = 0 is the
//! low point and the head travels toward local +Z through it.
//!
//! The local frame is tilted about the target line by the plane tilt, then
//! turned about vertical by the swing path angle, and finally translated so
//! the low point lands on the anchor.

use crate::config::ClubConfig;
use crate::types::{Quat, Vec3};

/// A swing arc placed in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingArc {
    pub radius: f64,
    pub height: f64,
    /// Plane orientation (path yaw after tilt roll)
    pub rotation: Quat,
    /// World position of the low point
    pub anchor: Vec3,
}

impl SwingArc {
    pub fn new(club: &ClubConfig, anchor: Vec3) -> Self {
        let tilt = Quat::from_axis_angle(&Vec3::Z, club.plane_tilt.to_radians());
        let path = Quat::from_axis_angle(&Vec3::Y, club.swing_path.to_radians());
        Self {
            radius: club.arc.radius,
            height: club.arc.height,
            rotation: path * tilt,
            anchor,
        }
    }

    /// Arc placed for a ball resting at `ball_position`.
    ///
    /// The low point sits at the impact-plane height, shifted along the swing
    /// direction by the low-point offset.
    pub fn for_ball(club: &ClubConfig, ball_position: Vec3) -> Self {
        let mut arc = Self::new(club, Vec3::ZERO);
        let forward = arc.swing_direction();
        let base = Vec3::new(ball_position.x, club.arc.impact_plane_height, ball_position.z);
        arc.anchor = base + forward * club.arc.low_point_offset;
        arc
    }

    /// Horizontal direction of head travel at the low point.
    pub fn swing_direction(&self) -> Vec3 {
        self.rotation.rotate(&Vec3::Z).horizontal().normalized()
    }

    /// Position in the local plane frame.
    pub fn local_position(&self, angle_deg: f64) -> Vec3 {
        let theta = angle_deg.to_radians();
        Vec3::new(0.0, -theta.cos() * self.height, theta.sin() * self.radius)
    }

    /// World position of the head at `angle_deg`.
    pub fn world_position(&self, angle_deg: f64) -> Vec3 {
        let from_low_point = self.local_position(angle_deg) - self.local_position(0.0);
        self.anchor + self.rotation.rotate(&from_low_point)
    }
}
