//! D-Plane impact model.
//!
//! Turns one club/ball contact into club delivery parameters and ball launch
//! conditions. The model is empirical: the blend weights and clamps below are
//! tuned against launch monitor data and are applied in a fixed order.
//!
//! ## The D-Plane
//!
//! The club path and the face normal span a plane (the "D-Plane"). The ball
//! starts mostly where the face points, and spins about an axis perpendicular
//! to that plane:
//!
//! ```text
//!            face normal
//!               ↑   spin loft
//!               │  ╱
//!               │ ╱  club path
//!               │╱
//!  ─────────────●───────────── ground
//! ```
//!
//! - Spin loft (angle between path and face) drives the spin rate
//! - Face-to-path (horizontal part of that angle) tilts the spin axis,
//!   curving the ball (positive: fade, negative: draw)

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::ClubConfig;
use crate::swing::ImpactEvent;
use crate::types::{constants, BallProperties, Vec3};

/// Club speeds below this do not launch the ball (m/s).
pub const MIN_CLUB_SPEED: f64 = 0.1;
/// Spin loft bounds (deg).
pub const SPIN_LOFT_RANGE: (f64, f64) = (5.0, 60.0);
/// Launch angle bounds (deg).
pub const LAUNCH_ANGLE_RANGE: (f64, f64) = (0.0, 65.0);
/// Spin rate bounds (RPM).
pub const SPIN_RATE_RANGE: (f64, f64) = (1000.0, 12000.0);
/// Face contribution to start direction bounds.
pub const FACE_CONTRIBUTION_RANGE: (f64, f64) = (0.5, 0.9);
/// Face-to-path bound used for the spin axis (deg).
pub const MAX_FACE_TO_PATH_FOR_TILT: f64 = 20.0;

/// Spin loft at which the face would stop dominating start direction (deg).
const FACE_CONTRIBUTION_SPIN_LOFT: f64 = 140.0;
/// Launch angle weight of dynamic loft.
const DYNAMIC_LOFT_WEIGHT: f64 = 0.83;
/// Launch angle weight of attack angle.
const ATTACK_ANGLE_WEIGHT: f64 = 0.5;
/// Share of tangential surface speed converted into spin.
const FRICTION_EFFICIENCY: f64 = 0.55;

/// Reason a contact does not launch the ball.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ImpactError {
    #[error("club speed {speed:.3} m/s is below the launch threshold")]
    ClubTooSlow { speed: f64 },

    #[error("club is not moving into the face (normal speed {normal_speed:.3} m/s)")]
    Receding { normal_speed: f64 },
}

/// How the club was delivered to the ball. Angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClubDeliveryParameters {
    /// m/s
    pub club_speed: f64,
    pub attack_angle: f64,
    pub club_path: f64,
    pub face_angle: f64,
    pub dynamic_loft: f64,
    pub spin_loft: f64,
    pub face_to_path: f64,
}

/// Ball launch conditions. Angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BallLaunchParameters {
    /// m/s
    pub ball_speed: f64,
    pub smash_factor: f64,
    pub launch_angle: f64,
    pub launch_direction: f64,
    /// RPM
    pub spin_rate: f64,
    /// Positive tilts produce a fade, negative a draw
    pub spin_axis_tilt: f64,
    /// Initial ball velocity (m/s)
    pub velocity: Vec3,
    /// Initial spin vector (rad/s)
    pub spin: Vec3,
}

/// Solver output for one accepted contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactSolution {
    pub delivery: ClubDeliveryParameters,
    pub launch: BallLaunchParameters,
}

/// D-Plane impact solver.
///
/// Holds the parameters of the last accepted impact, zero until the first.
#[derive(Debug, Clone, Default)]
pub struct ImpactSolver {
    delivery: ClubDeliveryParameters,
    launch: BallLaunchParameters,
}

impl ImpactSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivery(&self) -> &ClubDeliveryParameters {
        &self.delivery
    }

    pub fn launch(&self) -> &BallLaunchParameters {
        &self.launch
    }

    /// Zero the stored parameters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Solve an impact and store the result.
    ///
    /// On error nothing is stored and the previous parameters remain.
    pub fn solve(
        &mut self,
        event: &ImpactEvent,
        club: &ClubConfig,
        ball: &BallProperties,
    ) -> Result<ImpactSolution, ImpactError> {
        let solution = compute(event, club, ball)?;
        self.delivery = solution.delivery;
        self.launch = solution.launch;
        debug!(
            ball_speed = solution.launch.ball_speed,
            launch_angle = solution.launch.launch_angle,
            spin_rate = solution.launch.spin_rate,
            spin_axis_tilt = solution.launch.spin_axis_tilt,
            "ball launched"
        );
        Ok(solution)
    }
}

/// Evaluate the D-Plane model without touching any state.
pub fn compute(
    event: &ImpactEvent,
    club: &ClubConfig,
    ball: &BallProperties,
) -> Result<ImpactSolution, ImpactError> {
    let club_velocity = event.club_velocity;
    let club_speed = club_velocity.magnitude();
    if club_speed.is_nan() || club_speed < MIN_CLUB_SPEED {
        return Err(ImpactError::ClubTooSlow { speed: club_speed });
    }
    let club_dir = club_velocity / club_speed;
    let face_normal = event.face_normal.normalized();

    let club_path = club_dir.heading_degrees();
    let dynamic_loft = face_normal.y.clamp(-1.0, 1.0).asin().to_degrees();
    let spin_loft = face_normal
        .angle_to(&club_dir)
        .to_degrees()
        .clamp(SPIN_LOFT_RANGE.0, SPIN_LOFT_RANGE.1);
    let face_to_path = event.face_angle - club_path;

    let normal_speed = club_velocity.dot(&face_normal);
    if normal_speed <= 0.0 {
        return Err(ImpactError::Receding { normal_speed });
    }

    let mass_ratio = club.mass / (club.mass + ball.mass);
    let ball_speed = normal_speed * (1.0 + club.restitution) * mass_ratio;
    let smash_factor = ball_speed / club_speed;

    let face_contribution = (1.0 - spin_loft / FACE_CONTRIBUTION_SPIN_LOFT)
        .clamp(FACE_CONTRIBUTION_RANGE.0, FACE_CONTRIBUTION_RANGE.1);
    let path_contribution = 1.0 - face_contribution;
    let launch_direction = event.face_angle * face_contribution + club_path * path_contribution;

    let launch_angle = (dynamic_loft * DYNAMIC_LOFT_WEIGHT + event.attack_angle * ATTACK_ANGLE_WEIGHT)
        .clamp(LAUNCH_ANGLE_RANGE.0, LAUNCH_ANGLE_RANGE.1);

    let launch_dir = launch_unit_vector(launch_direction, launch_angle);
    let velocity = launch_dir * ball_speed;

    let surface_speed = ball_speed * spin_loft.to_radians().sin();
    let spin_rad_s = surface_speed / ball.radius * FRICTION_EFFICIENCY;
    let spin_rate = (spin_rad_s * constants::RAD_PER_SEC_TO_RPM)
        .clamp(SPIN_RATE_RANGE.0, SPIN_RATE_RANGE.1);

    let spin_axis_tilt = face_to_path
        .clamp(-MAX_FACE_TO_PATH_FOR_TILT, MAX_FACE_TO_PATH_FOR_TILT)
        .atan2(spin_loft)
        .to_degrees();

    let spin = spin_vector(&launch_dir, spin_axis_tilt, spin_rate);

    Ok(ImpactSolution {
        delivery: ClubDeliveryParameters {
            club_speed,
            attack_angle: event.attack_angle,
            club_path,
            face_angle: event.face_angle,
            dynamic_loft,
            spin_loft,
            face_to_path,
        },
        launch: BallLaunchParameters {
            ball_speed,
            smash_factor,
            launch_angle,
            launch_direction,
            spin_rate,
            spin_axis_tilt,
            velocity,
            spin,
        },
    })
}

/// Unit vector for a horizontal direction and elevation, both in degrees.
pub fn launch_unit_vector(direction_deg: f64, elevation_deg: f64) -> Vec3 {
    let (sin_dir, cos_dir) = direction_deg.to_radians().sin_cos();
    let (sin_el, cos_el) = elevation_deg.to_radians().sin_cos();
    Vec3::new(sin_dir * cos_el, sin_el, cos_dir * cos_el)
}

/// Spin vector (rad/s) for a launch direction, axis tilt (deg) and rate (RPM).
///
/// Starts from the horizontal backspin axis `dir × up` and rolls it about the
/// launch direction by `-tilt`.
pub fn spin_vector(launch_dir: &Vec3, tilt_deg: f64, spin_rate_rpm: f64) -> Vec3 {
    let backspin_axis = launch_dir.cross(&Vec3::Y).normalized();
    let axis = backspin_axis
        .rotated_about(launch_dir, -tilt_deg.to_radians())
        .normalized();
    axis * (spin_rate_rpm / constants::RAD_PER_SEC_TO_RPM)
}

// =============================================================================
// Tests
// =============================================================================
