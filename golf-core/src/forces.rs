//! Physical forces acting on the ball in flight.
//!
//! This module implements the `ForceModel` trait for golf ball flight:
//!
//! - **Gravity**: Constant acceleration
//! - **Drag**: Air resistance opposing motion, proportional to v²
//! - **Magnus**: Lift from backspin, curvature from a tilted spin axis
//!
//! Within one tick the forces are applied in stages: gravity, then drag, then
//! lift, each evaluated on the velocity left by the stage before. Below
//! [`MIN_AERO_SPEED`] after gravity the ball is treated as still air and only
//! gravity acts.
//!
//! ## The Magnus Effect
//!
//! ```text
//! Backspin (spin axis -X, ball flying +Z):
//!     ↑ lift = ω̂ × v̂ = +Y, the ball climbs and "floats"
//!
//! Spin axis tilted right (fade):
//!     lift leans toward +X, the ball curves right
//! ```

use crate::config::FlightConfig;
use crate::integrator::ForceModel;
use crate::types::{constants, BallProperties, BallState, Vec3};

/// Speed below which drag and lift are skipped (m/s).
pub const MIN_AERO_SPEED: f64 = 0.1;

/// Upper bound of the lift coefficient.
pub const MAX_LIFT_COEFFICIENT: f64 = 0.4;

/// Complete force model for golf ball flight.
///
/// Combines gravity, aerodynamic drag, and Magnus lift.
#[derive(Debug, Clone, PartialEq)]
pub struct GolfBallForces {
    /// Air density in kg/m³
    pub air_density: f64,
    pub drag_coefficient: f64,
    /// Lift coefficient per unit spin parameter
    pub lift_multiplier: f64,
    pub gravity: Vec3,
    pub spin_decay_rate: f64,

    /// Enable/disable individual forces (useful for testing)
    pub enable_drag: bool,
    pub enable_lift: bool,
}

impl Default for GolfBallForces {
    fn default() -> Self {
        Self::from_config(&FlightConfig::default())
    }
}

impl GolfBallForces {
    pub fn from_config(config: &FlightConfig) -> Self {
        Self {
            air_density: config.air_density,
            drag_coefficient: config.drag_coefficient,
            lift_multiplier: config.lift_multiplier,
            gravity: config.gravity,
            spin_decay_rate: config.spin_decay_rate,
            enable_drag: config.enable_drag,
            enable_lift: config.enable_lift,
        }
    }

    /// Create a force model with only gravity (for testing).
    pub fn gravity_only() -> Self {
        Self::from_config(&FlightConfig::vacuum())
    }

    /// Dynamic pressure times area over mass: 0.5 * ρ * |v|² * A / m
    fn pressure_per_mass(&self, speed_sq: f64, props: &BallProperties) -> f64 {
        0.5 * self.air_density * speed_sq * props.area() / props.mass
    }

    /// Drag acceleration for a given velocity.
    ///
    /// a_drag = -v̂ * (0.5 * ρ * |v|² * Cd * A / m)
    pub fn drag_acceleration(&self, vel: &Vec3, props: &BallProperties) -> Vec3 {
        let speed_sq = vel.magnitude_squared();
        if speed_sq < constants::EPSILON {
            return Vec3::ZERO;
        }
        vel.normalized() * -(self.pressure_per_mass(speed_sq, props) * self.drag_coefficient)
    }

    /// Lift coefficient for a spin magnitude (rad/s) and speed (m/s).
    ///
    /// Cl = clamp(k * S, 0, 0.4) with spin parameter S = |ω| * r / |v|
    pub fn lift_coefficient(&self, spin_mag: f64, speed: f64, props: &BallProperties) -> f64 {
        if speed < constants::EPSILON {
            return 0.0;
        }
        let spin_parameter = spin_mag * props.radius / speed;
        (self.lift_multiplier * spin_parameter).clamp(0.0, MAX_LIFT_COEFFICIENT)
    }

    /// Magnus acceleration for a given velocity and spin.
    ///
    /// a_lift = normalize(ω̂ × v̂) * (0.5 * ρ * |v|² * Cl * A / m)
    pub fn magnus_acceleration(&self, vel: &Vec3, spin: &Vec3, props: &BallProperties) -> Vec3 {
        let speed_sq = vel.magnitude_squared();
        let spin_mag = spin.magnitude();
        if speed_sq < constants::EPSILON || spin_mag < constants::EPSILON {
            return Vec3::ZERO;
        }

        let speed = speed_sq.sqrt();
        let lift_dir = spin.normalized().cross(&vel.normalized()).normalized();
        let cl = self.lift_coefficient(spin_mag, speed, props);

        lift_dir * (self.pressure_per_mass(speed_sq, props) * cl)
    }

    /// Drag plus lift at `vel`, zero below [`MIN_AERO_SPEED`].
    fn aero_acceleration(&self, vel: &Vec3, spin: &Vec3, props: &BallProperties) -> Vec3 {
        if vel.magnitude() <= MIN_AERO_SPEED {
            return Vec3::ZERO;
        }
        let mut acc = Vec3::ZERO;
        if self.enable_drag {
            acc += self.drag_acceleration(vel, props);
        }
        if self.enable_lift {
            acc += self.magnus_acceleration(vel, spin, props);
        }
        acc
    }
}

impl ForceModel for GolfBallForces {
    fn linear_acceleration(&self, state: &BallState, props: &BallProperties) -> Vec3 {
        self.gravity + self.aero_acceleration(&state.vel, &state.spin, props)
    }

    fn angular_acceleration(&self, state: &BallState, _props: &BallProperties) -> Vec3 {
        state.spin * -self.spin_decay_rate
    }

    fn integrate_velocity(&self, state: &BallState, props: &BallProperties, dt: f64) -> Vec3 {
        let mut vel = state.vel + self.gravity * dt;
        if vel.magnitude() <= MIN_AERO_SPEED {
            return vel;
        }
        if self.enable_drag {
            vel += self.drag_acceleration(&vel, props) * dt;
        }
        if self.enable_lift {
            vel += self.magnus_acceleration(&vel, &state.spin, props) * dt;
        }
        vel
    }
}

// =============================================================================
// Tests
// =============================================================================
