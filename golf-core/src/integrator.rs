//! Numerical integrators for advancing the ball in flight.
//!
//! The default integrator is semi-implicit (symplectic) Euler: velocity is
//! updated first, then position is advanced with the *new* velocity. It is the
//! scheme the launch-monitor style flight model is tuned against, so shot
//! metrics stay reproducible across tick rates.
//!
//! Velocity Verlet is available as a second-order alternative for callers who
//! care more about accuracy at coarse time steps than about parity.
//!
//! ## Semi-implicit Euler
//!
//! ```text
//! 1. v_new = v + a(x, v)*dt      // forces may apply in stages
//! 2. x_new = x + v_new*dt
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{BallProperties, BallState, Vec3};

/// Result of an integration step, containing the new state and metadata.
#[derive(Debug, Clone, Copy)]
pub struct IntegrationResult {
    pub state: BallState,
    pub acceleration: Vec3,
    pub angular_acceleration: Vec3,
}

/// Trait for computing forces/accelerations on the ball.
///
/// Implementations provide the physics model (gravity, drag, Magnus, etc.)
pub trait ForceModel {
    /// Compute linear acceleration given current state.
    fn linear_acceleration(&self, state: &BallState, props: &BallProperties) -> Vec3;

    /// Compute angular acceleration (spin change rate).
    /// Default implementation: spin is preserved in flight.
    fn angular_acceleration(&self, _state: &BallState, _props: &BallProperties) -> Vec3 {
        Vec3::ZERO
    }

    /// Velocity after one explicit step of length `dt`.
    ///
    /// The default evaluates the total acceleration once. Models whose forces
    /// are applied one after another within a tick override this.
    fn integrate_velocity(&self, state: &BallState, props: &BallProperties, dt: f64) -> Vec3 {
        state.vel + self.linear_acceleration(state, props) * dt
    }
}

/// Integration scheme used by the flight integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorKind {
    #[default]
    SemiImplicitEuler,
    VelocityVerlet,
}

impl IntegratorKind {
    /// Advance the ball state by one time step with this scheme.
    pub fn step<F: ForceModel>(
        self,
        state: &BallState,
        props: &BallProperties,
        forces: &F,
        dt: f64,
    ) -> IntegrationResult {
        match self {
            IntegratorKind::SemiImplicitEuler => SemiImplicitEuler::step(state, props, forces, dt),
            IntegratorKind::VelocityVerlet => VelocityVerlet::step(state, props, forces, dt),
        }
    }
}

/// Semi-implicit Euler integrator.
pub struct SemiImplicitEuler;

impl SemiImplicitEuler {
    /// Advance the ball state by one time step.
    ///
    /// # Arguments
    /// * `state` - Current ball state (position, velocity, spin)
    /// * `props` - Ball physical properties (mass, radius)
    /// * `forces` - Force model providing accelerations
    /// * `dt` - Time step in seconds
    pub fn step<F: ForceModel>(
        state: &BallState,
        props: &BallProperties,
        forces: &F,
        dt: f64,
    ) -> IntegrationResult {
        let new_vel = forces.integrate_velocity(state, props, dt);
        let alpha = forces.angular_acceleration(state, props);

        let acceleration = if dt > 0.0 {
            (new_vel - state.vel) / dt
        } else {
            Vec3::ZERO
        };

        IntegrationResult {
            state: BallState {
                pos: state.pos + new_vel * dt,
                vel: new_vel,
                spin: state.spin + alpha * dt,
            },
            acceleration,
            angular_acceleration: alpha,
        }
    }
}

/// Velocity Verlet integrator for ball physics.
///
/// More accurate than Euler for smooth force fields; does not reproduce the
/// staged force application of [`SemiImplicitEuler`].
pub struct VelocityVerlet;

impl VelocityVerlet {
    /// Advance the ball state by one time step.
    pub fn step<F: ForceModel>(
        state: &BallState,
        props: &BallProperties,
        forces: &F,
        dt: f64,
    ) -> IntegrationResult {
        let a0 = forces.linear_acceleration(state, props);
        let alpha0 = forces.angular_acceleration(state, props);

        // x_new = x + v*dt + 0.5*a*dt²
        let new_pos = state.pos + state.vel * dt + a0 * (0.5 * dt * dt);

        // Drag and lift depend on velocity, so predict it for the second sample
        let predicted = BallState {
            pos: new_pos,
            vel: state.vel + a0 * dt,
            spin: state.spin + alpha0 * dt,
        };

        let a1 = forces.linear_acceleration(&predicted, props);
        let alpha1 = forces.angular_acceleration(&predicted, props);

        IntegrationResult {
            state: BallState {
                pos: new_pos,
                vel: state.vel + (a0 + a1) * (0.5 * dt),
                spin: state.spin + (alpha0 + alpha1) * (0.5 * dt),
            },
            acceleration: a1,
            angular_acceleration: alpha1,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
