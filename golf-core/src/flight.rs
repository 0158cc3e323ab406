//! Ball flight from launch to landing.
//!
//! The integrator owns the ball's kinematic state after launch. Each tick it
//! steps the state under [`GolfBallForces`], tracks the apex, and freezes the
//! ball on the first tick that reaches the ground.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::FlightConfig;
use crate::forces::GolfBallForces;
use crate::integrator::IntegratorKind;
use crate::types::{BallProperties, BallState, Vec3};

/// Ball state between launch and landing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightState {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Spin vector (rad/s), axis = spin axis
    pub spin: Vec3,
    /// Seconds since launch
    pub elapsed: f64,
    pub apex_height: f64,
    pub apex_position: Vec3,
    pub landed: bool,
    /// Velocity on the last airborne tick, kept for the descent angle
    pub landing_velocity: Vec3,
}

/// Shot metrics derived from a flight. Distances in meters, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlightMetrics {
    /// Horizontal distance from launch to the final position
    pub carry: f64,
    /// Lateral deviation from the target line (positive = right)
    pub offline: f64,
    /// Lateral movement between apex and final position
    pub curve_after_apex: f64,
    /// Seconds in the air
    pub flight_time: f64,
    /// Apex height above the launch point
    pub apex_height: f64,
    pub apex_position: Vec3,
    pub final_position: Vec3,
    /// Descent angle at landing, positive when falling
    pub landing_angle: f64,
}

/// Steps the ball through the air.
#[derive(Debug, Clone)]
pub struct FlightIntegrator {
    forces: GolfBallForces,
    integrator: IntegratorKind,
    ground_y: f64,
    ball: BallProperties,
    launch_position: Vec3,
    state: Option<FlightState>,
}

impl FlightIntegrator {
    pub fn new(config: &FlightConfig, ball: BallProperties) -> Self {
        Self {
            forces: GolfBallForces::from_config(config),
            integrator: config.integrator,
            ground_y: config.ground_y,
            ball,
            launch_position: Vec3::ZERO,
            state: None,
        }
    }

    pub fn forces(&self) -> &GolfBallForces {
        &self.forces
    }

    /// Current flight, if the ball has been launched since the last reset.
    pub fn state(&self) -> Option<&FlightState> {
        self.state.as_ref()
    }

    pub fn launch_position(&self) -> Vec3 {
        self.launch_position
    }

    pub fn is_airborne(&self) -> bool {
        self.state.is_some_and(|s| !s.landed)
    }

    pub fn is_landed(&self) -> bool {
        self.state.is_some_and(|s| s.landed)
    }

    /// Drop any flight in progress.
    pub fn reset(&mut self) {
        self.state = None;
    }

    /// Start a new flight. Elapsed time and apex restart from the launch point.
    ///
    /// The launch point counts as tick zero for the apex, so a ball that only
    /// descends reports its launch height as the apex.
    pub fn launch(&mut self, position: Vec3, velocity: Vec3, spin: Vec3) {
        self.launch_position = position;
        self.state = Some(FlightState {
            position,
            velocity,
            spin,
            elapsed: 0.0,
            apex_height: position.y,
            apex_position: position,
            landed: false,
            landing_velocity: velocity,
        });
        debug!(
            speed = velocity.magnitude(),
            spin = spin.magnitude(),
            "flight started"
        );
    }

    /// Advance the flight by `dt`.
    ///
    /// # Returns
    /// The final metrics on the tick the ball lands, otherwise None.
    pub fn advance(&mut self, dt: f64) -> Option<FlightMetrics> {
        if !dt.is_finite() || dt <= 0.0 {
            return None;
        }
        let state = self.state.as_mut().filter(|s| !s.landed)?;

        let current = BallState::new(state.position, state.velocity, state.spin);
        let next = self.integrator.step(&current, &self.ball, &self.forces, dt).state;

        state.position = next.pos;
        state.velocity = next.vel;
        state.spin = next.spin;
        state.elapsed += dt;

        if state.position.y > state.apex_height {
            state.apex_height = state.position.y;
            state.apex_position = state.position;
        }

        trace!(
            t = state.elapsed,
            x = state.position.x,
            y = state.position.y,
            z = state.position.z,
            "flight tick"
        );

        if state.position.y <= self.ground_y {
            state.landed = true;
            state.landing_velocity = state.velocity;
            state.velocity = Vec3::ZERO;
            state.position.y = self.ground_y;

            let metrics = self.metrics();
            if let Some(m) = &metrics {
                debug!(
                    carry = m.carry,
                    offline = m.offline,
                    apex = m.apex_height,
                    flight_time = m.flight_time,
                    "ball landed"
                );
            }
            return metrics;
        }

        None
    }

    /// Metrics of the current flight, measured to the ball's present position.
    pub fn metrics(&self) -> Option<FlightMetrics> {
        let state = self.state.as_ref()?;
        let start = self.launch_position;
        let travel = state.position - start;
        let velocity = if state.landed {
            state.landing_velocity
        } else {
            state.velocity
        };

        Some(FlightMetrics {
            carry: travel.horizontal().magnitude(),
            offline: travel.x,
            curve_after_apex: state.position.x - state.apex_position.x,
            flight_time: state.elapsed,
            apex_height: state.apex_height - start.y,
            apex_position: state.apex_position,
            final_position: state.position,
            landing_angle: -velocity.elevation_degrees(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impact::launch_unit_vector;

    fn fly(integrator: &mut FlightIntegrator, dt: f64) -> (FlightMetrics, f64) {
        let mut max_y = f64::MIN;
        let mut max_pos = Vec3::ZERO;
        let mut ticks = 0;
        loop {
            let landed = integrator.advance(dt);
            let state = integrator.state().unwrap();
            if state.position.y > max_y && !state.landed {
                max_y = state.position.y;
                max_pos = state.position;
            }
            ticks += 1;
            if let Some(metrics) = landed {
                assert_eq!(metrics.apex_position, max_pos);
                return (metrics, max_y);
            }
            assert!(ticks < 1_000_000, "flight never landed");
        }
    }

    #[test]
    fn test_vacuum_flight_time_matches_closed_form() {
        let speed = 40.0;
        let angle = 30.0_f64;
        let g = 9.81;
        let expected = 2.0 * speed * angle.to_radians().sin() / g;

        let mut errors = Vec::new();
        for dt in [0.01, 0.001, 0.0001] {
            let mut flight = FlightIntegrator::new(&FlightConfig::vacuum(), BallProperties::default());
            flight.launch(Vec3::ZERO, launch_unit_vector(0.0, angle) * speed, Vec3::ZERO);
            let (metrics, _) = fly(&mut flight, dt);
            errors.push((metrics.flight_time - expected).abs());
        }

        assert!(errors[2] < 1e-3, "flight time error {} too large", errors[2]);
        assert!(errors[2] <= errors[0], "error should shrink with dt: {:?}", errors);
    }

    #[test]
    fn test_landing_freezes_ball() {
        let mut flight = FlightIntegrator::new(&FlightConfig::default(), BallProperties::default());
        flight.launch(Vec3::ZERO, Vec3::new(0.0, 10.0, 30.0), Vec3::new(-200.0, 0.0, 0.0));
        let (metrics, _) = fly(&mut flight, 1.0 / 240.0);

        let state = *flight.state().unwrap();
        assert!(state.landed);
        assert_eq!(state.velocity, Vec3::ZERO);
        assert_eq!(state.position.y, 0.0);
        assert!(flight.is_landed());
        assert!(!flight.is_airborne());
        assert!(metrics.landing_angle > 0.0);

        // Further ticks change nothing
        assert!(flight.advance(0.01).is_none());
        assert_eq!(*flight.state().unwrap(), state);
    }

    #[test]
    fn test_apex_is_highest_tick() {
        let mut flight = FlightIntegrator::new(&FlightConfig::default(), BallProperties::default());
        flight.launch(
            Vec3::new(0.0, 0.021, 0.0),
            launch_unit_vector(2.0, 12.0) * 65.0,
            Vec3::new(-280.0, 0.0, 0.0),
        );
        let (metrics, max_y) = fly(&mut flight, 1.0 / 240.0);

        let state = flight.state().unwrap();
        assert_eq!(state.apex_height, max_y);
        assert!((metrics.apex_height - (max_y - 0.021)).abs() < 1e-12);
    }

    #[test]
    fn test_straight_drive_metrics() {
        let mut flight = FlightIntegrator::new(&FlightConfig::default(), BallProperties::default());
        flight.launch(
            Vec3::ZERO,
            launch_unit_vector(0.0, 11.0) * 67.0,
            Vec3::new(-2700.0 / crate::types::constants::RAD_PER_SEC_TO_RPM, 0.0, 0.0),
        );
        let (metrics, _) = fly(&mut flight, 1.0 / 240.0);

        // ~128m carry, ~2.7s in the air
        assert!(
            metrics.carry > 110.0 && metrics.carry < 150.0,
            "carry out of range, got {}",
            metrics.carry
        );
        assert!(metrics.offline.abs() < 1e-6);
        assert!(metrics.curve_after_apex.abs() < 1e-6);
        assert!(metrics.flight_time > 2.4 && metrics.flight_time < 3.0);
        assert!(metrics.apex_height > 6.0);
    }

    #[test]
    fn test_fade_spin_curves_right_after_apex() {
        let mut flight = FlightIntegrator::new(&FlightConfig::default(), BallProperties::default());
        let dir = launch_unit_vector(0.0, 12.0);
        let spin = crate::impact::spin_vector(&dir, 15.0, 3000.0);
        flight.launch(Vec3::ZERO, dir * 65.0, spin);
        let (metrics, _) = fly(&mut flight, 1.0 / 240.0);

        assert!(metrics.offline > 0.0, "fade should finish right, got {}", metrics.offline);
        assert!(metrics.curve_after_apex > 0.0);
    }

    #[test]
    fn test_descending_flight_keeps_launch_as_apex() {
        let mut flight = FlightIntegrator::new(&FlightConfig::vacuum(), BallProperties::default());
        let origin = Vec3::new(0.0, 0.5, 0.0);
        flight.launch(origin, Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO);

        let mut max_tick_y = f64::MIN;
        let metrics = loop {
            let landed = flight.advance(1.0 / 240.0);
            max_tick_y = max_tick_y.max(flight.state().unwrap().position.y);
            if let Some(metrics) = landed {
                break metrics;
            }
        };

        assert!(max_tick_y < origin.y);
        assert_eq!(metrics.apex_position, origin);
        assert_eq!(metrics.apex_height, 0.0);
    }

    #[test]
    fn test_advance_without_launch_is_noop() {
        let mut flight = FlightIntegrator::new(&FlightConfig::default(), BallProperties::default());
        assert!(flight.advance(0.01).is_none());
        assert!(flight.state().is_none());
        assert!(flight.metrics().is_none());
    }

    #[test]
    fn test_relaunch_restarts_bookkeeping() {
        let mut flight = FlightIntegrator::new(&FlightConfig::default(), BallProperties::default());
        flight.launch(Vec3::ZERO, Vec3::new(0.0, 20.0, 20.0), Vec3::ZERO);
        fly(&mut flight, 0.01);

        let origin = Vec3::new(5.0, 0.0, 5.0);
        flight.launch(origin, Vec3::new(0.0, 5.0, 5.0), Vec3::ZERO);
        let state = flight.state().unwrap();
        assert_eq!(state.elapsed, 0.0);
        assert_eq!(state.apex_height, 0.0);
        assert_eq!(state.apex_position, origin);
        assert!(!state.landed);
    }

    #[test]
    fn test_verlet_flight_lands() {
        let config = FlightConfig {
            integrator: IntegratorKind::VelocityVerlet,
            ..FlightConfig::default()
        };
        let mut flight = FlightIntegrator::new(&config, BallProperties::default());
        flight.launch(Vec3::ZERO, launch_unit_vector(0.0, 15.0) * 50.0, Vec3::new(-300.0, 0.0, 0.0));
        let (metrics, _) = fly(&mut flight, 1.0 / 240.0);
        assert!(metrics.carry > 50.0);
    }
}
