//! Shot orchestration.
//!
//! [`ShotSimulation`] owns one swing, one impact solver and one flight
//! integrator, and moves a shot through its phases:
//!
//! ```text
//! Idle ──start_swing──▶ Swinging ──contact──▶ ImpactFired ──▶ Airborne ──▶ Landed
//!   ▲                      │                                                 │
//!   └──── arc finished ────┘                                                 │
//!   └──────────────────────────── reset_and_prepare ─────────────────────────┘
//! ```
//!
//! The caller drives time with [`ShotSimulation::advance`] and collects what
//! happened with [`ShotSimulation::drain_events`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ConfigError, ShotConfig};
use crate::flight::{FlightIntegrator, FlightMetrics, FlightState};
use crate::impact::{BallLaunchParameters, ClubDeliveryParameters, ImpactSolution, ImpactSolver};
use crate::swing::{ClubHeadState, ImpactEvent, SwingKinematics};
use crate::types::Vec3;

/// Where a shot is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotPhase {
    /// Ball at rest, waiting for a swing
    #[default]
    Idle,
    Swinging,
    /// Contact accepted this tick; the ball leaves on the next advance
    ImpactFired,
    Airborne,
    Landed,
}

/// Notifications produced by [`ShotSimulation::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotEvent {
    Impact(ImpactEvent),
    BallLaunched(BallLaunchParameters),
    Landed(FlightMetrics),
}

/// A single golf shot, from address to landing.
#[derive(Debug, Clone)]
pub struct ShotSimulation {
    config: ShotConfig,
    swing: SwingKinematics,
    solver: ImpactSolver,
    flight: FlightIntegrator,
    /// Resting position of the ball before launch
    rest_position: Vec3,
    phase: ShotPhase,
    events: Vec<ShotEvent>,
}

impl ShotSimulation {
    /// Create a simulation with the ball resting on the ground at the origin.
    pub fn new(config: ShotConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rest_position = Vec3::new(0.0, config.ball.radius, 0.0);
        Ok(Self {
            swing: SwingKinematics::new(config.club.clone(), rest_position),
            solver: ImpactSolver::new(),
            flight: FlightIntegrator::new(&config.flight, config.ball.clone()),
            rest_position,
            phase: ShotPhase::Idle,
            events: Vec::new(),
            config,
        })
    }

    /// Replace the whole configuration and return to Idle.
    ///
    /// An invalid configuration is rejected and the current one is kept.
    pub fn configure(&mut self, config: ShotConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.swing = SwingKinematics::new(config.club.clone(), self.rest_position);
        self.flight = FlightIntegrator::new(&config.flight, config.ball.clone());
        self.config = config;
        self.solver.reset();
        self.events.clear();
        self.set_phase(ShotPhase::Idle);
        Ok(())
    }

    /// Begin a swing. Ignored unless the shot is Idle.
    pub fn start_swing(&mut self) {
        if self.phase != ShotPhase::Idle {
            debug!(phase = ?self.phase, "start_swing ignored");
            return;
        }
        self.swing.start_swing();
        self.set_phase(ShotPhase::Swinging);
    }

    /// Put the ball at rest at `position` and clear every trace of the last shot.
    pub fn reset_and_prepare(&mut self, position: Vec3) {
        self.rest_position = position;
        self.swing.prepare(position);
        self.solver.reset();
        self.flight.reset();
        self.events.clear();
        self.set_phase(ShotPhase::Idle);
    }

    /// Advance the shot by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }

        match self.phase {
            ShotPhase::Idle | ShotPhase::Landed => {}
            ShotPhase::Swinging => self.advance_swing(dt),
            ShotPhase::ImpactFired => {
                self.set_phase(ShotPhase::Airborne);
                self.advance_flight(dt);
            }
            ShotPhase::Airborne => self.advance_flight(dt),
        }
    }

    /// Take every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<ShotEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> ShotPhase {
        self.phase
    }

    pub fn is_swinging(&self) -> bool {
        self.swing.is_swinging()
    }

    /// True while the ball is in the air.
    pub fn is_moving(&self) -> bool {
        self.flight.is_airborne()
    }

    pub fn is_landed(&self) -> bool {
        self.phase == ShotPhase::Landed
    }

    pub fn delivery(&self) -> &ClubDeliveryParameters {
        self.solver.delivery()
    }

    pub fn launch(&self) -> &BallLaunchParameters {
        self.solver.launch()
    }

    /// Flight metrics measured so far, None before launch.
    pub fn metrics(&self) -> Option<FlightMetrics> {
        self.flight.metrics()
    }

    pub fn flight(&self) -> Option<&FlightState> {
        self.flight.state()
    }

    /// Ball center: the flight position once launched, otherwise the rest position.
    pub fn ball_position(&self) -> Vec3 {
        self.flight
            .state()
            .map_or(self.rest_position, |state| state.position)
    }

    pub fn club_head(&self) -> &ClubHeadState {
        self.swing.head()
    }

    pub fn swing(&self) -> &SwingKinematics {
        &self.swing
    }

    pub fn config(&self) -> &ShotConfig {
        &self.config
    }

    fn advance_swing(&mut self, dt: f64) {
        let ball_position = self.rest_position;
        let club = &self.config.club;
        let ball = &self.config.ball;
        let solver = &mut self.solver;

        let mut solution: Option<ImpactSolution> = None;
        let contact = self.swing.advance_with(dt, ball_position, |event| {
            match solver.solve(event, club, ball) {
                Ok(solved) => {
                    solution = Some(solved);
                    true
                }
                Err(err) => {
                    debug!(%err, "contact rejected");
                    false
                }
            }
        });

        if let (Some(event), Some(solution)) = (contact, solution) {
            let launch = solution.launch;
            self.events.push(ShotEvent::Impact(event));
            self.events.push(ShotEvent::BallLaunched(launch));
            self.flight.launch(ball_position, launch.velocity, launch.spin);
            self.swing.halt();
            self.set_phase(ShotPhase::ImpactFired);
        } else if !self.swing.is_swinging() {
            debug!("swing finished without contact");
            self.set_phase(ShotPhase::Idle);
        }
    }

    fn advance_flight(&mut self, dt: f64) {
        if let Some(metrics) = self.flight.advance(dt) {
            self.events.push(ShotEvent::Landed(metrics));
            self.set_phase(ShotPhase::Landed);
        }
    }

    fn set_phase(&mut self, phase: ShotPhase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, "shot phase");
            self.phase = phase;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
