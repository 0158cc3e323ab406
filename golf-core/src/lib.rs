//! # Golf Core
//!
//! A physics engine for a single golf shot: club swing, D-Plane impact and
//! ball flight.
//!
//! ## Architecture
//!
//! - `types`: Core data structures (Vec3, Quat, ball state and properties)
//! - `swing`: Swing arc, swept contact detection and club head kinematics
//! - `impact`: D-Plane solver turning a contact into launch conditions
//! - `forces`: Gravity, drag and Magnus lift on the ball
//! - `integrator`: Numerical integration (semi-implicit Euler, Velocity Verlet)
//! - `flight`: Ball flight from launch to landing, with shot metrics
//! - `config`: Shot configuration and YAML preset loader
//! - `simulation`: Main orchestrator
//!
//! ## Example
//!
//! ```no_run
//! use golf_core::{ShotConfig, ShotEvent, ShotSimulation};
//!
//! let mut sim = ShotSimulation::new(ShotConfig::default())?;
//! sim.start_swing();
//! while !sim.is_landed() {
//!     sim.advance(1.0 / 240.0);
//!     for event in sim.drain_events() {
//!         if let ShotEvent::Landed(metrics) = event {
//!             println!("carry {:.1} m", metrics.carry);
//!         }
//!     }
//! }
//! # Ok::<(), golf_core::ConfigError>(())
//! ```

pub mod config;
pub mod flight;
pub mod forces;
pub mod impact;
pub mod integrator;
pub mod simulation;
pub mod swing;
pub mod types;

pub use config::{ConfigError, PresetLoader, ShotConfig};
pub use flight::{FlightMetrics, FlightState};
pub use impact::{BallLaunchParameters, ClubDeliveryParameters, ImpactError};
pub use simulation::{ShotEvent, ShotPhase, ShotSimulation};
pub use swing::ImpactEvent;
pub use types::Vec3;
