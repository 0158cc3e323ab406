//! Python bindings for the golf-core shot simulation.
//!
//! Provides a simple Python API:
//!
//! ```python
//! from golf_physics import Simulation
//!
//! sim = Simulation.from_presets("materials", "regulation", "driver", "sea_level")
//! sim.start_swing()
//!
//! while not sim.is_landed():
//!     sim.step(1.0 / 240.0)
//!
//! print(sim.metrics_dict()["carry_yards"])
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use golf_core::config::{ConfigError, PresetLoader, ShotConfig};
use golf_core::simulation::{ShotEvent, ShotPhase, ShotSimulation};
use golf_core::types::{constants, Vec3 as CoreVec3};

/// 3D vector for positions, velocities, etc.
#[pyclass]
#[derive(Clone, Copy)]
pub struct Vec3 {
    #[pyo3(get, set)]
    pub x: f64,
    #[pyo3(get, set)]
    pub y: f64,
    #[pyo3(get, set)]
    pub z: f64,
}

#[pymethods]
impl Vec3 {
    #[new]
    fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn __repr__(&self) -> String {
        format!("Vec3({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }

    fn magnitude(&self) -> f64 {
        CoreVec3::from(*self).magnitude()
    }

    fn to_tuple(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }
}

impl From<CoreVec3> for Vec3 {
    fn from(v: CoreVec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vec3> for CoreVec3 {
    fn from(v: Vec3) -> Self {
        CoreVec3::new(v.x, v.y, v.z)
    }
}

fn config_err(err: ConfigError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn phase_name(phase: ShotPhase) -> &'static str {
    match phase {
        ShotPhase::Idle => "idle",
        ShotPhase::Swinging => "swinging",
        ShotPhase::ImpactFired => "impact_fired",
        ShotPhase::Airborne => "airborne",
        ShotPhase::Landed => "landed",
    }
}

/// One golf shot: swing, impact and flight.
#[pyclass]
pub struct Simulation {
    inner: ShotSimulation,
    time: f64,
    /// Names of the events produced by the last step
    last_events: Vec<&'static str>,
}

impl Simulation {
    fn with_config(config: ShotConfig) -> PyResult<Self> {
        Ok(Self {
            inner: ShotSimulation::new(config).map_err(config_err)?,
            time: 0.0,
            last_events: Vec::new(),
        })
    }

    /// Apply a change to a copy of the configuration and reconfigure.
    fn update_config(&mut self, update: impl FnOnce(&mut ShotConfig)) -> PyResult<()> {
        let mut config = self.inner.config().clone();
        update(&mut config);
        self.inner.configure(config).map_err(config_err)?;
        self.time = 0.0;
        Ok(())
    }
}

#[pymethods]
impl Simulation {
    /// Create a new simulation with default settings.
    #[new]
    fn new() -> PyResult<Self> {
        Self::with_config(ShotConfig::default())
    }

    /// Create a simulation from YAML presets under `base_path`.
    #[staticmethod]
    fn from_presets(base_path: &str, ball: &str, club: &str, environment: &str) -> PyResult<Self> {
        let config = PresetLoader::new(base_path)
            .load_shot(ball, club, environment)
            .map_err(config_err)?;
        Self::with_config(config)
    }

    /// Seconds since the last reset.
    #[getter]
    fn time(&self) -> f64 {
        self.time
    }

    /// Current phase: "idle", "swinging", "impact_fired", "airborne" or "landed".
    #[getter]
    fn phase(&self) -> &'static str {
        phase_name(self.inner.phase())
    }

    fn is_swinging(&self) -> bool {
        self.inner.is_swinging()
    }

    fn is_moving(&self) -> bool {
        self.inner.is_moving()
    }

    fn is_landed(&self) -> bool {
        self.inner.is_landed()
    }

    /// Get ball position as Vec3.
    fn ball_position(&self) -> Vec3 {
        self.inner.ball_position().into()
    }

    /// Get ball velocity as Vec3 (zero before launch and after landing).
    fn ball_velocity(&self) -> Vec3 {
        self.inner
            .flight()
            .map_or(CoreVec3::ZERO, |state| state.velocity)
            .into()
    }

    /// Get ball spin in RPM.
    fn ball_spin_rpm(&self) -> f64 {
        self.inner
            .flight()
            .map_or(0.0, |state| state.spin.magnitude() * constants::RAD_PER_SEC_TO_RPM)
    }

    /// Get club head position as Vec3.
    fn club_head_position(&self) -> Vec3 {
        self.inner.club_head().position.into()
    }

    /// Get club head velocity as Vec3.
    fn club_head_velocity(&self) -> Vec3 {
        self.inner.club_head().velocity.into()
    }

    /// Set the club's static face angle (deg, positive = open).
    fn set_face_angle(&mut self, degrees: f64) -> PyResult<()> {
        self.update_config(|c| c.club.face_angle = degrees)
    }

    /// Set the swing path (deg, positive = in-to-out, toward +X).
    fn set_swing_path(&mut self, degrees: f64) -> PyResult<()> {
        self.update_config(|c| c.club.swing_path = degrees)
    }

    /// Set the static loft (deg).
    fn set_loft(&mut self, degrees: f64) -> PyResult<()> {
        self.update_config(|c| c.club.loft = degrees)
    }

    /// Set the head speed through impact (m/s).
    fn set_tempo(&mut self, speed: f64) -> PyResult<()> {
        self.update_config(|c| c.club.arc.tempo = speed)
    }

    /// Move the low point along the swing direction (m, positive = ahead of the ball).
    fn set_low_point_offset(&mut self, offset: f64) -> PyResult<()> {
        self.update_config(|c| c.club.arc.low_point_offset = offset)
    }

    /// Enable or disable drag and lift.
    fn set_aerodynamics(&mut self, drag: bool, lift: bool) -> PyResult<()> {
        self.update_config(|c| {
            c.flight.enable_drag = drag;
            c.flight.enable_lift = lift;
        })
    }

    /// Begin a swing. Ignored unless the shot is idle.
    fn start_swing(&mut self) {
        self.inner.start_swing();
    }

    /// Put the ball at rest at (x, y, z) and clear the last shot.
    fn reset_and_prepare(&mut self, x: f64, y: f64, z: f64) {
        self.inner.reset_and_prepare(CoreVec3::new(x, y, z));
        self.time = 0.0;
        self.last_events.clear();
    }

    /// Advance simulation by dt seconds.
    fn step(&mut self, dt: f64) {
        self.inner.advance(dt);
        if dt.is_finite() && dt > 0.0 {
            self.time += dt;
        }
        self.last_events = self
            .inner
            .drain_events()
            .iter()
            .map(|event| match event {
                ShotEvent::Impact(_) => "impact",
                ShotEvent::BallLaunched(_) => "ball_launched",
                ShotEvent::Landed(_) => "landed",
            })
            .collect();
    }

    /// Run multiple steps at once, stopping early once the ball lands.
    ///
    /// Returns the event names produced along the way.
    fn step_n(&mut self, dt: f64, steps: usize) -> Vec<&'static str> {
        let mut events = Vec::new();
        for _ in 0..steps {
            self.step(dt);
            events.extend(self.last_events.iter().copied());
            if self.inner.is_landed() {
                break;
            }
        }
        events
    }

    /// Events produced by the last `step`.
    fn last_events(&self) -> Vec<&'static str> {
        self.last_events.clone()
    }

    /// Get current state as dict for easy inspection.
    fn state_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        let ball = self.inner.ball_position();
        let head = self.inner.club_head();
        dict.set_item("time", self.time)?;
        dict.set_item("phase", phase_name(self.inner.phase()))?;
        dict.set_item("ball_x", ball.x)?;
        dict.set_item("ball_y", ball.y)?;
        dict.set_item("ball_z", ball.z)?;
        dict.set_item("ball_speed", self.ball_velocity().magnitude())?;
        dict.set_item("ball_spin_rpm", self.ball_spin_rpm())?;
        dict.set_item("club_x", head.position.x)?;
        dict.set_item("club_y", head.position.y)?;
        dict.set_item("club_z", head.position.z)?;
        dict.set_item("club_speed", head.velocity.magnitude())?;
        Ok(dict)
    }

    /// Club delivery and ball launch parameters of the last impact.
    fn launch_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        let delivery = self.inner.delivery();
        let launch = self.inner.launch();
        dict.set_item("club_speed", delivery.club_speed)?;
        dict.set_item("club_speed_mph", delivery.club_speed * constants::MS_TO_MPH)?;
        dict.set_item("attack_angle", delivery.attack_angle)?;
        dict.set_item("club_path", delivery.club_path)?;
        dict.set_item("face_angle", delivery.face_angle)?;
        dict.set_item("dynamic_loft", delivery.dynamic_loft)?;
        dict.set_item("spin_loft", delivery.spin_loft)?;
        dict.set_item("face_to_path", delivery.face_to_path)?;
        dict.set_item("ball_speed", launch.ball_speed)?;
        dict.set_item("ball_speed_mph", launch.ball_speed * constants::MS_TO_MPH)?;
        dict.set_item("smash_factor", launch.smash_factor)?;
        dict.set_item("launch_angle", launch.launch_angle)?;
        dict.set_item("launch_direction", launch.launch_direction)?;
        dict.set_item("spin_rate", launch.spin_rate)?;
        dict.set_item("spin_axis_tilt", launch.spin_axis_tilt)?;
        Ok(dict)
    }

    /// Flight metrics so far, or None before launch.
    fn metrics_dict<'py>(&self, py: Python<'py>) -> PyResult<Option<Bound<'py, PyDict>>> {
        let Some(metrics) = self.inner.metrics() else {
            return Ok(None);
        };
        let dict = PyDict::new(py);
        dict.set_item("carry", metrics.carry)?;
        dict.set_item("carry_yards", metrics.carry * constants::METERS_TO_YARDS)?;
        dict.set_item("offline", metrics.offline)?;
        dict.set_item("curve_after_apex", metrics.curve_after_apex)?;
        dict.set_item("flight_time", metrics.flight_time)?;
        dict.set_item("apex_height", metrics.apex_height)?;
        dict.set_item("landing_angle", metrics.landing_angle)?;
        Ok(Some(dict))
    }
}

/// Python module definition.
#[pymodule]
fn golf_physics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Vec3>()?;
    m.add_class::<Simulation>()?;
    Ok(())
}
