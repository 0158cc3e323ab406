//! Shot configuration and YAML preset loader.
//!
//! Every physical input of a shot lives in [`ShotConfig`]. Presets can be
//! kept on disk so clubs and conditions change without recompiling:
//!
//! ```text
//! materials/
//! ├── balls/
//! │   └── regulation.yaml
//! ├── clubs/
//! │   ├── driver.yaml
//! │   └── seven_iron.yaml
//! └── environments/
//!     ├── sea_level.yaml
//!     └── vacuum.yaml
//! ```
//!
//! Preset files may omit any field; missing fields take the defaults below.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::integrator::IntegratorKind;
use crate::types::{constants, BallProperties, Vec3};

/// Error type for configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Preset not found: {0}")]
    NotFound(String),

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// How the face normal reported in an impact is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceNormalModel {
    /// Forward axis of the club head orientation (tangent yawed by face angle).
    HeadForward,
    /// Velocity direction pitched up by the static loft and yawed so its
    /// heading matches the face angle.
    #[default]
    Lofted,
}

/// Geometry and timing of the swing arc.
///
/// The arc is an ellipse in the local Y/Z plane:
/// `pos(θ) = (0, -cos θ · height, sin θ · radius)`; θ = 0 is the low point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcConfig {
    /// Horizontal semi-axis (m)
    pub radius: f64,
    /// Vertical semi-axis (m)
    pub height: f64,
    /// Arc angle at the top of the backswing (deg)
    pub start_angle: f64,
    /// Arc angle at the end of the follow-through (deg)
    pub end_angle: f64,
    /// Head speed along the arc at the low point (m/s)
    pub tempo: f64,
    /// World height of the arc low point (m)
    pub impact_plane_height: f64,
    /// Low point distance ahead of the ball along the swing direction (m).
    /// Positive values strike the ball on the way down.
    pub low_point_offset: f64,
    /// Distance from the head path within which the ball is struck (m)
    pub detection_radius: f64,
    /// Point reported as the impact location, in the club head frame (m)
    pub impact_point_offset: Vec3,
}

impl Default for ArcConfig {
    fn default() -> Self {
        Self {
            radius: 1.1,
            height: 1.1,
            start_angle: -120.0,
            end_angle: 120.0,
            tempo: 44.7,
            impact_plane_height: 0.021335,
            low_point_offset: 0.0,
            detection_radius: 0.05,
            impact_point_offset: Vec3::new(0.0, 0.0, 0.02),
        }
    }
}

/// Static club properties and delivery setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClubConfig {
    pub name: String,
    /// Club head mass (kg)
    pub mass: f64,
    /// Coefficient of restitution between face and ball
    pub restitution: f64,
    /// Static loft (deg)
    pub loft: f64,
    /// Face angle relative to the target line (deg, positive = open/right)
    pub face_angle: f64,
    /// Swing path angle about vertical (deg, positive = in-to-out/right)
    pub swing_path: f64,
    /// Swing plane tilt about the target line (deg)
    pub plane_tilt: f64,
    pub face_normal_model: FaceNormalModel,
    pub arc: ArcConfig,
}

impl ClubConfig {
    /// Modern driver.
    pub fn driver() -> Self {
        Self {
            name: "Driver".to_string(),
            mass: 0.20,
            restitution: 0.86,
            loft: 10.5,
            face_angle: 0.0,
            swing_path: 0.0,
            plane_tilt: 0.0,
            face_normal_model: FaceNormalModel::Lofted,
            arc: ArcConfig::default(),
        }
    }
}

impl Default for ClubConfig {
    fn default() -> Self {
        Self::driver()
    }
}

/// Atmosphere, ground and integration settings for ball flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// Air density in kg/m³
    pub air_density: f64,
    pub drag_coefficient: f64,
    /// Lift coefficient per unit spin parameter
    pub lift_multiplier: f64,
    pub gravity: Vec3,
    /// Height of the landing surface (m)
    pub ground_y: f64,
    pub enable_drag: bool,
    pub enable_lift: bool,
    /// Exponential spin decay rate (1/s); zero keeps spin constant
    pub spin_decay_rate: f64,
    pub integrator: IntegratorKind,
}

impl FlightConfig {
    /// Gravity only, no aerodynamics (closed-form projectile).
    pub fn vacuum() -> Self {
        Self {
            enable_drag: false,
            enable_lift: false,
            ..Self::default()
        }
    }
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            air_density: constants::AIR_DENSITY,
            drag_coefficient: 0.25,
            lift_multiplier: 0.25,
            gravity: Vec3::new(0.0, -constants::GRAVITY, 0.0),
            ground_y: 0.0,
            enable_drag: true,
            enable_lift: true,
            spin_decay_rate: 0.0,
            integrator: IntegratorKind::SemiImplicitEuler,
        }
    }
}

/// Complete configuration of one shot simulation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotConfig {
    pub ball: BallProperties,
    pub club: ClubConfig,
    pub flight: FlightConfig,
}

impl ShotConfig {
    /// Check that every value is physically meaningful.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("ball.mass", self.ball.mass)?;
        positive("ball.radius", self.ball.radius)?;

        let club = &self.club;
        positive("club.mass", club.mass)?;
        finite("club.restitution", club.restitution)?;
        if !(0.0..=1.0).contains(&club.restitution) {
            return Err(invalid(
                "club.restitution",
                format!("{} is outside [0, 1]", club.restitution),
            ));
        }
        finite("club.loft", club.loft)?;
        finite("club.face_angle", club.face_angle)?;
        finite("club.swing_path", club.swing_path)?;
        finite("club.plane_tilt", club.plane_tilt)?;

        let arc = &club.arc;
        positive("arc.radius", arc.radius)?;
        non_negative("arc.height", arc.height)?;
        finite("arc.start_angle", arc.start_angle)?;
        finite("arc.end_angle", arc.end_angle)?;
        positive("arc.tempo", arc.tempo)?;
        finite("arc.impact_plane_height", arc.impact_plane_height)?;
        finite("arc.low_point_offset", arc.low_point_offset)?;
        positive("arc.detection_radius", arc.detection_radius)?;
        if !arc.impact_point_offset.is_finite() {
            return Err(invalid("arc.impact_point_offset", "not finite".to_string()));
        }

        let flight = &self.flight;
        non_negative("flight.air_density", flight.air_density)?;
        non_negative("flight.drag_coefficient", flight.drag_coefficient)?;
        non_negative("flight.lift_multiplier", flight.lift_multiplier)?;
        non_negative("flight.spin_decay_rate", flight.spin_decay_rate)?;
        finite("flight.ground_y", flight.ground_y)?;
        if !flight.gravity.is_finite() {
            return Err(invalid("flight.gravity", "not finite".to_string()));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("{} is not finite", value)))
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} must be positive", value)))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} must not be negative", value)))
    }
}

// =============================================================================
// Preset loader
// =============================================================================

/// Preset loader with configurable base directory.
pub struct PresetLoader {
    base_path: PathBuf,
}

impl PresetLoader {
    /// Create a new loader with the given base path.
    ///
    /// The base path should contain `balls/`, `clubs/`, and `environments/`
    /// subdirectories.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Load a ball by name (without .yaml extension).
    pub fn load_ball(&self, name: &str) -> Result<BallProperties, ConfigError> {
        self.load("balls", name)
    }

    /// Load a club by name.
    ///
    /// # Example
    /// ```ignore
    /// let loader = PresetLoader::new("materials");
    /// let driver = loader.load_club("driver")?;
    /// ```
    pub fn load_club(&self, name: &str) -> Result<ClubConfig, ConfigError> {
        self.load("clubs", name)
    }

    /// Load flight conditions by name.
    pub fn load_environment(&self, name: &str) -> Result<FlightConfig, ConfigError> {
        self.load("environments", name)
    }

    /// Assemble and validate a full shot configuration from three presets.
    pub fn load_shot(
        &self,
        ball: &str,
        club: &str,
        environment: &str,
    ) -> Result<ShotConfig, ConfigError> {
        let config = ShotConfig {
            ball: self.load_ball(ball)?,
            club: self.load_club(club)?,
            flight: self.load_environment(environment)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// List all available balls.
    pub fn list_balls(&self) -> Result<Vec<String>, ConfigError> {
        self.list_presets("balls")
    }

    /// List all available clubs.
    pub fn list_clubs(&self) -> Result<Vec<String>, ConfigError> {
        self.list_presets("clubs")
    }

    /// List all available environments.
    pub fn list_environments(&self) -> Result<Vec<String>, ConfigError> {
        self.list_presets("environments")
    }

    fn load<T: serde::de::DeserializeOwned>(
        &self,
        subdir: &str,
        name: &str,
    ) -> Result<T, ConfigError> {
        let path = self.base_path.join(subdir).join(format!("{}.yaml", name));
        if !path.exists() {
            return Err(ConfigError::NotFound(format!("{}/{}", subdir, name)));
        }
        debug!(path = %path.display(), "loading preset");
        let contents = fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    fn list_presets(&self, subdir: &str) -> Result<Vec<String>, ConfigError> {
        let path = self.base_path.join(subdir);
        if !path.exists() {
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".yaml") {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn presets_path() -> PathBuf {
        let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(manifest_dir).join("..").join("materials")
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ShotConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_restitution_above_one() {
        let mut config = ShotConfig::default();
        config.club.restitution = 1.2;
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "club.restitution"),
            other => panic!("Expected Invalid error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_zero_radius_and_nan() {
        let mut config = ShotConfig::default();
        config.ball.radius = 0.0;
        assert!(config.validate().is_err());

        let mut config = ShotConfig::default();
        config.club.arc.tempo = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "loft: 34.0\narc:\n  tempo: 36.0\n";
        let club: ClubConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(club.loft, 34.0);
        assert_eq!(club.arc.tempo, 36.0);
        assert_eq!(club.arc.radius, ArcConfig::default().radius);
        assert_eq!(club.mass, ClubConfig::driver().mass);
    }

    #[test]
    fn test_integrator_kind_yaml_name() {
        let flight: FlightConfig = serde_yaml::from_str("integrator: velocity_verlet\n").unwrap();
        assert_eq!(flight.integrator, IntegratorKind::VelocityVerlet);
    }

    #[test]
    fn test_load_club_preset() {
        let loader = PresetLoader::new(presets_path());
        let result = loader.load_club("seven_iron");

        assert!(result.is_ok(), "Should load seven_iron: {:?}", result.err());
        let club = result.unwrap();
        assert_eq!(club.name, "7 Iron");
        assert!(club.loft > 30.0);
    }

    #[test]
    fn test_load_nonexistent_club() {
        let loader = PresetLoader::new(presets_path());
        match loader.load_club("nonexistent_club_xyz") {
            Err(ConfigError::NotFound(name)) => assert_eq!(name, "clubs/nonexistent_club_xyz"),
            other => panic!("Expected NotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_shot() {
        let loader = PresetLoader::new(presets_path());
        let config = loader.load_shot("regulation", "driver", "sea_level");
        assert!(config.is_ok(), "Should load shot: {:?}", config.err());
        let config = config.unwrap();
        assert_eq!(config.ball, BallProperties::regulation());
        assert!(config.flight.enable_lift);
    }

    #[test]
    fn test_list_presets() {
        let loader = PresetLoader::new(presets_path());
        let clubs = loader.list_clubs().unwrap();
        assert!(clubs.contains(&"driver".to_string()));
        assert!(clubs.contains(&"seven_iron".to_string()));

        let environments = loader.list_environments().unwrap();
        assert_eq!(environments, vec!["sea_level".to_string(), "vacuum".to_string()]);
    }
}
