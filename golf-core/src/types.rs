//! Core types for the shot simulation.
//!
//! All units are SI:
//! - Position: meters (m)
//! - Velocity: meters per second (m/s)
//! - Angular velocity (spin): radians per second (rad/s)
//! - Mass: kilograms (kg)
//!
//! Angles handed across module boundaries (loft, path, launch angle...) are in
//! degrees. Trigonometry converts at the point of use.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

// =============================================================================
// Vec3 - 3D Vector
// =============================================================================

/// A 3D vector used for positions, velocities and spin.
///
/// Coordinate system:
/// - X: horizontal, lateral (positive to the right of the target line)
/// - Y: vertical (positive upward)
/// - Z: horizontal, along the target line (positive toward the target)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const X: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const Y: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared magnitude (avoids sqrt for comparisons)
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Magnitude (length) of the vector
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Returns a unit vector in the same direction, or zero if magnitude is zero
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag < 1e-10 {
            Self::ZERO
        } else {
            *self / mag
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Projection onto the ground plane (y dropped)
    pub fn horizontal(&self) -> Self {
        Self::new(self.x, 0.0, self.z)
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).magnitude()
    }

    /// Angle to another vector in radians, in `[0, π]`.
    ///
    /// Returns zero when either vector is degenerate.
    pub fn angle_to(&self, other: &Self) -> f64 {
        let a = self.normalized();
        let b = other.normalized();
        if a == Self::ZERO || b == Self::ZERO {
            return 0.0;
        }
        a.dot(&b).clamp(-1.0, 1.0).acos()
    }

    /// Rotate around `axis` by `angle` radians (right-hand rule, Rodrigues).
    pub fn rotated_about(&self, axis: &Self, angle: f64) -> Self {
        let k = axis.normalized();
        if k == Self::ZERO {
            return *self;
        }
        let (sin, cos) = angle.sin_cos();
        *self * cos + k.cross(self) * sin + k * (k.dot(self) * (1.0 - cos))
    }

    /// Heading about the vertical axis in degrees, measured from +Z toward +X.
    ///
    /// Zero when the horizontal component is negligible.
    pub fn heading_degrees(&self) -> f64 {
        let h = self.horizontal();
        if h.magnitude() < 1e-6 {
            return 0.0;
        }
        self.x.atan2(self.z).to_degrees()
    }

    /// Elevation above the ground plane in degrees.
    pub fn elevation_degrees(&self) -> f64 {
        self.y.atan2(self.horizontal().magnitude()).to_degrees()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// Operator overloads for Vec3
impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

// =============================================================================
// Quat - Orientation
// =============================================================================

/// Unit quaternion describing an orientation.
///
/// Local axes follow the world convention: local +Z is "forward", local +Y is
/// "up". The club head's forward axis is the direction its face points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quat {
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Rotation of `angle` radians around `axis`.
    pub fn from_axis_angle(axis: &Vec3, angle: f64) -> Self {
        let k = axis.normalized();
        if k == Vec3::ZERO {
            return Self::IDENTITY;
        }
        let (sin, cos) = (angle * 0.5).sin_cos();
        Self {
            x: k.x * sin,
            y: k.y * sin,
            z: k.z * sin,
            w: cos,
        }
    }

    /// Orientation whose forward axis points along `forward` with its up axis
    /// as close to `up` as possible.
    ///
    /// Returns `None` when `forward` is degenerate.
    pub fn look_rotation(forward: &Vec3, up: &Vec3) -> Option<Self> {
        let f = forward.normalized();
        if f == Vec3::ZERO {
            return None;
        }
        let mut r = up.cross(&f).normalized();
        if r == Vec3::ZERO {
            // forward is parallel to up
            r = Vec3::X.cross(&f).cross(&f).normalized();
            if r == Vec3::ZERO {
                r = Vec3::Z;
            }
        }
        let u = f.cross(&r);

        // Rotation matrix with columns (r, u, f)
        let (m00, m01, m02) = (r.x, u.x, f.x);
        let (m10, m11, m12) = (r.y, u.y, f.y);
        let (m20, m21, m22) = (r.z, u.z, f.z);

        let trace = m00 + m11 + m22;
        let q = if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self {
                w: 0.25 * s,
                x: (m21 - m12) / s,
                y: (m02 - m20) / s,
                z: (m10 - m01) / s,
            }
        } else if m00 > m11 && m00 > m22 {
            let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
            Self {
                w: (m21 - m12) / s,
                x: 0.25 * s,
                y: (m01 + m10) / s,
                z: (m02 + m20) / s,
            }
        } else if m11 > m22 {
            let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
            Self {
                w: (m02 - m20) / s,
                x: (m01 + m10) / s,
                y: 0.25 * s,
                z: (m12 + m21) / s,
            }
        } else {
            let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
            Self {
                w: (m10 - m01) / s,
                x: (m02 + m20) / s,
                y: (m12 + m21) / s,
                z: 0.25 * s,
            }
        };
        Some(q.normalized())
    }

    pub fn normalized(&self) -> Self {
        let mag = (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt();
        if mag < 1e-10 {
            Self::IDENTITY
        } else {
            Self {
                x: self.x / mag,
                y: self.y / mag,
                z: self.z / mag,
                w: self.w / mag,
            }
        }
    }

    /// Rotate a vector by this orientation.
    pub fn rotate(&self, v: &Vec3) -> Vec3 {
        let q = Vec3::new(self.x, self.y, self.z);
        let t = q.cross(v) * 2.0;
        *v + t * self.w + q.cross(&t)
    }

    /// Local +Z axis in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotate(&Vec3::Z)
    }
}

impl Mul for Quat {
    type Output = Self;
    /// Hamilton product: `a * b` applies `b` first, then `a`.
    fn mul(self, b: Self) -> Self {
        let a = self;
        Self {
            w: a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
            x: a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            y: a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            z: a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
        }
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// =============================================================================
// Ball State
// =============================================================================

/// Kinematic state of the ball at a given instant.
///
/// The spin vector encodes both the axis and magnitude of rotation:
/// - Direction: axis of rotation (right-hand rule)
/// - Magnitude: angular velocity in rad/s
///
/// For a ball flying toward +Z, pure backspin points along -X.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub pos: Vec3,
    pub vel: Vec3,
    pub spin: Vec3,
}

impl BallState {
    pub fn new(pos: Vec3, vel: Vec3, spin: Vec3) -> Self {
        Self { pos, vel, spin }
    }

    /// Ball at rest at a given position
    pub fn at_rest(pos: Vec3) -> Self {
        Self {
            pos,
            vel: Vec3::ZERO,
            spin: Vec3::ZERO,
        }
    }
}

impl Default for BallState {
    fn default() -> Self {
        Self::at_rest(Vec3::ZERO)
    }
}

// =============================================================================
// Ball Properties
// =============================================================================

/// Physical properties of a golf ball.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallProperties {
    pub name: String,
    pub mass: f64,
    pub radius: f64,
}

impl BallProperties {
    /// Regulation ball at the USGA limits (45.93 g, 42.67 mm diameter).
    pub fn regulation() -> Self {
        Self {
            name: "Regulation".to_string(),
            mass: 0.04593,
            radius: 0.021335,
        }
    }

    /// Cross-sectional area (πr²)
    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
}

impl Default for BallProperties {
    fn default() -> Self {
        Self::regulation()
    }
}

// =============================================================================
// Physical Constants
// =============================================================================

/// Physical constants used in the simulation.
pub mod constants {
    /// Gravitational acceleration (m/s²)
    pub const GRAVITY: f64 = 9.81;

    /// Air density at sea level, 15°C (kg/m³)
    pub const AIR_DENSITY: f64 = 1.225;

    /// Small value for floating-point comparisons
    pub const EPSILON: f64 = 1e-10;

    /// rad/s → revolutions per minute
    pub const RAD_PER_SEC_TO_RPM: f64 = 60.0 / (2.0 * std::f64::consts::PI);

    /// Meters → yards
    pub const METERS_TO_YARDS: f64 = 1.0 / 0.9144;

    /// m/s → miles per hour
    pub const MS_TO_MPH: f64 = 1.0 / 0.44704;
}

// =============================================================================
// Tests
// =============================================================================
