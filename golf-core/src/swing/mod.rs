//! Club head motion along the swing arc and contact with the ball.
//!
//! This module handles:
//! - **Arc**: Geometry of the swing plane and the head position per arc angle
//! - **Detection**: Closest approach of the head's path segment to the ball
//! - **Kinematics**: Stepping the head through the swing and firing the impact
//!
//! ## Swept Segment Test
//!
//! At full speed the head covers ~20cm per frame, so testing the head position
//! alone would step straight over the ball. Instead the segment travelled
//! during the tick is tested against the ball center.
//!
//! ```text
//! prev                        next
//!   ●───────────┬──────────────●
//!               │ d ≤ detection radius
//!               ○ ball
//! ```

pub mod arc;
pub mod detection;
pub mod kinematics;

pub use arc::*;
pub use detection::*;
pub use kinematics::*;
