//! Swing stepping and impact generation.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::{ClubConfig, FaceNormalModel};
use crate::swing::arc::SwingArc;
use crate::swing::detection::sweep_segment;
use crate::types::{Quat, Vec3};

/// Floor for the arc radius when converting tempo into an angular rate.
const MIN_ARC_RADIUS: f64 = 1e-4;

/// Finite-difference tangents shorter than this keep the previous orientation.
const MIN_TANGENT: f64 = 1e-6;

/// Angular probe used to orient the head at the start of the swing (deg).
const START_PROBE_ANGLE: f64 = 0.01;

/// Contact between club head and ball, produced at most once per swing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactEvent {
    /// Impact point on the club face
    pub position: Vec3,
    /// Club head velocity at contact (m/s)
    pub club_velocity: Vec3,
    /// Unit normal of the club face
    pub face_normal: Vec3,
    /// Vertical angle of head travel (deg, negative = descending)
    pub attack_angle: f64,
    /// Static face angle from the club setup (deg)
    pub face_angle: f64,
}

/// Club head pose and motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClubHeadState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub orientation: Quat,
}

/// Progress of the current swing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingState {
    /// Current arc angle (deg)
    pub angle: f64,
    /// +1 or -1, direction of travel along the arc
    pub direction: f64,
    pub swinging: bool,
    pub impact_fired: bool,
    pub head: ClubHeadState,
}

/// Drives the club head along its arc and detects contact with the ball.
#[derive(Debug, Clone)]
pub struct SwingKinematics {
    club: ClubConfig,
    arc: SwingArc,
    state: SwingState,
}

impl SwingKinematics {
    /// Create a swing for a ball resting at `ball_position`.
    pub fn new(club: ClubConfig, ball_position: Vec3) -> Self {
        let arc = SwingArc::for_ball(&club, ball_position);
        let state = Self::initial_state(&club, &arc);
        Self { club, arc, state }
    }

    pub fn club(&self) -> &ClubConfig {
        &self.club
    }

    pub fn arc(&self) -> &SwingArc {
        &self.arc
    }

    pub fn state(&self) -> &SwingState {
        &self.state
    }

    pub fn head(&self) -> &ClubHeadState {
        &self.state.head
    }

    pub fn is_swinging(&self) -> bool {
        self.state.swinging
    }

    pub fn impact_fired(&self) -> bool {
        self.state.impact_fired
    }

    /// Re-anchor the arc for a ball at `ball_position` and reset.
    pub fn prepare(&mut self, ball_position: Vec3) {
        self.arc = SwingArc::for_ball(&self.club, ball_position);
        self.reset();
    }

    /// Return to the start angle, not swinging, flags cleared.
    pub fn reset(&mut self) {
        self.state = Self::initial_state(&self.club, &self.arc);
    }

    /// Begin a swing from the start angle.
    pub fn start_swing(&mut self) {
        self.reset();
        self.state.swinging = true;
        debug!(
            start = self.club.arc.start_angle,
            end = self.club.arc.end_angle,
            "swing started"
        );
    }

    /// Advance the swing by `dt`, firing on any contact with the ball.
    pub fn advance(&mut self, dt: f64, ball_position: Vec3) -> Option<ImpactEvent> {
        self.advance_with(dt, ball_position, |_| true)
    }

    /// Advance the swing by `dt`.
    ///
    /// A contact found this tick is offered to `accept`. Only an accepted
    /// contact marks the swing as fired and is returned; a rejected one leaves
    /// the swing armed for later ticks.
    pub fn advance_with<F>(&mut self, dt: f64, ball_position: Vec3, accept: F) -> Option<ImpactEvent>
    where
        F: FnOnce(&ImpactEvent) -> bool,
    {
        if !self.state.swinging || !dt.is_finite() || dt <= 0.0 {
            return None;
        }

        let arc_cfg = &self.club.arc;
        let step = (arc_cfg.tempo * dt / arc_cfg.radius.max(MIN_ARC_RADIUS)).to_degrees()
            * self.state.direction;

        let mut next_angle = self.state.angle + step;
        let overshoot = (next_angle - arc_cfg.end_angle) * self.state.direction;
        let finished = overshoot >= 0.0;
        if finished {
            next_angle = arc_cfg.end_angle;
        }

        let prev = self.state.head.position;
        let next = self.arc.world_position(next_angle);
        let velocity = (next - prev) / dt;

        let tangent = next - prev;
        if tangent.magnitude() > MIN_TANGENT {
            if let Some(orientation) = self.face_orientation(&tangent) {
                self.state.head.orientation = orientation;
            }
        }
        self.state.head.position = next;
        self.state.head.velocity = velocity;
        self.state.angle = next_angle;

        trace!(angle = next_angle, speed = velocity.magnitude(), "swing tick");

        let mut fired = None;
        if !self.state.impact_fired {
            if let Some(hit) = sweep_segment(prev, next, ball_position, arc_cfg.detection_radius) {
                let event = self.impact_event(hit.point, velocity);
                if accept(&event) {
                    self.state.impact_fired = true;
                    debug!(
                        speed = velocity.magnitude(),
                        attack_angle = event.attack_angle,
                        miss_distance = hit.distance,
                        "impact fired"
                    );
                    fired = Some(event);
                }
            }
        }

        if finished {
            self.state.swinging = false;
            debug!(impact_fired = self.state.impact_fired, "swing finished");
        }

        fired
    }

    /// Stop the swing where it is, keeping the head in place.
    pub fn halt(&mut self) {
        self.state.swinging = false;
    }

    fn impact_event(&self, head_position: Vec3, velocity: Vec3) -> ImpactEvent {
        let orientation = self.state.head.orientation;
        let face_normal = match self.club.face_normal_model {
            FaceNormalModel::HeadForward => orientation.forward(),
            FaceNormalModel::Lofted => lofted_face_normal(&self.club, &velocity)
                .unwrap_or_else(|| orientation.forward()),
        };

        ImpactEvent {
            position: head_position + orientation.rotate(&self.club.arc.impact_point_offset),
            club_velocity: velocity,
            face_normal,
            attack_angle: velocity.elevation_degrees(),
            face_angle: self.club.face_angle,
        }
    }

    /// Look along `tangent`, then turn about the head's up axis by the face angle.
    fn face_orientation(&self, tangent: &Vec3) -> Option<Quat> {
        let look = Quat::look_rotation(tangent, &Vec3::Y)?;
        let face = Quat::from_axis_angle(&Vec3::Y, self.club.face_angle.to_radians());
        Some(look * face)
    }

    fn initial_state(club: &ClubConfig, arc: &SwingArc) -> SwingState {
        let direction = (club.arc.end_angle - club.arc.start_angle).signum();
        let start = club.arc.start_angle;
        let position = arc.world_position(start);
        let probe = arc.world_position(start + START_PROBE_ANGLE * direction);

        let look = Quat::look_rotation(&(probe - position), &Vec3::Y).unwrap_or_default();
        let face = Quat::from_axis_angle(&Vec3::Y, club.face_angle.to_radians());

        SwingState {
            angle: start,
            direction,
            swinging: false,
            impact_fired: false,
            head: ClubHeadState {
                position,
                velocity: Vec3::ZERO,
                orientation: look * face,
            },
        }
    }
}

/// Face normal for the lofted model.
///
/// The velocity direction is pitched up by the static loft, then turned about
/// vertical so its heading equals the face angle. `None` for a still head.
pub fn lofted_face_normal(club: &ClubConfig, velocity: &Vec3) -> Option<Vec3> {
    let dir = velocity.normalized();
    if dir == Vec3::ZERO {
        return None;
    }
    let pitch_axis = dir.cross(&Vec3::Y);
    let lofted = dir.rotated_about(&pitch_axis, club.loft.to_radians());
    let yaw = (club.face_angle - dir.heading_degrees()).to_radians();
    Some(lofted.rotated_about(&Vec3::Y, yaw).normalized())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 240.0;

    fn ball_at_origin() -> Vec3 {
        Vec3::new(0.0, 0.021335, 0.0)
    }

    fn run_swing(swing: &mut SwingKinematics, ball: Vec3) -> Vec<ImpactEvent> {
        swing.start_swing();
        let mut events = Vec::new();
        let mut ticks = 0;
        while swing.is_swinging() && ticks < 10_000 {
            if let Some(event) = swing.advance(DT, ball) {
                events.push(event);
            }
            ticks += 1;
        }
        events
    }

    #[test]
    fn test_start_swing_seats_head() {
        let club = ClubConfig::driver();
        let mut swing = SwingKinematics::new(club.clone(), ball_at_origin());
        swing.start_swing();

        let state = swing.state();
        assert!(state.swinging);
        assert!(!state.impact_fired);
        assert_eq!(state.angle, club.arc.start_angle);
        assert_eq!(state.direction, 1.0);
        assert_eq!(state.head.velocity, Vec3::ZERO);
        assert_eq!(state.head.position, swing.arc().world_position(club.arc.start_angle));
    }

    #[test]
    fn test_advance_before_start_is_noop() {
        let mut swing = SwingKinematics::new(ClubConfig::driver(), ball_at_origin());
        let before = *swing.state();
        assert!(swing.advance(DT, ball_at_origin()).is_none());
        assert_eq!(*swing.state(), before);
    }

    #[test]
    fn test_angular_step_from_tempo() {
        let club = ClubConfig::driver();
        let mut swing = SwingKinematics::new(club.clone(), Vec3::new(50.0, 0.0, 0.0));
        swing.start_swing();
        swing.advance(DT, Vec3::new(50.0, 0.0, 0.0));

        let expected = club.arc.start_angle + (club.arc.tempo * DT / club.arc.radius).to_degrees();
        assert!((swing.state().angle - expected).abs() < 1e-9);
    }

    #[test]
    fn test_exactly_one_impact_per_swing() {
        let mut club = ClubConfig::driver();
        // Huge detection radius keeps the ball in range for many ticks
        club.arc.detection_radius = 0.5;
        let mut swing = SwingKinematics::new(club, ball_at_origin());

        let events = run_swing(&mut swing, ball_at_origin());
        assert_eq!(events.len(), 1);
        assert!(swing.impact_fired());
        assert!(!swing.is_swinging());
    }

    #[test]
    fn test_swing_ends_clamped_at_end_angle() {
        let club = ClubConfig::driver();
        let mut swing = SwingKinematics::new(club.clone(), ball_at_origin());
        run_swing(&mut swing, ball_at_origin());
        assert_eq!(swing.state().angle, club.arc.end_angle);
        // Further ticks are ignored
        assert!(swing.advance(DT, ball_at_origin()).is_none());
        assert_eq!(swing.state().angle, club.arc.end_angle);
    }

    #[test]
    fn test_reverse_direction_swing() {
        let mut club = ClubConfig::driver();
        club.arc.start_angle = 120.0;
        club.arc.end_angle = -120.0;
        let mut swing = SwingKinematics::new(club, ball_at_origin());

        let events = run_swing(&mut swing, ball_at_origin());
        assert_eq!(swing.state().direction, -1.0);
        assert_eq!(events.len(), 1);
        assert!(events[0].club_velocity.z < 0.0, "head should travel toward -Z");
    }

    #[test]
    fn test_missed_ball_fires_nothing() {
        let mut swing = SwingKinematics::new(ClubConfig::driver(), ball_at_origin());
        // Ball moved well away from the arc after the arc was anchored
        let events = run_swing(&mut swing, Vec3::new(1.0, 0.02, 0.0));
        assert!(events.is_empty());
        assert!(!swing.impact_fired());
    }

    #[test]
    fn test_rejected_contact_stays_armed() {
        let mut club = ClubConfig::driver();
        club.arc.detection_radius = 0.5;
        let mut swing = SwingKinematics::new(club, ball_at_origin());
        swing.start_swing();

        let mut offers = 0;
        let mut fired = None;
        while swing.is_swinging() && fired.is_none() {
            fired = swing.advance_with(DT, ball_at_origin(), |_| {
                offers += 1;
                offers >= 2
            });
        }

        assert_eq!(offers, 2, "first contact rejected, second accepted");
        assert!(fired.is_some());
        assert!(swing.impact_fired());
    }

    #[test]
    fn test_impact_geometry_at_low_point() {
        let club = ClubConfig::driver();
        let mut swing = SwingKinematics::new(club.clone(), ball_at_origin());
        let events = run_swing(&mut swing, ball_at_origin());
        let event = events[0];

        let speed = event.club_velocity.magnitude();
        assert!(
            (speed - club.arc.tempo).abs() < 1.0,
            "head speed near the low point should match tempo, got {}",
            speed
        );
        assert!(event.attack_angle.abs() < 15.0);
        assert_eq!(event.face_angle, club.face_angle);
        assert!((event.face_normal.magnitude() - 1.0).abs() < 1e-9);
        // Lofted face points up and forward
        assert!(event.face_normal.y > 0.0 && event.face_normal.z > 0.0);
    }

    #[test]
    fn test_descending_blow_with_forward_low_point() {
        let mut club = ClubConfig::driver();
        club.arc.low_point_offset = 0.1;
        let mut swing = SwingKinematics::new(club, ball_at_origin());
        let events = run_swing(&mut swing, ball_at_origin());
        assert!(events[0].attack_angle < 0.0, "got {}", events[0].attack_angle);
    }

    #[test]
    fn test_lofted_face_normal() {
        let club = ClubConfig {
            loft: 10.5,
            face_angle: 3.0,
            ..ClubConfig::driver()
        };
        let attack = (-2.0_f64).to_radians();
        let velocity = Vec3::new(0.0, attack.sin(), attack.cos()) * 44.7;

        let n = lofted_face_normal(&club, &velocity).unwrap();
        assert!((n.elevation_degrees() - 8.5).abs() < 1e-9);
        assert!((n.heading_degrees() - 3.0).abs() < 1e-9);
        assert!(lofted_face_normal(&club, &Vec3::ZERO).is_none());
    }

    #[test]
    fn test_head_forward_model_uses_face_angle() {
        let club = ClubConfig {
            face_angle: 5.0,
            face_normal_model: FaceNormalModel::HeadForward,
            ..ClubConfig::driver()
        };
        let mut swing = SwingKinematics::new(club, ball_at_origin());
        let events = run_swing(&mut swing, ball_at_origin());
        let n = events[0].face_normal;
        let path = events[0].club_velocity.heading_degrees();
        assert!((n.heading_degrees() - path - 5.0).abs() < 0.5);
    }

    #[test]
    fn test_impact_position_offset_from_head() {
        let mut club = ClubConfig::driver();
        club.arc.impact_point_offset = Vec3::new(0.0, 0.0, 0.02);
        let mut swing = SwingKinematics::new(club, ball_at_origin());
        let events = run_swing(&mut swing, ball_at_origin());
        // The reported point is ahead of the head path, not on the ball center
        assert!(events[0].position.distance(&ball_at_origin()) > 0.0);
        assert!(events[0].position.z > -0.05);
    }

    #[test]
    fn test_stalled_head_keeps_orientation() {
        let mut club = ClubConfig::driver();
        club.arc.tempo = 1e-9;
        let mut swing = SwingKinematics::new(club, ball_at_origin());
        swing.start_swing();
        let start = *swing.head();

        swing.advance(DT, ball_at_origin());

        let head = swing.head();
        assert_eq!(head.orientation, start.orientation);
        assert!(head.position.is_finite());
        assert!(head.velocity.is_finite());
        assert!(swing.is_swinging());
    }

    #[test]
    fn test_reset_clears_flags() {
        let mut club = ClubConfig::driver();
        club.arc.detection_radius = 0.5;
        let mut swing = SwingKinematics::new(club.clone(), ball_at_origin());
        run_swing(&mut swing, ball_at_origin());

        swing.reset();
        let state = swing.state();
        assert!(!state.swinging);
        assert!(!state.impact_fired);
        assert_eq!(state.angle, club.arc.start_angle);
        assert_eq!(state.head.velocity, Vec3::ZERO);
    }
}
