// extensions/flight.rs
//
// Camera fly-to: tweens the camera position and its look-at target towards
// a body over a fixed duration, then snaps to the end pose.
//
// Usage:
//   flights.start(CameraFlight::towards(target, &camera, body_pos, offset, 2.0, Easing::CubicInOut));
//   if let Some(done) = flights.tick(dt_s, &mut camera) { /* emit event */ }

use glam::Vec3;
use super::easing::{ease_vec3, Easing};
use crate::renderer::camera::Camera3D;

/// What a flight is heading for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightTarget {
    Earth,
    /// Orbiting body `n` of the pose mapper (0 = Moon, then satellites).
    Body(usize),
}

impl FlightTarget {
    /// Event payload encoding: -1 = Earth, n = body n.
    pub fn event_code(self) -> f32 {
        match self {
            FlightTarget::Earth => -1.0,
            FlightTarget::Body(index) => index as f32,
        }
    }
}

/// A single camera flight.
#[derive(Debug, Clone)]
pub struct CameraFlight {
    pub target: FlightTarget,
    from_position: Vec3,
    to_position: Vec3,
    from_look: Vec3,
    to_look: Vec3,
    /// Duration in seconds.
    pub duration: f32,
    /// Elapsed time in seconds.
    pub elapsed: f32,
    pub easing: Easing,
}

impl CameraFlight {
    /// Fly from the camera's current pose to `body_position + offset`,
    /// turning to look at `body_position`. The body position is sampled
    /// once, at flight start.
    pub fn towards(
        target: FlightTarget,
        camera: &Camera3D,
        body_position: Vec3,
        offset: Vec3,
        duration: f32,
        easing: Easing,
    ) -> Self {
        Self {
            target,
            from_position: camera.position,
            to_position: body_position + offset,
            from_look: camera.target,
            to_look: body_position,
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing,
        }
    }

    /// Normalized progress [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advance and write the eased pose into `camera`. Returns true on the
    /// tick that finishes the flight, which places the camera exactly on
    /// the end pose.
    fn advance(&mut self, dt: f32, camera: &mut Camera3D) -> bool {
        self.elapsed += dt.max(0.0);
        if self.is_complete() {
            camera.set_pose(self.to_position, self.to_look);
            return true;
        }
        let t = self.progress();
        camera.set_pose(
            ease_vec3(self.from_position, self.to_position, t, self.easing),
            ease_vec3(self.from_look, self.to_look, t, self.easing),
        );
        false
    }
}

/// Holds at most one active flight. Starting a new flight replaces the old one.
#[derive(Debug, Default)]
pub struct FlightController {
    active: Option<CameraFlight>,
}

impl FlightController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, flight: CameraFlight) {
        if let Some(old) = self.active.replace(flight) {
            log::debug!("flight to {:?} replaced", old.target);
        }
    }

    /// Drop the active flight (manual camera input). Returns its target.
    pub fn cancel(&mut self) -> Option<FlightTarget> {
        self.active.take().map(|flight| flight.target)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&CameraFlight> {
        self.active.as_ref()
    }

    /// Advance the active flight by `dt` seconds of real time. Returns the
    /// target when the flight completes on this tick.
    pub fn tick(&mut self, dt: f32, camera: &mut Camera3D) -> Option<FlightTarget> {
        let flight = self.active.as_mut()?;
        if flight.advance(dt, camera) {
            return self.active.take().map(|f| f.target);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight_to(body: Vec3, duration: f32) -> (Camera3D, FlightController) {
        let camera = Camera3D::default();
        let mut flights = FlightController::new();
        flights.start(CameraFlight::towards(
            FlightTarget::Body(0),
            &camera,
            body,
            Vec3::new(0.0, 0.5, 2.0),
            duration,
            Easing::CubicInOut,
        ));
        (camera, flights)
    }

    #[test]
    fn reaches_offset_and_snaps() {
        let body = Vec3::new(5.0, 0.0, 0.0);
        let (mut camera, mut flights) = flight_to(body, 2.0);

        assert_eq!(flights.tick(1.0, &mut camera), None);
        // Halfway in time is halfway in space for cubic in-out.
        let mid = Vec3::new(0.0, 0.0, 5.0).lerp(Vec3::new(5.0, 0.5, 2.0), 0.5);
        assert!((camera.position - mid).length() < 1e-5);

        assert_eq!(flights.tick(1.5, &mut camera), Some(FlightTarget::Body(0)));
        assert_eq!(camera.position, Vec3::new(5.0, 0.5, 2.0));
        assert_eq!(camera.target, body);
        assert!(!flights.is_active());
        assert_eq!(flights.tick(1.0, &mut camera), None);
    }

    #[test]
    fn early_progress_is_slow() {
        let (mut camera, mut flights) = flight_to(Vec3::new(5.0, 0.0, 0.0), 2.0);
        flights.tick(0.2, &mut camera);
        let moved = camera.position.distance(Vec3::new(0.0, 0.0, 5.0));
        let total = Vec3::new(0.0, 0.0, 5.0).distance(Vec3::new(5.0, 0.5, 2.0));
        assert!(moved / total < 0.01, "moved {moved} of {total}");
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let (mut camera, mut flights) = flight_to(Vec3::ZERO, 0.0);
        assert_eq!(flights.tick(0.0, &mut camera), Some(FlightTarget::Body(0)));
        assert_eq!(camera.position, Vec3::new(0.0, 0.5, 2.0));
    }

    #[test]
    fn cancel_leaves_camera_where_it_is() {
        let (mut camera, mut flights) = flight_to(Vec3::new(5.0, 0.0, 0.0), 2.0);
        flights.tick(0.5, &mut camera);
        let pos = camera.position;
        assert_eq!(flights.cancel(), Some(FlightTarget::Body(0)));
        assert_eq!(flights.tick(1.0, &mut camera), None);
        assert_eq!(camera.position, pos);
    }

    #[test]
    fn new_flight_replaces_old() {
        let (mut camera, mut flights) = flight_to(Vec3::new(5.0, 0.0, 0.0), 2.0);
        flights.start(CameraFlight::towards(
            FlightTarget::Earth,
            &camera,
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 3.0),
            1.0,
            Easing::Linear,
        ));
        assert_eq!(flights.tick(1.0, &mut camera), Some(FlightTarget::Earth));
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn event_codes() {
        assert_eq!(FlightTarget::Earth.event_code(), -1.0);
        assert_eq!(FlightTarget::Body(2).event_code(), 2.0);
    }
}
