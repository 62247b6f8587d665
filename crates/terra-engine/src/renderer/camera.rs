use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Perspective camera orbiting a look-at target.
///
/// The host's orbit controls own the camera between flights and report
/// each user-driven pose back; during a fly-to the viewer drives it.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    /// Point the camera looks at (the orbit-controls target).
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// GPU-side uniform data for the camera (36 floats).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// xyz = eye position, w = 1.
    pub position: [f32; 4],
}

impl CameraUniform {
    pub const FLOATS: usize = 36;
}

impl Camera3D {
    pub fn new(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_deg,
            aspect,
            near,
            far,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Pose reported by the host controls.
    pub fn set_pose(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
    }

    /// World-to-view matrix (three.js `matrixWorldInverse`).
    pub fn view_matrix(&self) -> Mat4 {
        let forward = self.target - self.position;
        if forward.length_squared() < 1e-12 {
            return Mat4::from_translation(-self.position);
        }
        // Looking straight along `up` makes look_at degenerate; pick another up.
        let up = if forward.cross(self.up).length_squared() < 1e-12 {
            Vec3::Z
        } else {
            self.up
        };
        Mat4::look_at_rh(self.position, self.target, up)
    }

    /// OpenGL-style perspective projection (clip z in [-1, 1]).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view: self.view_matrix().to_cols_array_2d(),
            projection: self.projection_matrix().to_cols_array_2d(),
            position: self.position.extend(1.0).to_array(),
        }
    }

    /// Resize the viewport (e.g. on window resize). Zero-sized viewports
    /// (minimized windows) keep the previous aspect.
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        if viewport_width > 0.0 && viewport_height > 0.0 {
            self.aspect = viewport_width / viewport_height;
        }
    }

    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Slide the eye along the target ray so its distance stays within
    /// `[min, max]`. A camera sitting on its target is left alone.
    pub fn clamp_distance(&mut self, min: f32, max: f32) {
        let distance = self.distance_to_target();
        if distance <= f32::EPSILON {
            return;
        }
        let clamped = distance.clamp(min, max);
        if clamped != distance {
            self.position = self.target + (self.position - self.target) * (clamped / distance);
        }
    }
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::new(75.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_view_looks_down_negative_z() {
        let cam = Camera3D::default();
        let view = cam.view_matrix();
        // The origin sits 5 units in front of the eye.
        let origin_in_view = view.transform_point3(Vec3::ZERO);
        assert!((origin_in_view - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-5);
    }

    #[test]
    fn clamp_distance_keeps_direction() {
        let mut cam = Camera3D::default();
        cam.set_pose(Vec3::new(0.0, 0.0, 0.5), Vec3::ZERO);
        cam.clamp_distance(1.5, 50.0);
        assert!((cam.position - Vec3::new(0.0, 0.0, 1.5)).length() < 1e-5);

        cam.set_pose(Vec3::new(1.0, 100.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        cam.clamp_distance(1.5, 50.0);
        assert!((cam.position - Vec3::new(1.0, 50.0, 0.0)).length() < 1e-4);

        cam.set_pose(Vec3::new(3.0, 0.0, 4.0), Vec3::ZERO);
        cam.clamp_distance(1.5, 50.0);
        assert_eq!(cam.position, Vec3::new(3.0, 0.0, 4.0));
    }

    #[test]
    fn resize_updates_aspect() {
        let mut cam = Camera3D::default();
        cam.resize(1920.0, 1080.0);
        assert!((cam.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        cam.resize(800.0, 0.0);
        assert!((cam.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn view_is_finite_when_looking_along_up() {
        let mut cam = Camera3D::default();
        cam.set_pose(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO);
        assert!(cam.view_matrix().is_finite());
        cam.set_pose(Vec3::ZERO, Vec3::ZERO);
        assert!(cam.view_matrix().is_finite());
    }

    #[test]
    fn uniform_carries_position() {
        let cam = Camera3D::default().with_position(Vec3::new(1.0, 2.0, 3.0));
        let u = cam.uniform();
        assert_eq!(u.position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(std::mem::size_of::<CameraUniform>(), CameraUniform::FLOATS * 4);
    }

    #[test]
    fn projection_is_perspective() {
        let cam = Camera3D::default();
        let cols = cam.projection_matrix().to_cols_array_2d();
        // Perspective divide: w' = -z.
        assert!((cols[2][3] + 1.0).abs() < 1e-6);
        assert_eq!(cols[3][3], 0.0);
    }
}
