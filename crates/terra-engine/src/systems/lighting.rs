//! Directional sun light for the host's lit (Phong) materials.
//!
//! The light sits at `sun_direction × distance` and shines towards the
//! origin. It is re-aimed every frame from the pose mapper's sun direction.

use bytemuck::{Pod, Zeroable};
use glam::{DVec3, Vec3};

/// Default distance of the light from the origin, in scene units.
pub const DEFAULT_SUN_DISTANCE: f32 = 5.0;

/// Wire format (8 floats / 32 bytes):
/// `[x, y, z, intensity, r, g, b, distance]`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SunLight {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub intensity: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub distance: f32,
}

impl SunLight {
    pub const FLOATS: usize = 8;

    /// A light on +X at `distance`, matching the un-animated scene.
    pub fn new(color: [f32; 3], intensity: f32, distance: f32) -> Self {
        Self {
            x: distance,
            y: 0.0,
            z: 0.0,
            intensity,
            r: color[0],
            g: color[1],
            b: color[2],
            distance,
        }
    }

    /// Place the light along a unit world-space direction.
    pub fn point_along(&mut self, direction: DVec3) {
        let p = direction.normalize_or(DVec3::X).as_vec3() * self.distance;
        self.x = p.x;
        self.y = p.y;
        self.z = p.z;
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Unit vector from the origin towards the light.
    pub fn direction(&self) -> Vec3 {
        self.position().normalize_or(Vec3::X)
    }
}

impl Default for SunLight {
    fn default() -> Self {
        Self::new([1.0, 1.0, 1.0], 1.0, DEFAULT_SUN_DISTANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sits_on_positive_x() {
        let sun = SunLight::default();
        assert_eq!(sun.position(), Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(sun.direction(), Vec3::X);
    }

    #[test]
    fn point_along_scales_by_distance() {
        let mut sun = SunLight::new([1.0; 3], 1.0, 5.0);
        sun.point_along(DVec3::new(0.0, 0.6, 0.8));
        assert!((sun.position() - Vec3::new(0.0, 3.0, 4.0)).length() < 1e-5);
        assert!((sun.direction().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_direction_falls_back_to_x() {
        let mut sun = SunLight::default();
        sun.point_along(DVec3::ZERO);
        assert_eq!(sun.position(), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn sun_light_is_8_floats() {
        assert_eq!(std::mem::size_of::<SunLight>(), SunLight::FLOATS * 4);
    }
}
