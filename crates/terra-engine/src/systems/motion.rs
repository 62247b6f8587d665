//! Motion system: writes one frame's poses into the scene entities.

use crate::components::entity::Motion;
use crate::core::scene::Scene;
use crate::sim::ephemeris::FramePoses;

/// Apply the mapper output to every entity according to its `Motion`.
///
/// Call once per frame after `compute_poses`. Orbit indices without a
/// matching pose leave the entity untouched.
pub fn apply_poses(scene: &mut Scene, poses: &FramePoses) {
    for entity in scene.iter_mut() {
        match entity.motion {
            Motion::Static => {}
            Motion::EarthSpin => entity.rotation.y = poses.earth.spin as f32,
            Motion::CloudSpin => entity.rotation.y = poses.earth.clouds as f32,
            Motion::Orbit(index) => {
                if let Some(body) = poses.bodies.get(index) {
                    entity.pos = body.position.as_vec3();
                }
            }
        }
    }
}
