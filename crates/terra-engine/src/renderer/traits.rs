//! Scene-graph backend contract.
//!
//! All drawing happens in the host (three.js/WebGL): meshes, materials and
//! textures live there. The viewer only pushes poses, the Earth material's
//! uniforms and the camera/light state through this trait, once per frame.

use glam::Vec3;
use crate::api::types::EntityId;
use crate::renderer::camera::Camera3D;
use crate::sim::shading::EarthUniforms;
use crate::systems::lighting::SunLight;

/// The retained scene graph the viewer mutates each frame.
///
/// # Example Implementation
///
/// ```ignore
/// struct ThreeBackend { objects: HashMap<EntityId, JsValue> }
///
/// impl SceneBackend for ThreeBackend {
///     fn set_position(&mut self, id: EntityId, p: Vec3) { /* mesh.position.set(..) */ }
///     fn set_rotation(&mut self, id: EntityId, r: Vec3) { /* mesh.rotation.set(..) */ }
///     fn set_uniform(&mut self, id: EntityId, u: EarthUniforms) { /* material.uniforms.. */ }
///     fn render(&mut self, camera: &Camera3D, sun: &SunLight) { /* renderer.render(..) */ }
/// }
/// ```
pub trait SceneBackend {
    fn set_position(&mut self, id: EntityId, position: Vec3);

    /// Euler rotation (XYZ) in radians.
    fn set_rotation(&mut self, id: EntityId, rotation: Vec3);

    /// Uniforms of the Earth surface material attached to `id`.
    fn set_uniform(&mut self, id: EntityId, uniforms: EarthUniforms);

    /// Finish the frame: everything set since the last call is drawn with
    /// this camera and light.
    fn render(&mut self, camera: &Camera3D, sun: &SunLight);
}
