use std::collections::HashMap;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use crate::api::types::EntityId;
use crate::renderer::camera::{Camera3D, CameraUniform};
use crate::renderer::traits::SceneBackend;
use crate::sim::shading::EarthUniforms;
use crate::systems::lighting::SunLight;

/// Per-entity pose written to the frame buffer for the host.
/// Must match the host protocol: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PoseInstance {
    /// `EntityId` as f32 (ids stay far below 2^24).
    pub entity_id: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rot_x: f32,
    pub rot_y: f32,
    pub rot_z: f32,
    pub _pad: f32,
}

impl PoseInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    fn new(id: EntityId) -> Self {
        Self {
            entity_id: id.0 as f32,
            ..Default::default()
        }
    }
}

/// `SceneBackend` that records the frame into flat, host-readable buffers.
/// One instance per entity, in the order entities were first touched.
pub struct PoseBuffer {
    instances: Vec<PoseInstance>,
    slots: HashMap<EntityId, usize>,
    max_instances: usize,
    earth: Option<(EntityId, EarthUniforms)>,
    camera: CameraUniform,
    sun: SunLight,
    frame_counter: u32,
}

impl PoseBuffer {
    pub fn with_capacity(max_instances: usize) -> Self {
        Self {
            instances: Vec::with_capacity(max_instances),
            slots: HashMap::with_capacity(max_instances),
            max_instances,
            earth: None,
            camera: Camera3D::default().uniform(),
            sun: SunLight::default(),
            frame_counter: 0,
        }
    }

    fn slot(&mut self, id: EntityId) -> Option<&mut PoseInstance> {
        let idx = match self.slots.get(&id) {
            Some(&idx) => idx,
            None => {
                if self.instances.len() >= self.max_instances {
                    log::warn!("pose buffer full ({}), dropping entity {}", self.max_instances, id.0);
                    return None;
                }
                self.instances.push(PoseInstance::new(id));
                self.slots.insert(id, self.instances.len() - 1);
                self.instances.len() - 1
            }
        };
        self.instances.get_mut(idx)
    }

    pub fn instances(&self) -> &[PoseInstance] {
        &self.instances
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn get(&self, id: EntityId) -> Option<&PoseInstance> {
        self.slots.get(&id).and_then(|&idx| self.instances.get(idx))
    }

    /// Uniforms of the Earth material, once set.
    pub fn earth_uniforms(&self) -> Option<&EarthUniforms> {
        self.earth.as_ref().map(|(_, u)| u)
    }

    pub fn earth_id(&self) -> Option<EntityId> {
        self.earth.map(|(id, _)| id)
    }

    pub fn camera(&self) -> &CameraUniform {
        &self.camera
    }

    pub fn sun(&self) -> &SunLight {
        &self.sun
    }

    /// Number of completed `render` calls.
    pub fn frame_counter(&self) -> u32 {
        self.frame_counter
    }

    /// Raw pointer to instance data for host reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl SceneBackend for PoseBuffer {
    fn set_position(&mut self, id: EntityId, position: Vec3) {
        if let Some(inst) = self.slot(id) {
            inst.x = position.x;
            inst.y = position.y;
            inst.z = position.z;
        }
    }

    fn set_rotation(&mut self, id: EntityId, rotation: Vec3) {
        if let Some(inst) = self.slot(id) {
            inst.rot_x = rotation.x;
            inst.rot_y = rotation.y;
            inst.rot_z = rotation.z;
        }
    }

    fn set_uniform(&mut self, id: EntityId, uniforms: EarthUniforms) {
        self.earth = Some((id, uniforms));
    }

    fn render(&mut self, camera: &Camera3D, sun: &SunLight) {
        self.camera = camera.uniform();
        self.sun = *sun;
        self.frame_counter = self.frame_counter.wrapping_add(1);
    }
}

impl Default for PoseBuffer {
    fn default() -> Self {
        Self::with_capacity(16)
    }
}
