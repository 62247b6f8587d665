use glam::Vec3;
use serde::Serialize;
use crate::api::types::EntityId;
use crate::components::mesh::MeshComponent;

/// How an entity's pose follows the simulation clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum Motion {
    /// Never moved after spawn (starfield).
    #[default]
    Static,
    /// Rotation about +Y follows the Earth spin angle.
    EarthSpin,
    /// Rotation about +Y follows the cloud spin angle.
    CloudSpin,
    /// Position follows orbiting body `n` of the pose mapper.
    Orbit(usize),
}

/// Fat Entity: a single struct with optional components.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Inactive entities are skipped by the sync pass.
    pub active: bool,
    /// Position in world space (Earth at the origin).
    pub pos: Vec3,
    /// Euler rotation (XYZ) in radians.
    pub rotation: Vec3,
    pub scale: f32,
    pub mesh: Option<MeshComponent>,
    pub motion: Motion,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
            mesh: None,
            motion: Motion::Static,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshComponent) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }
}
