use serde::Serialize;
use crate::api::types::EntityId;
use crate::components::entity::{Entity, Motion};
use crate::components::mesh::MeshComponent;

/// Simple entity storage using a flat Vec.
/// The viewer holds a handful of bodies; lookups are linear.
pub struct Scene {
    entities: Vec<Entity>,
}

/// One mesh as the host needs it to build the retained scene graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshDescriptor {
    pub id: EntityId,
    pub tag: String,
    #[serde(flatten)]
    pub mesh: MeshComponent,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub motion: Motion,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(16),
        }
    }

    /// Create a scene with a specific entity capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: Vec::with_capacity(capacity),
        }
    }

    /// Add an entity to the scene.
    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Remove an entity by ID. Returns the removed entity if found.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Iterate over all entities in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Find the first entity with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag == tag)
    }

    /// Find the entity that follows orbiting body `index`.
    pub fn find_orbiter(&self, index: usize) -> Option<&Entity> {
        self.entities.iter().find(|e| e.motion == Motion::Orbit(index))
    }

    /// Describe every mesh-bearing entity, in spawn order.
    pub fn mesh_descriptors(&self) -> Vec<MeshDescriptor> {
        self.entities
            .iter()
            .filter_map(|e| {
                e.mesh.map(|mesh| MeshDescriptor {
                    id: e.id,
                    tag: e.tag.clone(),
                    mesh,
                    position: e.pos.to_array(),
                    rotation: e.rotation.to_array(),
                    motion: e.motion,
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::manifest::TextureSlot;
    use crate::components::mesh::Material;
    use glam::Vec3;

    #[test]
    fn spawn_and_get() {
        let mut scene = Scene::new();
        let id = EntityId(1);
        scene.spawn(Entity::new(id).with_pos(Vec3::new(5.0, 0.0, 0.0)));
        let e = scene.get(id).unwrap();
        assert_eq!(e.pos, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn despawn_keeps_spawn_order() {
        let mut scene = Scene::new();
        for i in 1..=3 {
            scene.spawn(Entity::new(EntityId(i)));
        }
        scene.despawn(EntityId(1));
        let ids: Vec<_> = scene.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![EntityId(2), EntityId(3)]);
    }

    #[test]
    fn find_by_tag_and_orbiter() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_tag("earth").with_motion(Motion::EarthSpin));
        scene.spawn(Entity::new(EntityId(2)).with_tag("moon").with_motion(Motion::Orbit(0)));
        assert_eq!(scene.find_by_tag("earth").unwrap().id, EntityId(1));
        assert_eq!(scene.find_orbiter(0).unwrap().tag, "moon");
        assert!(scene.find_orbiter(1).is_none());
    }

    #[test]
    fn descriptors_skip_meshless_entities() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_tag("pivot"));
        scene.spawn(
            Entity::new(EntityId(2))
                .with_tag("moon")
                .with_pos(Vec3::new(5.0, 0.0, 0.0))
                .with_mesh(MeshComponent::sphere(
                    0.27,
                    32,
                    Material::Phong { texture: TextureSlot::Moon, opacity: 1.0 },
                )),
        );
        let descriptors = scene.mesh_descriptors();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].position, [5.0, 0.0, 0.0]);

        let json = serde_json::to_string(&descriptors[0]).unwrap();
        assert!(json.contains(r#""radius":0.27"#), "{json}");
        assert!(json.contains(r#""material":{"kind":"phong""#), "{json}");
    }
}
