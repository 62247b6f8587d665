use crate::components::entity::Entity;
use crate::components::mesh::Material;
use crate::renderer::traits::SceneBackend;
use crate::sim::shading::EarthUniforms;

/// Push every visible entity's pose into the backend, plus the Earth
/// material's uniforms. Entities without a mesh or marked inactive are skipped.
pub fn sync_scene<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    earth_uniforms: &EarthUniforms,
    backend: &mut impl SceneBackend,
) {
    for entity in entities {
        if !entity.active {
            continue;
        }
        let mesh = match &entity.mesh {
            Some(m) => m,
            None => continue,
        };

        backend.set_position(entity.id, entity.pos);
        backend.set_rotation(entity.id, entity.rotation);
        if mesh.material == Material::EarthSurface {
            backend.set_uniform(entity.id, *earth_uniforms);
        }
    }
}
