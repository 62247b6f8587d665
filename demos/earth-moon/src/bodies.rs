//! Scene catalog: Earth, clouds, starfield, the Moon and three satellites.
//!
//! Units are Earth radii. Distances are compressed for readability (the Moon
//! sits at 5 instead of ~60); satellite orbits are illustrative.

use std::f64::consts::PI;

use terra_engine::*;

/// Orbiting body indices (pose mapper order).
pub const MOON: usize = 0;
pub const BODY_COUNT: usize = 4;

pub const BODY_NAMES: [&str; BODY_COUNT] = ["Moon", "Satellite 1", "Satellite 2", "Satellite 3"];

const MINUTE_MS: i64 = 60_000;

// ── Earth ────────────────────────────────────────────────────────────

pub const EARTH_RADIUS: f32 = 1.0;
pub const EARTH_SEGMENTS: u32 = 64;
pub const CLOUD_RADIUS: f32 = 1.01;
pub const CLOUD_OPACITY: f32 = 0.8;

// ── Starfield ────────────────────────────────────────────────────────

pub const STARFIELD_RADIUS: f32 = 100.0;
pub const STARFIELD_SEGMENTS: u32 = 32;

// ── Moon ─────────────────────────────────────────────────────────────

/// 27.3 days.
pub const MOON_PERIOD_MS: i64 = 2_358_720_000;
pub const MOON_RADIUS: f32 = 0.27;
pub const MOON_ORBIT_RADIUS: f64 = 5.0;

// ── Satellites ───────────────────────────────────────────────────────

pub const SATELLITE_RADIUS: f32 = 0.05;
pub const SATELLITE_COLOR: u32 = 0xaaaaaa;

/// One orbiting body: how it looks and how it moves.
pub struct BodyDesc {
    pub name: &'static str,
    pub mesh: MeshComponent,
    pub orbit: OrbitParams,
}

pub fn body_catalog() -> [BodyDesc; BODY_COUNT] {
    let satellite = |name, orbit_radius, period_min: i64, phase| BodyDesc {
        name,
        mesh: MeshComponent::sphere(
            SATELLITE_RADIUS,
            16,
            Material::PhongColor { color: SATELLITE_COLOR },
        ),
        orbit: OrbitParams::new(orbit_radius, period_min * MINUTE_MS, phase),
    };
    [
        BodyDesc {
            name: BODY_NAMES[MOON],
            mesh: MeshComponent::sphere(
                MOON_RADIUS,
                32,
                Material::Phong { texture: TextureSlot::Moon, opacity: 1.0 },
            ),
            orbit: OrbitParams::new(MOON_ORBIT_RADIUS, MOON_PERIOD_MS, 0.0),
        },
        satellite(BODY_NAMES[1], 1.2, 90, 0.0),
        satellite(BODY_NAMES[2], 1.3, 60, PI / 2.0),
        satellite(BODY_NAMES[3], 1.4, 45, PI),
    ]
}

/// Orbit parameters in body index order, as the pose mapper expects them.
pub fn orbits() -> Vec<OrbitParams> {
    body_catalog().iter().map(|b| b.orbit).collect()
}

/// Entity ids of the spawned scene.
#[derive(Debug, Clone)]
pub struct SceneIds {
    pub starfield: EntityId,
    pub earth: EntityId,
    pub clouds: EntityId,
    /// In body index order.
    pub bodies: Vec<EntityId>,
}

/// Spawn every mesh into the context's scene.
pub fn spawn_scene(ctx: &mut EngineContext) -> SceneIds {
    let starfield = ctx.next_id();
    ctx.scene.spawn(
        Entity::new(starfield).with_tag("starfield").with_mesh(MeshComponent::sphere(
            STARFIELD_RADIUS,
            STARFIELD_SEGMENTS,
            Material::Basic { texture: TextureSlot::Stars, side: Side::Back },
        )),
    );

    let earth = ctx.next_id();
    ctx.scene.spawn(
        Entity::new(earth)
            .with_tag("earth")
            .with_mesh(MeshComponent::sphere(EARTH_RADIUS, EARTH_SEGMENTS, Material::EarthSurface))
            .with_motion(Motion::EarthSpin),
    );

    let clouds = ctx.next_id();
    ctx.scene.spawn(
        Entity::new(clouds)
            .with_tag("clouds")
            .with_mesh(MeshComponent::sphere(
                CLOUD_RADIUS,
                EARTH_SEGMENTS,
                Material::Phong { texture: TextureSlot::Clouds, opacity: CLOUD_OPACITY },
            ))
            .with_motion(Motion::CloudSpin),
    );

    let mut bodies = Vec::with_capacity(BODY_COUNT);
    for (index, body) in body_catalog().into_iter().enumerate() {
        let id = ctx.next_id();
        let start = body.orbit.radius as f32;
        ctx.scene.spawn(
            Entity::new(id)
                .with_tag(body.name)
                .with_pos(glam::Vec3::new(start, 0.0, 0.0))
                .with_mesh(body.mesh)
                .with_motion(Motion::Orbit(index)),
        );
        bodies.push(id);
    }

    SceneIds { starfield, earth, clouds, bodies }
}
