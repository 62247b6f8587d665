use serde::Serialize;
use crate::assets::manifest::TextureSlot;

/// Which face of a mesh the host should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    Front,
    /// Inside of a sphere, e.g. the starfield.
    Back,
}

/// Surface material of a mesh. The host builds the matching material type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Material {
    /// Custom day/night shader fed by `EarthUniforms` every frame.
    EarthSurface,
    /// Lit material sampling one texture.
    Phong {
        texture: TextureSlot,
        opacity: f32,
    },
    /// Lit material with a flat colour (0xRRGGBB).
    PhongColor { color: u32 },
    /// Unlit textured material.
    Basic { texture: TextureSlot, side: Side },
}

impl Material {
    pub fn texture(&self) -> Option<TextureSlot> {
        match self {
            Material::Phong { texture, .. } | Material::Basic { texture, .. } => Some(*texture),
            Material::EarthSurface | Material::PhongColor { .. } => None,
        }
    }

    pub fn is_transparent(&self) -> bool {
        matches!(self, Material::Phong { opacity, .. } if *opacity < 1.0)
    }
}

/// A UV sphere with a material. Every body in the viewer is one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeshComponent {
    pub radius: f32,
    /// Width and height segment count.
    pub segments: u32,
    pub material: Material,
}

impl MeshComponent {
    pub fn sphere(radius: f32, segments: u32, material: Material) -> Self {
        Self {
            radius,
            segments,
            material,
        }
    }
}
