//! Shading inputs for the Earth surface material.
//!
//! Each frame the sun direction is moved into the space the surface shader
//! works in and packed into `EarthUniforms`. The shader itself runs in the
//! host's WebGL pipeline. The fragment shader is shared; the vertex shader
//! depends on the `LightSpace` (`LightSpace::vertex_shader`) so that normals,
//! light and view direction always meet in the same space. `shade` is the
//! fragment math on the CPU.

use bytemuck::{Pod, Zeroable};
use glam::{DVec3, Mat3, Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Phong exponent of the ocean highlight.
pub const DEFAULT_SHININESS: f32 = 32.0;

/// Space in which the shader compares normals against the light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightSpace {
    /// Normals are in view space (`normalMatrix * normal`).
    #[default]
    View,
    /// Normals are in the Earth mesh's own frame.
    Object,
}

impl LightSpace {
    /// Vertex shader whose `vNormal` and `vViewPosition` live in this space.
    pub fn vertex_shader(self) -> &'static str {
        match self {
            LightSpace::View => EARTH_VERTEX_SHADER,
            LightSpace::Object => EARTH_OBJECT_VERTEX_SHADER,
        }
    }
}

/// How the day and night textures are blended across the terminator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerminatorPolicy {
    /// `clamp(N·L, 0, 1)`.
    #[default]
    HardCutoff,
    /// `smoothstep(-width, width, N·L)`.
    Smoothstep { width: f32 },
}

impl TerminatorPolicy {
    /// Uniform encoding: 0 selects the hard cutoff.
    pub fn uniform_width(self) -> f32 {
        match self {
            TerminatorPolicy::HardCutoff => 0.0,
            TerminatorPolicy::Smoothstep { width } => width.max(f32::EPSILON),
        }
    }

    pub fn weight(self, n_dot_l: f32) -> f32 {
        match self {
            TerminatorPolicy::HardCutoff => n_dot_l.clamp(0.0, 1.0),
            TerminatorPolicy::Smoothstep { width } => {
                let w = width.max(f32::EPSILON);
                smoothstep(-w, w, n_dot_l)
            }
        }
    }
}

/// GPU-side uniform block of the Earth material (32 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct EarthUniforms {
    pub light_direction: [f32; 3],
    pub shininess: f32,
    pub terminator_width: f32,
    pub _pad: [f32; 3],
}

impl EarthUniforms {
    pub const FLOATS: usize = 8;

    pub fn new(light_direction: Vec3, shininess: f32, policy: TerminatorPolicy) -> Self {
        Self {
            light_direction: light_direction.to_array(),
            shininess,
            terminator_width: policy.uniform_width(),
            _pad: [0.0; 3],
        }
    }
}

/// Rotate a world-space direction into `space`, the same way the matching
/// vertex shader moves normals.
///
/// `view` is the camera's world-to-view matrix; only its rotation is used.
/// `earth_spin` is the mesh's rotation about +Y, needed for object space.
pub fn to_shading_space(world: Vec3, space: LightSpace, view: &Mat4, earth_spin: f64) -> Vec3 {
    match space {
        LightSpace::View => Mat3::from_mat4(*view) * world,
        LightSpace::Object => Mat3::from_rotation_y(-earth_spin as f32) * world,
    }
}

/// Move the world-space sun direction into the shader's space.
pub fn light_direction_for_shading(
    sun_world: DVec3,
    space: LightSpace,
    view: &Mat4,
    earth_spin: f64,
) -> Vec3 {
    to_shading_space(sun_world.as_vec3(), space, view, earth_spin).normalize_or(Vec3::X)
}

/// Inputs of one surface sample, mirroring the fragment shader varyings.
#[derive(Debug, Clone, Copy)]
pub struct ShadingSample {
    pub normal: Vec3,
    /// From the surface point towards the eye (not eye to surface).
    pub view_dir: Vec3,
    pub day: Vec3,
    pub night: Vec3,
    pub specular_mask: Vec3,
}

/// CPU reference of `EARTH_FRAGMENT_SHADER`. All vectors must be in the
/// same space; `view_dir` points from the surface to the eye.
pub fn shade(
    sample: &ShadingSample,
    light_dir: Vec3,
    policy: TerminatorPolicy,
    shininess: f32,
) -> Vec3 {
    let n = sample.normal.normalize_or(Vec3::Y);
    let l = light_dir.normalize_or(Vec3::X);
    let n_dot_l = n.dot(l);
    let weight = policy.weight(n_dot_l);

    let diffuse = sample.night.lerp(sample.day, weight);

    let v = sample.view_dir.normalize_or(Vec3::Z);
    let r = reflect(-l, n);
    let spec = v.dot(r).max(0.0).powf(shininess);

    diffuse + sample.specular_mask * spec * weight
}

fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// View-space varyings: `vViewPosition` is the surface-to-eye vector.
pub const EARTH_VERTEX_SHADER: &str = r#"
varying vec3 vNormal;
varying vec2 vUv;
varying vec3 vViewPosition;
void main() {
    vNormal = normalize(normalMatrix * normal);
    vUv = uv;
    vec4 mvPosition = modelViewMatrix * vec4(position, 1.0);
    vViewPosition = -mvPosition.xyz;
    gl_Position = projectionMatrix * mvPosition;
}
"#;

/// Object-space varyings for `LightSpace::Object`. The Earth's model matrix
/// is a pure rotation, so multiplying by it on the right applies its inverse.
pub const EARTH_OBJECT_VERTEX_SHADER: &str = r#"
varying vec3 vNormal;
varying vec2 vUv;
varying vec3 vViewPosition;
void main() {
    vNormal = normalize(normal);
    vUv = uv;
    vec4 worldPosition = modelMatrix * vec4(position, 1.0);
    vViewPosition = (cameraPosition - worldPosition.xyz) * mat3(modelMatrix);
    gl_Position = projectionMatrix * viewMatrix * worldPosition;
}
"#;

/// Shared by both vertex shaders. `vViewPosition` points from the surface to
/// the eye, so `viewDir` is used without negation.
pub const EARTH_FRAGMENT_SHADER: &str = r#"
uniform sampler2D dayTexture;
uniform sampler2D nightTexture;
uniform sampler2D specularMap;
uniform vec3 lightDirection;
uniform float shininess;
uniform float terminatorWidth;
varying vec3 vNormal;
varying vec2 vUv;
varying vec3 vViewPosition;
void main() {
    vec3 normal = normalize(vNormal);
    vec3 lightDir = normalize(lightDirection);
    float NdotL = dot(normal, lightDir);
    float lighting = terminatorWidth > 0.0
        ? smoothstep(-terminatorWidth, terminatorWidth, NdotL)
        : clamp(NdotL, 0.0, 1.0);
    vec4 dayColor = texture2D(dayTexture, vUv);
    vec4 nightColor = texture2D(nightTexture, vUv);
    vec4 diffuseColor = mix(nightColor, dayColor, lighting);
    vec3 viewDir = normalize(vViewPosition);
    vec3 reflectDir = reflect(-lightDir, normal);
    float spec = pow(max(dot(viewDir, reflectDir), 0.0), shininess);
    vec4 specularColor = texture2D(specularMap, vUv) * spec * lighting;
    gl_FragColor = diffuseColor + specularColor;
}
"#;
