use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::types::{EntityId, ViewerEvent};
use crate::assets::manifest::TextureManifest;
use crate::assets::registry::TextureRegistry;
use crate::core::scene::{MeshDescriptor, Scene};
use crate::core::time::DEFAULT_MAX_FRAME_MS;
use crate::error::ConfigError;
use crate::extensions::easing::Easing;
use crate::input::queue::InputQueue;
use crate::renderer::camera::Camera3D;
use crate::sim::clock::DEFAULT_MAX_MULTIPLIER;
use crate::sim::ephemeris::EphemerisConfig;
use crate::sim::shading::{EarthUniforms, LightSpace, TerminatorPolicy, DEFAULT_SHININESS};
use crate::systems::lighting::{SunLight, DEFAULT_SUN_DISTANCE};

/// Perspective camera and orbit-control settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Initial eye position; the camera looks at the origin.
    pub position: [f32; 3],
    /// Orbit-control zoom limits, applied by the host.
    pub min_distance: f32,
    pub max_distance: f32,
    pub damping: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 0.0, 5.0],
            min_distance: 1.5,
            max_distance: 50.0,
            damping: 0.05,
        }
    }
}

/// Configuration for the viewer. Every field has a default, so the host may
/// pass a partial JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub ephemeris: EphemerisConfig,
    pub light_space: LightSpace,
    pub terminator: TerminatorPolicy,
    pub shininess: f32,
    pub camera: CameraConfig,
    /// Camera offset from a fly-to target at the end of the flight.
    pub fly_offset: [f32; 3],
    pub fly_duration_s: f32,
    pub fly_easing: Easing,
    /// Upper bound of the continuous speed control.
    pub max_multiplier: f64,
    /// Longest real frame delta fed to the clock (ms).
    pub max_frame_ms: f64,
    /// Pending textures fall back after this long (ms from the first frame).
    pub texture_timeout_ms: f64,
    pub textures: TextureManifest,
    /// Maximum pose instances in the frame buffer.
    pub max_poses: usize,
    /// Maximum viewer events per frame.
    pub max_events: usize,
    pub sun_distance: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            ephemeris: EphemerisConfig::default(),
            light_space: LightSpace::default(),
            terminator: TerminatorPolicy::default(),
            shininess: DEFAULT_SHININESS,
            camera: CameraConfig::default(),
            fly_offset: [0.0, 0.5, 2.0],
            fly_duration_s: 2.0,
            fly_easing: Easing::CubicInOut,
            max_multiplier: DEFAULT_MAX_MULTIPLIER,
            max_frame_ms: DEFAULT_MAX_FRAME_MS,
            texture_timeout_ms: 10_000.0,
            textures: TextureManifest::default(),
            max_poses: 16,
            max_events: 32,
            sun_distance: DEFAULT_SUN_DISTANCE,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be a positive number, got {value}")))
    }
}

impl ViewerConfig {
    /// Parse a (possibly partial) JSON object and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.textures.fill_defaults();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ephemeris.day_length_ms <= 0 {
            return Err(invalid("ephemeris.day_length_ms", "must be positive"));
        }
        positive("ephemeris.sidereal_day_ms", self.ephemeris.sidereal_day_ms)?;
        if !self.ephemeris.cloud_spin_factor.is_finite() {
            return Err(invalid("ephemeris.cloud_spin_factor", "must be finite"));
        }
        if let TerminatorPolicy::Smoothstep { width } = self.terminator {
            positive("terminator.width", width as f64)?;
        }
        positive("shininess", self.shininess as f64)?;

        let cam = &self.camera;
        if !(cam.fov_y_deg > 0.0 && cam.fov_y_deg < 180.0) {
            return Err(invalid("camera.fov_y_deg", "must lie in (0, 180)"));
        }
        positive("camera.near", cam.near as f64)?;
        if !(cam.far > cam.near) {
            return Err(invalid("camera.far", "must exceed camera.near"));
        }
        positive("camera.min_distance", cam.min_distance as f64)?;
        if !(cam.max_distance >= cam.min_distance) {
            return Err(invalid("camera.max_distance", "must not be below camera.min_distance"));
        }
        if !(0.0..=1.0).contains(&cam.damping) {
            return Err(invalid("camera.damping", "must lie in [0, 1]"));
        }

        positive("fly_duration_s", self.fly_duration_s as f64)?;
        if !(self.max_multiplier.is_finite() && self.max_multiplier >= 0.0) {
            return Err(invalid("max_multiplier", "must be a non-negative number"));
        }
        positive("max_frame_ms", self.max_frame_ms)?;
        positive("texture_timeout_ms", self.texture_timeout_ms)?;
        positive("sun_distance", self.sun_distance as f64)?;
        if self.max_poses == 0 {
            return Err(invalid("max_poses", "must be at least 1"));
        }
        Ok(())
    }

    pub fn fly_offset(&self) -> Vec3 {
        Vec3::from_array(self.fly_offset)
    }

    /// Camera built from `camera`, looking at the origin.
    pub fn build_camera(&self) -> Camera3D {
        let cam = &self.camera;
        Camera3D::new(cam.fov_y_deg, 16.0 / 9.0, cam.near, cam.far)
            .with_position(Vec3::from_array(cam.position))
    }
}

/// Clock and camera state the viewer reports after each update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewerStatus {
    pub sim_time_ms: i64,
    pub time_multiplier: f64,
    pub paused: bool,
    pub flight_active: bool,
}

/// The contract every viewer must fulfill.
pub trait Viewer {
    /// Return viewer configuration. Called once at construction; a host
    /// `configure` call may replace it before init.
    fn config(&self) -> ViewerConfig {
        ViewerConfig::default()
    }

    /// Build the retained scene. `start_time_ms` is the host wall clock.
    fn init(&mut self, ctx: &mut EngineContext, start_time_ms: i64);

    /// One frame: apply input, advance the clock by `real_dt_ms`, pose the scene.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue, real_dt_ms: f64);
}

/// Mutable access to viewer state, passed to Viewer::init and Viewer::update.
pub struct EngineContext {
    pub config: ViewerConfig,
    pub scene: Scene,
    pub camera: Camera3D,
    pub sun: SunLight,
    pub earth_uniforms: EarthUniforms,
    pub textures: TextureRegistry,
    pub events: Vec<ViewerEvent>,
    pub status: ViewerStatus,
    next_id: u32,
}

impl EngineContext {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            scene: Scene::new(),
            camera: config.build_camera(),
            sun: SunLight::new([1.0, 1.0, 1.0], 1.0, config.sun_distance),
            earth_uniforms: EarthUniforms::new(Vec3::X, config.shininess, config.terminator),
            textures: TextureRegistry::from_manifest(&config.textures),
            events: Vec::new(),
            status: ViewerStatus::default(),
            next_id: 1,
            config,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a viewer event to be forwarded to the host.
    pub fn emit_event(&mut self, event: ViewerEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }

    /// Everything the host needs to build its meshes, camera and controls.
    pub fn describe(&self) -> SceneDescription {
        let cam = &self.config.camera;
        SceneDescription {
            meshes: self.scene.mesh_descriptors(),
            camera: CameraDescription {
                fov_y_deg: self.camera.fov_y_deg,
                near: self.camera.near,
                far: self.camera.far,
                position: self.camera.position.to_array(),
                target: self.camera.target.to_array(),
            },
            controls: OrbitControls {
                min_distance: cam.min_distance,
                max_distance: cam.max_distance,
                damping: cam.damping,
            },
            sun_position: self.sun.position().to_array(),
            textures: self.config.textures.clone(),
        }
    }

    pub fn describe_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.describe())
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CameraDescription {
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

#[derive(Debug, Clone, Serialize)]
pub struct OrbitControls {
    pub min_distance: f32,
    pub max_distance: f32,
    pub damping: f32,
}

/// Retained scene published once to the host as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct SceneDescription {
    pub meshes: Vec<MeshDescriptor>,
    pub camera: CameraDescription,
    pub controls: OrbitControls,
    pub sun_position: [f32; 3],
    /// URLs, fallbacks and the credit line.
    pub textures: TextureManifest,
}
