pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod extensions;
pub mod sim;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::viewer::{
    CameraConfig, EngineContext, SceneDescription, Viewer, ViewerConfig, ViewerStatus,
};
pub use api::types::{EntityId, ViewerEvent};
pub use components::entity::{Entity, Motion};
pub use components::mesh::{Material, MeshComponent, Side};
pub use core::scene::{MeshDescriptor, Scene};
pub use core::time::FrameTimer;
pub use renderer::camera::{Camera3D, CameraUniform};
pub use renderer::instance::{PoseBuffer, PoseInstance};
pub use renderer::traits::SceneBackend;
pub use input::queue::{parse_date_input, timestamp_from_f64, InputEvent, InputQueue};
pub use assets::manifest::{TextureDescriptor, TextureManifest, TextureSlot};
pub use assets::registry::{TextureRegistry, TextureState};
pub use bridge::protocol::ProtocolLayout;
pub use systems::lighting::SunLight;
pub use systems::motion::apply_poses;
pub use systems::render::sync_scene;
pub use error::{ConfigError, ControlError, TextureError};

pub use sim::{
    compute_poses, BodyPose, CalendarDate, EarthRotation, EarthUniforms, EphemerisConfig,
    FramePoses, LightSpace, OrbitParams, ShadingSample, SimulationClock, SpeedPreset,
    TerminatorPolicy,
};

// Extensions: decoupled optional systems
pub use extensions::{ease_vec3, CameraFlight, Easing, FlightController, FlightTarget};
