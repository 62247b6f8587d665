pub mod camera;
pub mod instance;
pub mod traits;

pub use camera::{Camera3D, CameraUniform};
pub use instance::{PoseBuffer, PoseInstance};
pub use traits::SceneBackend;
