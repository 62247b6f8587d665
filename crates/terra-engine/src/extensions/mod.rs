// extensions/mod.rs
//
// Optional systems decoupled from Entity/Scene. Viewers opt in by owning them.

pub mod easing;
pub mod flight;

pub use easing::{ease_vec3, Easing};
pub use flight::{CameraFlight, FlightController, FlightTarget};
