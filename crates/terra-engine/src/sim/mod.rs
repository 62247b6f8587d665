// sim/mod.rs
//
// Simulation core: the clock, the time-indexed pose mapper and the Earth
// shading inputs. Pure data and math; no scene or bridge types.

pub mod clock;
pub mod ephemeris;
pub mod shading;

pub use clock::{CalendarDate, SimulationClock, SpeedPreset};
pub use ephemeris::{
    compute_poses, BodyPose, EarthRotation, EphemerisConfig, FramePoses, OrbitParams,
};
pub use shading::{EarthUniforms, LightSpace, ShadingSample, TerminatorPolicy};
