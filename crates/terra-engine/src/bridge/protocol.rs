//! Frame buffer layout shared with the host.
//! Must stay in sync with the host's `protocol.ts`.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 16 floats]
//! [Poses: max_poses × 8 floats]
//! [Earth uniforms: 8 floats]
//! [Camera: 36 floats]
//! [Sun light: 8 floats]
//! [Events: max_events × 4 floats]
//! ```
//!
//! Capacities are written into the header every frame.
//! The host reads them from the header to compute offsets dynamically.

use crate::api::viewer::ViewerConfig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_READY: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_POSES: usize = 2;
pub const HEADER_POSE_COUNT: usize = 3;
pub const HEADER_MAX_EVENTS: usize = 4;
pub const HEADER_EVENT_COUNT: usize = 5;
pub const HEADER_PROTOCOL_VERSION: usize = 6;
/// Whole days since the Unix epoch (floor).
pub const HEADER_SIM_DAY: usize = 7;
/// Seconds into the simulated UTC day.
pub const HEADER_SIM_SECONDS_OF_DAY: usize = 8;
pub const HEADER_TIME_MULTIPLIER: usize = 9;
pub const HEADER_PAUSED: usize = 10;
pub const HEADER_FLIGHT_ACTIVE: usize = 11;
pub const HEADER_PENDING_TEXTURES: usize = 12;
/// Entity id carrying the Earth material, or -1.
pub const HEADER_EARTH_ID: usize = 13;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per pose instance (wire format, never changes).
pub const POSE_FLOATS: usize = 8;

/// Floats of the Earth material uniforms block.
pub const UNIFORM_FLOATS: usize = 8;

/// Floats of the camera block: view, projection, position.
pub const CAMERA_FLOATS: usize = 36;

/// Floats of the sun light block.
pub const SUN_FLOATS: usize = 8;

/// Floats per viewer event: kind, a, b, c (wire format, never changes).
pub const EVENT_FLOATS: usize = 4;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    /// Maximum pose instances.
    pub max_poses: usize,
    /// Maximum viewer events per frame.
    pub max_events: usize,

    /// Size of pose data section in floats.
    pub pose_data_floats: usize,
    /// Size of event data section in floats.
    pub event_data_floats: usize,

    /// Offset (in floats) where pose data begins.
    pub pose_data_offset: usize,
    /// Offset (in floats) of the Earth uniforms block.
    pub uniform_offset: usize,
    /// Offset (in floats) of the camera block.
    pub camera_offset: usize,
    /// Offset (in floats) of the sun light block.
    pub sun_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_poses: usize, max_events: usize) -> Self {
        let pose_data_floats = max_poses * POSE_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;

        let pose_data_offset = HEADER_FLOATS;
        let uniform_offset = pose_data_offset + pose_data_floats;
        let camera_offset = uniform_offset + UNIFORM_FLOATS;
        let sun_offset = camera_offset + CAMERA_FLOATS;
        let event_data_offset = sun_offset + SUN_FLOATS;

        let buffer_total_floats = event_data_offset + event_data_floats;
        let buffer_total_bytes = buffer_total_floats * 4;

        Self {
            max_poses,
            max_events,
            pose_data_floats,
            event_data_floats,
            pose_data_offset,
            uniform_offset,
            camera_offset,
            sun_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes,
        }
    }

    /// Compute layout from a ViewerConfig.
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(config.max_poses, config.max_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ViewerEvent;
    use crate::renderer::camera::CameraUniform;
    use crate::renderer::instance::PoseInstance;
    use crate::sim::shading::EarthUniforms;
    use crate::systems::lighting::SunLight;

    #[test]
    fn from_default_config_matches_expected_sizes() {
        let layout = ProtocolLayout::from_config(&ViewerConfig::default());

        assert_eq!(layout.max_poses, 16);
        assert_eq!(layout.max_events, 32);
        assert_eq!(layout.pose_data_floats, 16 * 8);
        assert_eq!(layout.event_data_floats, 32 * 4);

        assert_eq!(layout.pose_data_offset, 16);
        assert_eq!(layout.uniform_offset, 16 + 128);
        assert_eq!(layout.camera_offset, 16 + 128 + 8);
        assert_eq!(layout.sun_offset, 16 + 128 + 8 + 36);
        assert_eq!(layout.event_data_offset, 16 + 128 + 8 + 36 + 8);
        assert_eq!(layout.buffer_total_floats, 16 + 128 + 8 + 36 + 8 + 128);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(7, 3);

        assert_eq!(layout.pose_data_offset, HEADER_FLOATS);
        assert_eq!(layout.uniform_offset, layout.pose_data_offset + layout.pose_data_floats);
        assert_eq!(layout.camera_offset, layout.uniform_offset + UNIFORM_FLOATS);
        assert_eq!(layout.sun_offset, layout.camera_offset + CAMERA_FLOATS);
        assert_eq!(layout.event_data_offset, layout.sun_offset + SUN_FLOATS);
        assert_eq!(layout.buffer_total_floats, layout.event_data_offset + layout.event_data_floats);
    }

    #[test]
    fn wire_sizes_match_pod_structs() {
        assert_eq!(PoseInstance::FLOATS, POSE_FLOATS);
        assert_eq!(EarthUniforms::FLOATS, UNIFORM_FLOATS);
        assert_eq!(CameraUniform::FLOATS, CAMERA_FLOATS);
        assert_eq!(SunLight::FLOATS, SUN_FLOATS);
        assert_eq!(ViewerEvent::FLOATS, EVENT_FLOATS);
    }

    #[test]
    fn zero_capacities_still_carry_fixed_blocks() {
        let layout = ProtocolLayout::new(0, 0);
        assert_eq!(
            layout.buffer_total_floats,
            HEADER_FLOATS + UNIFORM_FLOATS + CAMERA_FLOATS + SUN_FLOATS
        );
    }
}
