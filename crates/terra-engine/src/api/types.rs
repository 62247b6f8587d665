use bytemuck::{Pod, Zeroable};
use serde::Serialize;

/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId(pub u32);

// ── Event kinds (Rust → host) ────────────────────────────────────────

/// a = time multiplier, b = 1 when paused, c = seconds into the UTC day.
pub const EVENT_TIME_INFO: f32 = 1.0;
/// a = year, b = month, c = day (UTC).
pub const EVENT_DATE_INFO: f32 = 2.0;
/// a = hour, b = minute, c = second (UTC).
pub const EVENT_CLOCK_INFO: f32 = 3.0;
/// a = flight target index (-1 = Earth).
pub const EVENT_FLIGHT_COMPLETE: f32 = 4.0;
/// a = texture slot index that fell back.
pub const EVENT_TEXTURE_FALLBACK: f32 = 5.0;
/// Emitted once, on the first frame after every texture resolved.
pub const EVENT_RESOURCES_READY: f32 = 6.0;
/// a = `ControlError::code` of the rejected input.
pub const EVENT_COMMAND_REJECTED: f32 = 7.0;

/// An event communicated from Rust to the host through the frame buffer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ViewerEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl ViewerEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}
