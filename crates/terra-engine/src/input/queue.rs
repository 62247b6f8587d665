use chrono::{DateTime, NaiveDate, NaiveDateTime};
use glam::Vec3;

use crate::error::ControlError;
use crate::extensions::flight::FlightTarget;
use crate::sim::clock::SpeedPreset;

/// Control input the viewer understands.
/// The host pushes these from its UI; the viewer drains them each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Jump to an absolute instant (ms since the Unix epoch).
    SetTime(i64),
    /// Move the clock by a signed number of hours.
    StepHours(i64),
    Pause,
    Play,
    TogglePause,
    /// One of the speed buttons.
    Preset(SpeedPreset),
    /// Continuous speed slider value.
    SetMultiplier(f64),
    /// Start a camera flight.
    FlyTo(FlightTarget),
    /// Jump back to the host wall clock (epoch ms supplied by the host).
    ResetToNow(i64),
    /// Viewport resized (CSS pixels).
    Resize { width: f32, height: f32 },
    /// The host's orbit controls moved the camera.
    CameraMoved { position: Vec3, target: Vec3 },
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a date-picker value into epoch milliseconds.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM`, `YYYY-MM-DDTHH:MM:SS` (all
/// read as UTC) and full RFC 3339 strings with an offset.
pub fn parse_date_input(input: &str) -> Result<i64, ControlError> {
    let text = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc().timestamp_millis());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc().timestamp_millis());
        }
    }
    Err(ControlError::BadDate(input.to_string()))
}

/// Convert a host-provided epoch value (JS numbers are f64) into whole ms.
pub fn timestamp_from_f64(epoch_ms: f64) -> Result<i64, ControlError> {
    if !epoch_ms.is_finite() {
        return Err(ControlError::BadTimestamp(epoch_ms));
    }
    // `as` saturates at the i64 bounds.
    Ok(epoch_ms.floor() as i64)
}
