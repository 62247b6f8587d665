//! Simulation clock: simulated epoch time plus a time-acceleration multiplier.
//!
//! The clock is the only mutable time state in the viewer. Poses are never
//! integrated; they are recomputed from `simulated_time_ms` every frame.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::error::ControlError;

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_HOUR: i64 = 3_600_000;
pub const MS_PER_DAY: i64 = 86_400_000;

/// Upper bound of the continuous speed slider.
pub const DEFAULT_MAX_MULTIPLIER: f64 = 1000.0;

/// Speed buttons in the time-control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedPreset {
    Pause,
    RealTime,
    Fast,
    Faster,
}

impl SpeedPreset {
    pub fn multiplier(self) -> f64 {
        match self {
            SpeedPreset::Pause => 0.0,
            SpeedPreset::RealTime => 1.0,
            SpeedPreset::Fast => 10.0,
            SpeedPreset::Faster => 100.0,
        }
    }

    /// Map a bridge index (0 = pause, 1 = 1x, 2 = 10x, 3 = 100x).
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(SpeedPreset::Pause),
            1 => Some(SpeedPreset::RealTime),
            2 => Some(SpeedPreset::Fast),
            3 => Some(SpeedPreset::Faster),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    /// Milliseconds since the Unix epoch.
    simulated_time_ms: i64,
    /// 0 = paused.
    time_multiplier: f64,
    /// Multiplier restored by `play()` after a pause.
    resume_multiplier: f64,
    max_multiplier: f64,
    /// Sub-millisecond remainder carried between frames.
    pending_ms: f64,
}

impl SimulationClock {
    pub fn new(start_ms: i64, max_multiplier: f64) -> Self {
        Self {
            simulated_time_ms: start_ms,
            time_multiplier: 1.0,
            resume_multiplier: 1.0,
            max_multiplier: max_multiplier.max(0.0),
            pending_ms: 0.0,
        }
    }

    pub fn simulated_time_ms(&self) -> i64 {
        self.simulated_time_ms
    }

    pub fn time_multiplier(&self) -> f64 {
        self.time_multiplier
    }

    pub fn is_paused(&self) -> bool {
        self.time_multiplier == 0.0
    }

    pub fn max_multiplier(&self) -> f64 {
        self.max_multiplier
    }

    /// Per-frame advance: `simulated += real_elapsed_ms * multiplier`.
    /// Returns the new simulated time. Saturates at the `i64` range.
    pub fn advance(&mut self, real_elapsed_ms: f64) -> i64 {
        if !real_elapsed_ms.is_finite() || real_elapsed_ms <= 0.0 || self.is_paused() {
            return self.simulated_time_ms;
        }

        let delta = real_elapsed_ms * self.time_multiplier + self.pending_ms;
        let whole = delta.trunc();
        self.pending_ms = delta - whole;
        // f64 -> i64 `as` saturates, so absurd deltas clamp instead of wrapping.
        self.simulated_time_ms = self.simulated_time_ms.saturating_add(whole as i64);
        self.simulated_time_ms
    }

    /// Jump to an absolute epoch time (date picker, "now" button).
    pub fn set_time_ms(&mut self, epoch_ms: i64) {
        self.simulated_time_ms = epoch_ms;
        self.pending_ms = 0.0;
        log::debug!("clock: time set to {epoch_ms} ms");
    }

    /// Relative step, e.g. the ±1 hour buttons.
    pub fn step_hours(&mut self, hours: i64) {
        let delta = hours.saturating_mul(MS_PER_HOUR);
        self.simulated_time_ms = self.simulated_time_ms.saturating_add(delta);
        self.pending_ms = 0.0;
    }

    pub fn pause(&mut self) {
        if self.time_multiplier > 0.0 {
            self.resume_multiplier = self.time_multiplier;
        }
        self.time_multiplier = 0.0;
        self.pending_ms = 0.0;
    }

    /// Resume at the multiplier active before the last pause (1x if none).
    pub fn play(&mut self) {
        if self.is_paused() {
            self.time_multiplier = if self.resume_multiplier > 0.0 {
                self.resume_multiplier
            } else {
                1.0
            };
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.is_paused() {
            self.play();
        } else {
            self.pause();
        }
    }

    /// Continuous slider input. Values above the cap are clamped.
    pub fn set_multiplier(&mut self, multiplier: f64) -> Result<(), ControlError> {
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(ControlError::BadMultiplier(multiplier));
        }
        let clamped = multiplier.min(self.max_multiplier);
        if clamped > 0.0 {
            self.resume_multiplier = clamped;
        } else {
            self.pending_ms = 0.0;
        }
        self.time_multiplier = clamped;
        log::debug!("clock: multiplier {clamped}x");
        Ok(())
    }

    pub fn apply_preset(&mut self, preset: SpeedPreset) {
        match preset {
            SpeedPreset::Pause => self.pause(),
            other => {
                // Presets are all within the default cap; clamp for custom caps.
                let m = other.multiplier().min(self.max_multiplier);
                self.time_multiplier = m;
                if m > 0.0 {
                    self.resume_multiplier = m;
                }
            }
        }
    }
}

/// UTC calendar fields of a simulated timestamp, for the date/time readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl CalendarDate {
    /// `None` outside chrono's representable range.
    pub fn from_epoch_ms(epoch_ms: i64) -> Option<Self> {
        let date = DateTime::<Utc>::from_timestamp_millis(epoch_ms)?;
        Some(Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            hour: date.hour(),
            minute: date.minute(),
            second: date.second(),
        })
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(0, DEFAULT_MAX_MULTIPLIER)
    }
}
