/// Default cap on a single frame's real elapsed time, in milliseconds.
pub const DEFAULT_MAX_FRAME_MS: f64 = 1000.0;

/// Converts successive host timestamps (`requestAnimationFrame` time) into
/// real elapsed milliseconds for the simulation clock.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    /// Timestamp of the previous frame, `None` before the first tick.
    last_ms: Option<f64>,
    /// Upper bound on a single delta (backgrounded tabs resume with huge gaps).
    max_frame_ms: f64,
}

impl FrameTimer {
    pub fn new(max_frame_ms: f64) -> Self {
        Self {
            last_ms: None,
            max_frame_ms: max_frame_ms.max(0.0),
        }
    }

    /// Feed the host timestamp of this frame. Returns the real elapsed
    /// milliseconds since the previous frame: 0 on the first call, never
    /// negative, never above `max_frame_ms`.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        if !now_ms.is_finite() {
            return 0.0;
        }
        let delta = match self.last_ms {
            None => 0.0,
            Some(last) => (now_ms - last).clamp(0.0, self.max_frame_ms),
        };
        self.last_ms = Some(now_ms);
        delta
    }

    pub fn max_frame_ms(&self) -> f64 {
        self.max_frame_ms
    }

    /// Forget the previous timestamp; the next tick yields 0.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_MS)
    }
}
