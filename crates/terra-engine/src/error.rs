use thiserror::Error;

/// Errors raised while loading or validating a `ViewerConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors from the texture manifest/registry.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("texture manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown texture slot `{0}`")]
    UnknownSlot(String),
}

/// Rejected UI control input. Never fatal; the command is dropped.
#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("could not parse date `{0}`")]
    BadDate(String),
    #[error("time multiplier must be a finite non-negative number, got {0}")]
    BadMultiplier(f64),
    #[error("no orbiting body with index {0}")]
    UnknownBody(usize),
    #[error("epoch milliseconds must be finite, got {0}")]
    BadTimestamp(f64),
}

impl ControlError {
    /// Payload of the `EVENT_COMMAND_REJECTED` event.
    pub fn code(&self) -> f32 {
        match self {
            ControlError::BadDate(_) => 1.0,
            ControlError::BadMultiplier(_) => 2.0,
            ControlError::UnknownBody(_) => 3.0,
            ControlError::BadTimestamp(_) => 4.0,
        }
    }
}
