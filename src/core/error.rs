use thiserror::Error;

/// Failures surfaced by an [`AudioBackend`](crate::core::AudioBackend).
///
/// None of these are fatal: callers log them and leave the effect silent.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AudioError {
    #[error("audio is not supported on this host")]
    Unsupported,
    #[error("failed to create {node}: {reason}")]
    Create { node: &'static str, reason: String },
    #[error("failed to connect nodes: {0}")]
    Connect(String),
    #[error("failed to schedule parameter change: {0}")]
    Schedule(String),
    #[error("failed to start or stop source: {0}")]
    Playback(String),
    #[error("audio session is closed")]
    Closed,
}

impl AudioError {
    pub fn create(node: &'static str, reason: impl Into<String>) -> Self {
        AudioError::Create {
            node,
            reason: reason.into(),
        }
    }
}

pub type AudioResult<T> = Result<T, AudioError>;

/// Invalid or unparsable effect configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
