use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading transcripts or scoring them
#[derive(Debug, Error)]
pub enum AqmError {
    #[error("transcript directory not found: {path:?}")]
    MissingSourceDirectory { path: PathBuf },

    #[error("malformed transcript {path:?}: {reason}")]
    MalformedTranscript { path: PathBuf, reason: String },

    #[error("invalid rubric parameter `{parameter}`: {reason}")]
    InvalidRubricConfig {
        parameter: &'static str,
        reason: String,
    },

    #[error("sentence has no duration (start={start_ms}ms, end={end_ms}ms)")]
    ZeroDurationSentence { start_ms: u64, end_ms: u64 },

    #[error("polarity classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AqmError {
    pub(crate) fn invalid_config(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidRubricConfig {
            parameter,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = AqmError> = std::result::Result<T, E>;
