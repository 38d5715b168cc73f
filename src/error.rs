//! Error handling for silkworker
//!
//! Every failure inside the worker surfaces as a [`SilkWorkerError`]. The
//! relay turns these into `{ error }` replies, so the display text of each
//! variant is what the parent thread ends up reading.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for silkworker operations
pub type Result<T> = std::result::Result<T, SilkWorkerError>;

/// Main error type for silkworker operations
#[derive(Error, Debug)]
pub enum SilkWorkerError {
    // Input Errors
    #[error("Audio contains no samples")]
    EmptyAudio,

    #[error("Invalid audio input: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Unsupported sample rate: {sample_rate} Hz")]
    UnsupportedSampleRate { sample_rate: u32 },

    // Encoder Errors
    #[error("{reason}")]
    EncoderFailure { reason: String },

    // Worker Errors
    #[error("Worker channel closed")]
    ChannelClosed,

    #[error("Worker task panicked: {reason}")]
    TaskPanicked { reason: String },

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SilkWorkerError {
    /// Shorthand for an encoder failure carrying only a message.
    pub fn encoder(reason: impl Into<String>) -> Self {
        SilkWorkerError::EncoderFailure {
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            SilkWorkerError::EmptyAudio => "EMPTY_AUDIO",
            SilkWorkerError::InvalidAudio { .. } => "INVALID_AUDIO",
            SilkWorkerError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            SilkWorkerError::UnsupportedSampleRate { .. } => "UNSUPPORTED_SAMPLE_RATE",
            SilkWorkerError::EncoderFailure { .. } => "ENCODER_FAILURE",
            SilkWorkerError::ChannelClosed => "CHANNEL_CLOSED",
            SilkWorkerError::TaskPanicked { .. } => "TASK_PANICKED",
            SilkWorkerError::Spawn(_) => "SPAWN_FAILED",
            SilkWorkerError::InvalidConfig { .. } => "INVALID_CONFIG",
            SilkWorkerError::FileNotFound { .. } => "FILE_NOT_FOUND",
            SilkWorkerError::Io(_) => "IO_ERROR",
            SilkWorkerError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Whether resubmitting a corrected task could succeed.
    ///
    /// Channel and spawn failures mean the worker itself is gone.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SilkWorkerError::EmptyAudio => true,
            SilkWorkerError::InvalidAudio { .. } => true,
            SilkWorkerError::UnsupportedFormat { .. } => true,
            SilkWorkerError::UnsupportedSampleRate { .. } => true,
            SilkWorkerError::EncoderFailure { .. } => true,
            SilkWorkerError::TaskPanicked { .. } => true,
            SilkWorkerError::FileNotFound { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = SilkWorkerError::UnsupportedSampleRate { sample_rate: 22050 };
        assert_eq!(err.error_code(), "UNSUPPORTED_SAMPLE_RATE");
        assert_eq!(err.to_string(), "Unsupported sample rate: 22050 Hz");
    }

    #[test]
    fn test_encoder_failure_message_is_bare() {
        let err = SilkWorkerError::encoder("bad frame");
        assert_eq!(err.to_string(), "bad frame");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_channel_closed_not_recoverable() {
        assert!(!SilkWorkerError::ChannelClosed.is_recoverable());
    }
}
