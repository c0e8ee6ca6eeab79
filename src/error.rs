//! Error handling for soundproc
//!
//! Every failure is reported to the immediate caller as a `SoundError`
//! variant, so callers can match on the cause instead of parsing messages.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for soundproc operations
pub type Result<T> = std::result::Result<T, SoundError>;

/// Main error type for soundproc operations
#[derive(Error, Debug)]
pub enum SoundError {
    // Path Errors
    #[error("Invalid audio file path '{}': {reason}", .path.display())]
    Path { path: PathBuf, reason: String },

    // Container Errors
    #[error("Malformed WAVE file: {reason}")]
    WavFormat { reason: String },

    // Signal Errors
    #[error("Invalid audio signal: {reason}")]
    InvalidSignal { reason: String },

    #[error("Channel {channel} is not present in the signal ({channels} channels)")]
    ChannelOutOfRange { channel: i64, channels: u16 },

    #[error("Position {position} is not available for insertion ({channels} channels)")]
    PositionOutOfRange { position: i64, channels: u16 },

    // I/O Errors
    #[error("Failed to read file '{}': {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{}': {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SoundError {
    pub(crate) fn wav_format(reason: impl Into<String>) -> Self {
        SoundError::WavFormat {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_signal(reason: impl Into<String>) -> Self {
        SoundError::InvalidSignal {
            reason: reason.into(),
        }
    }

    pub(crate) fn path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SoundError::Path {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            SoundError::Path { .. } => "PATH_ERROR",
            SoundError::WavFormat { .. } => "WAV_FORMAT_ERROR",
            SoundError::InvalidSignal { .. } => "INVALID_SIGNAL",
            SoundError::ChannelOutOfRange { .. } => "CHANNEL_OUT_OF_RANGE",
            SoundError::PositionOutOfRange { .. } => "POSITION_OUT_OF_RANGE",
            SoundError::FileRead { .. } => "FILE_READ_ERROR",
            SoundError::FileWrite { .. } => "FILE_WRITE_ERROR",
            SoundError::Io(_) => "IO_ERROR",
            SoundError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// True for failures caused by the content or location of an input file,
    /// as opposed to the operating system failing an otherwise valid request.
    pub fn is_input_error(&self) -> bool {
        matches!(self, SoundError::Path { .. } | SoundError::WavFormat { .. })
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            SoundError::Path { .. } => {
                Some("Check that the path points to an existing .wav or .wave file.")
            }
            SoundError::WavFormat { .. } => {
                Some("Re-export the audio as uncompressed integer PCM WAVE.")
            }
            SoundError::ChannelOutOfRange { .. } => {
                Some("Channel indices are counted from 0 and must be below the channel count.")
            }
            SoundError::PositionOutOfRange { .. } => {
                Some("Insert positions range from 0 up to and including the channel count.")
            }
            SoundError::FileRead { .. } => Some("Check that the file is readable."),
            SoundError::FileWrite { .. } => {
                Some("Check permissions and free space at the destination.")
            }
            _ => None,
        }
    }
}
