use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for conversion operations
pub type AudioResult<T> = Result<T, AudioError>;

/// Error types for decoding, encoding and batch orchestration
#[derive(Error, Debug)]
pub enum AudioError {
    /// IO error (file operations, disk access)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Unsupported audio format
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Invalid audio metadata
    #[error("Invalid audio metadata: {0}")]
    InvalidMetadata(String),

    /// Decoding failed
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Encoding failed
    #[error("Encode error: {0}")]
    EncodeError(String),

    /// Resampling operation failed
    #[error("Resampling error: {0}")]
    ResamplingError(String),

    /// Invalid channel configuration
    #[error("Invalid channel configuration: expected {expected}, got {got}")]
    InvalidChannels {
        /// Expected number of channels
        expected: u32,
        /// Got number of channels
        got: u32,
    },

    /// Invalid sample rate
    #[error("Invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate
        rate: u32,
    },

    /// Buffer-related error
    #[error("Buffer error: {0}")]
    BufferError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Audio processing error
    #[error("Processing error: {0}")]
    ProcessingError(String),

    /// The output directory could not be created; no conversion can run
    #[error("Cannot create output directory {}: {source}", .path.display())]
    OutputDirectory {
        /// Directory that was requested
        path: PathBuf,
        /// Underlying filesystem error
        #[source]
        source: io::Error,
    },

    /// A conversion task ended without producing a result (e.g. it panicked)
    #[error("Conversion task failed: {0}")]
    TaskFailed(String),
}

impl From<symphonia::core::errors::Error> for AudioError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        AudioError::DecodeError(err.to_string())
    }
}

impl From<rubato::ResampleError> for AudioError {
    fn from(err: rubato::ResampleError) -> Self {
        AudioError::ResamplingError(err.to_string())
    }
}

impl From<rubato::ResamplerConstructionError> for AudioError {
    fn from(err: rubato::ResamplerConstructionError) -> Self {
        AudioError::ResamplingError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_directory_message_names_path() {
        let err = AudioError::OutputDirectory {
            path: PathBuf::from("/out/mp3"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/out/mp3"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_io_conversion() {
        let err: AudioError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, AudioError::Io(_)));
    }
}
