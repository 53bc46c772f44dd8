//! Codec adapter: turns one input file into one encoded output file

/// Decode, remix, resample and MP3 encode in one call
pub mod transcode;

pub use transcode::Mp3Transcoder;

use crate::core::EncodingParameters;
use crate::error::AudioResult;
use std::path::Path;

/// A synchronous, single-file converter.
///
/// Implementations block the calling thread for the duration of the
/// conversion and never retry. Every failure is reported as one
/// [`AudioError`](crate::AudioError) whose message describes the cause.
pub trait Codec: Send + Sync + 'static {
    /// Convert `input` into `output` using `params`
    fn encode(&self, input: &Path, output: &Path, params: &EncodingParameters) -> AudioResult<()>;
}
