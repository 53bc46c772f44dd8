//! Audio decoder implementations

/// Symphonia-backed decoder
pub mod symphonia;

pub use self::symphonia::SymphoniaDecoder;

use crate::core::{AudioFrame, Channels};
use crate::error::AudioResult;
use std::path::Path;

/// Trait for audio decoders
pub trait Decoder: Send {
    /// Get next audio frame from the stream, `None` at end of stream
    fn decode_frame(&mut self) -> AudioResult<Option<AudioFrame>>;

    /// Check if decoder is finished
    fn is_finished(&self) -> bool;

    /// Sample rate of the decoded stream
    fn sample_rate(&self) -> u32;

    /// Channel layout of the decoded stream
    fn channels(&self) -> Channels;
}

/// Create a decoder from a file path
pub fn from_file<P: AsRef<Path>>(path: P) -> AudioResult<Box<dyn Decoder>> {
    SymphoniaDecoder::from_file(path).map(|d| Box::new(d) as Box<dyn Decoder>)
}
