//! Audio encoder implementations

/// LAME-backed MP3 encoder
pub mod mp3;

pub use mp3::Mp3Encoder;

use crate::core::AudioFrame;
use crate::error::AudioResult;

/// Trait for audio encoders
pub trait Encoder {
    /// Encode an audio frame to output
    fn encode(&mut self, frame: &AudioFrame) -> AudioResult<()>;

    /// Finalize encoding (flush any remaining data)
    fn finalize(&mut self) -> AudioResult<()> {
        Ok(())
    }
}
