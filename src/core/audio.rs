use crate::error::{AudioError, AudioResult};
use std::time::Duration;

/// Channel layout of decoded or encoded audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    /// Mono (1 channel)
    Mono = 1,
    /// Stereo (2 channels)
    Stereo = 2,
    /// Quad (4 channels: FL, FR, RL, RR)
    Quad = 4,
    /// 5.1 surround (FL, FR, FC, LFE, SL, SR)
    SurroundFivePointOne = 6,
    /// 7.1 surround (FL, FR, FC, LFE, RL, RR, SL, SR)
    SurroundSevenPointOne = 8,
}

/// Channel counts accepted from input files
const SUPPORTED_LAYOUTS: &str = "1, 2, 4, 6 or 8";

impl Channels {
    /// Create Channels from channel count
    pub fn from_count(count: u32) -> AudioResult<Self> {
        match count {
            1 => Ok(Channels::Mono),
            2 => Ok(Channels::Stereo),
            4 => Ok(Channels::Quad),
            6 => Ok(Channels::SurroundFivePointOne),
            8 => Ok(Channels::SurroundSevenPointOne),
            n => Err(AudioError::UnsupportedFormat(format!(
                "{} channels (supported: {})",
                n, SUPPORTED_LAYOUTS
            ))),
        }
    }

    /// Get the number of channels
    pub fn count(&self) -> u32 {
        *self as u32
    }

    /// Get channel layout name
    pub fn name(&self) -> &'static str {
        match self {
            Channels::Mono => "Mono",
            Channels::Stereo => "Stereo",
            Channels::Quad => "Quad",
            Channels::SurroundFivePointOne => "5.1 Surround",
            Channels::SurroundSevenPointOne => "7.1 Surround",
        }
    }
}

/// A block of interleaved samples flowing from decoder to encoder
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Interleaved samples, nominally in -1.0..=1.0
    samples: Vec<f32>,
    sample_rate: u32,
    channels: Channels,
    /// Position of this block in its stream
    frame_number: u64,
}

impl AudioFrame {
    /// Create a new audio frame, checking that the samples fill whole frames
    pub fn new(
        samples: Vec<f32>,
        sample_rate: u32,
        channels: Channels,
        frame_number: u64,
    ) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }

        if samples.len() % channels.count() as usize != 0 {
            return Err(AudioError::BufferError(format!(
                "{} samples do not divide into {} channels",
                samples.len(),
                channels.count()
            )));
        }

        Ok(AudioFrame {
            samples,
            sample_rate,
            channels,
            frame_number,
        })
    }

    /// Get reference to the samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Get sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get channel configuration
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Get number of samples per channel
    pub fn samples_per_channel(&self) -> usize {
        self.samples.len() / self.channels.count() as usize
    }

    /// Get frame number
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Playback duration of this frame
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples_per_channel() as f64 / self.sample_rate as f64)
    }

    /// Check if frame is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_from_count() {
        assert_eq!(Channels::from_count(1).unwrap(), Channels::Mono);
        assert_eq!(Channels::from_count(2).unwrap(), Channels::Stereo);
        assert_eq!(Channels::from_count(6).unwrap(), Channels::SurroundFivePointOne);
        assert!(Channels::from_count(0).is_err());
    }

    #[test]
    fn test_unsupported_count_lists_layouts() {
        let err = Channels::from_count(3).unwrap_err();
        assert!(matches!(err, AudioError::UnsupportedFormat(_)));
        let msg = err.to_string();
        assert!(msg.contains("3 channels"));
        assert!(msg.contains("1, 2, 4, 6 or 8"));
    }

    #[test]
    fn test_audio_frame_creation() {
        let samples = vec![0.1, 0.2, 0.3, 0.4];
        let frame = AudioFrame::new(samples, 44100, Channels::Stereo, 7).unwrap();

        assert_eq!(frame.sample_rate(), 44100);
        assert_eq!(frame.channels(), Channels::Stereo);
        assert_eq!(frame.samples_per_channel(), 2);
        assert_eq!(frame.frame_number(), 7);
    }

    #[test]
    fn test_audio_frame_rejects_partial_frames() {
        // Odd number of samples for stereo should fail
        let result = AudioFrame::new(vec![0.1, 0.2, 0.3], 44100, Channels::Stereo, 0);
        assert!(matches!(result, Err(AudioError::BufferError(_))));
    }

    #[test]
    fn test_audio_frame_duration() {
        let frame = AudioFrame::new(vec![0.0; 44100 * 2], 44100, Channels::Stereo, 0).unwrap();
        assert_eq!(frame.duration(), Duration::from_secs(1));
    }
}
