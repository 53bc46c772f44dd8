use crate::core::{AudioFrame, Channels};
use crate::error::{AudioError, AudioResult};

/// -3 dB gain used when folding centre and surround channels into L/R
const SURROUND_GAIN: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Audio channel remixer - converts between channel layouts
pub struct Remix {
    input_channels: Channels,
    output_channels: Channels,
}

impl Remix {
    /// Create a new channel remixer
    pub fn new(input_channels: Channels, output_channels: Channels) -> AudioResult<Self> {
        match output_channels {
            Channels::Mono | Channels::Stereo => {}
            _ if output_channels == input_channels => {}
            other => {
                return Err(AudioError::ConfigError(format!(
                    "Remix from {} to {} not supported",
                    input_channels.name(),
                    other.name()
                )));
            }
        }

        Ok(Remix {
            input_channels,
            output_channels,
        })
    }

    /// Whether frames pass through unchanged
    pub fn is_passthrough(&self) -> bool {
        self.input_channels == self.output_channels
    }

    /// Remix stereo to mono by averaging channels
    fn stereo_to_mono(input: &[f32]) -> Vec<f32> {
        input
            .chunks_exact(2)
            .map(|lr| (lr[0] + lr[1]) / 2.0)
            .collect()
    }

    /// Remix mono to stereo by duplicating the channel
    fn mono_to_stereo(input: &[f32]) -> Vec<f32> {
        input.iter().flat_map(|&s| [s, s]).collect()
    }

    /// Fold a multichannel layout down to stereo
    fn downmix_to_stereo(input: &[f32], layout: Channels) -> Vec<f32> {
        let width = layout.count() as usize;
        let mut output = Vec::with_capacity(input.len() / width * 2);

        for frame in input.chunks_exact(width) {
            let (left, right) = match layout {
                Channels::Mono => (frame[0], frame[0]),
                Channels::Stereo => (frame[0], frame[1]),
                // FL FR RL RR
                Channels::Quad => ((frame[0] + frame[2]) / 2.0, (frame[1] + frame[3]) / 2.0),
                // FL FR FC LFE SL SR; LFE is dropped
                Channels::SurroundFivePointOne => {
                    let scale = 1.0 / (1.0 + 2.0 * SURROUND_GAIN);
                    let centre = frame[2] * SURROUND_GAIN;
                    (
                        (frame[0] + centre + frame[4] * SURROUND_GAIN) * scale,
                        (frame[1] + centre + frame[5] * SURROUND_GAIN) * scale,
                    )
                }
                // FL FR FC LFE RL RR SL SR
                Channels::SurroundSevenPointOne => {
                    let scale = 1.0 / (1.0 + 3.0 * SURROUND_GAIN);
                    let centre = frame[2] * SURROUND_GAIN;
                    (
                        (frame[0] + centre + (frame[4] + frame[6]) * SURROUND_GAIN) * scale,
                        (frame[1] + centre + (frame[5] + frame[7]) * SURROUND_GAIN) * scale,
                    )
                }
            };
            output.push(left);
            output.push(right);
        }

        output
    }
}

impl super::Filter for Remix {
    fn process(&mut self, frame: &AudioFrame) -> AudioResult<AudioFrame> {
        if frame.channels() != self.input_channels {
            return Err(AudioError::InvalidChannels {
                expected: self.input_channels.count(),
                got: frame.channels().count(),
            });
        }

        if self.is_passthrough() {
            return Ok(frame.clone());
        }

        let samples = frame.samples();
        let output_samples = match (self.input_channels, self.output_channels) {
            (Channels::Mono, Channels::Stereo) => Self::mono_to_stereo(samples),
            (Channels::Stereo, Channels::Mono) => Self::stereo_to_mono(samples),
            (layout, Channels::Stereo) => Self::downmix_to_stereo(samples, layout),
            (layout, Channels::Mono) => {
                Self::stereo_to_mono(&Self::downmix_to_stereo(samples, layout))
            }
            (src, dst) => {
                return Err(AudioError::ProcessingError(format!(
                    "Remix from {} to {} not supported",
                    src.name(),
                    dst.name()
                )));
            }
        };

        AudioFrame::new(
            output_samples,
            frame.sample_rate(),
            self.output_channels,
            frame.frame_number(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;

    #[test]
    fn test_remix_stereo_to_mono() {
        let output = Remix::stereo_to_mono(&[0.0, 1.0, 0.5, 0.5]);
        assert_eq!(output, vec![0.5, 0.5]);
    }

    #[test]
    fn test_remix_mono_to_stereo_frame() {
        let mut remix = Remix::new(Channels::Mono, Channels::Stereo).unwrap();
        let frame = AudioFrame::new(vec![0.5, 0.8], 44100, Channels::Mono, 3).unwrap();

        let out = remix.process(&frame).unwrap();
        assert_eq!(out.channels(), Channels::Stereo);
        assert_eq!(out.samples(), &[0.5, 0.5, 0.8, 0.8]);
        assert_eq!(out.frame_number(), 3);
    }

    #[test]
    fn test_remix_surround_stays_in_range() {
        let mut remix = Remix::new(Channels::SurroundFivePointOne, Channels::Stereo).unwrap();
        let frame = AudioFrame::new(vec![1.0; 12], 48000, Channels::SurroundFivePointOne, 0)
            .unwrap();

        let out = remix.process(&frame).unwrap();
        assert_eq!(out.samples_per_channel(), 2);
        for &s in out.samples() {
            assert!((s - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_remix_rejects_wrong_layout() {
        let mut remix = Remix::new(Channels::Mono, Channels::Stereo).unwrap();
        let frame = AudioFrame::new(vec![0.0; 4], 44100, Channels::Stereo, 0).unwrap();
        assert!(matches!(
            remix.process(&frame),
            Err(AudioError::InvalidChannels { expected: 1, got: 2 })
        ));
    }

    #[test]
    fn test_remix_to_surround_unsupported() {
        assert!(Remix::new(Channels::Stereo, Channels::SurroundFivePointOne).is_err());
    }
}
