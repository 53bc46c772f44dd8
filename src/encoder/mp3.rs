use crate::core::{AudioFrame, Channels, EncodingParameters};
use crate::error::{AudioError, AudioResult};
use mp3lame_encoder::{Bitrate, Builder, DualPcm, FlushNoGap, MonoPcm, Quality};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// MP3 encoder backed by LAME
pub struct Mp3Encoder {
    encoder: mp3lame_encoder::Encoder,
    writer: Option<BufWriter<File>>,
    sample_rate: u32,
    channels: Channels,
    /// Scratch space for LAME output, reused between frames
    buffer: Vec<u8>,
    bytes_written: u64,
}

/// Map a bitrate in bps onto one of LAME's constant bitrates
fn lame_bitrate(bitrate_bps: u32) -> AudioResult<Bitrate> {
    let bitrate = match bitrate_bps / 1000 {
        8 => Bitrate::Kbps8,
        16 => Bitrate::Kbps16,
        24 => Bitrate::Kbps24,
        32 => Bitrate::Kbps32,
        40 => Bitrate::Kbps40,
        48 => Bitrate::Kbps48,
        64 => Bitrate::Kbps64,
        80 => Bitrate::Kbps80,
        96 => Bitrate::Kbps96,
        112 => Bitrate::Kbps112,
        128 => Bitrate::Kbps128,
        160 => Bitrate::Kbps160,
        192 => Bitrate::Kbps192,
        224 => Bitrate::Kbps224,
        256 => Bitrate::Kbps256,
        320 => Bitrate::Kbps320,
        _ => {
            return Err(AudioError::ConfigError(format!(
                "Unsupported MP3 bitrate: {} bps",
                bitrate_bps
            )));
        }
    };
    Ok(bitrate)
}

/// LAME algorithm quality used for every file
const QUALITY: Quality = Quality::Good;

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

impl Mp3Encoder {
    /// Create an MP3 encoder writing to `path`.
    ///
    /// The LAME encoder is configured before the file is created, so a bad
    /// parameter set never leaves an empty output file behind.
    pub fn new<P: AsRef<Path>>(path: P, params: &EncodingParameters) -> AudioResult<Self> {
        let channels = params.channels;
        if !matches!(channels, Channels::Mono | Channels::Stereo) {
            return Err(AudioError::ConfigError(format!(
                "MP3 output must be mono or stereo, got {}",
                channels.name()
            )));
        }

        let mut builder = Builder::new()
            .ok_or_else(|| AudioError::EncodeError("Failed to allocate LAME encoder".to_string()))?;
        builder
            .set_num_channels(channels.count() as u8)
            .map_err(|e| AudioError::ConfigError(format!("channels: {:?}", e)))?;
        builder
            .set_sample_rate(params.sample_rate_hz)
            .map_err(|e| AudioError::ConfigError(format!("sample rate: {:?}", e)))?;
        builder
            .set_brate(lame_bitrate(params.bitrate_bps)?)
            .map_err(|e| AudioError::ConfigError(format!("bitrate: {:?}", e)))?;
        builder
            .set_quality(QUALITY)
            .map_err(|e| AudioError::ConfigError(format!("quality: {:?}", e)))?;
        let encoder = builder
            .build()
            .map_err(|e| AudioError::EncodeError(format!("{:?}", e)))?;

        let writer = BufWriter::new(File::create(path)?);

        Ok(Mp3Encoder {
            encoder,
            writer: Some(writer),
            sample_rate: params.sample_rate_hz,
            channels,
            buffer: Vec::new(),
            bytes_written: 0,
        })
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the channel configuration
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Number of MP3 bytes written so far
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn write_buffer(&mut self) -> AudioResult<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| AudioError::ProcessingError("Encoder already finalized".to_string()))?;
        writer.write_all(&self.buffer)?;
        self.bytes_written += self.buffer.len() as u64;
        self.buffer.clear();
        Ok(())
    }
}

impl super::Encoder for Mp3Encoder {
    fn encode(&mut self, frame: &AudioFrame) -> AudioResult<()> {
        if frame.sample_rate() != self.sample_rate {
            return Err(AudioError::InvalidSampleRate {
                rate: frame.sample_rate(),
            });
        }

        if frame.channels() != self.channels {
            return Err(AudioError::InvalidChannels {
                expected: self.channels.count(),
                got: frame.channels().count(),
            });
        }

        if self.writer.is_none() {
            return Err(AudioError::ProcessingError(
                "Encoder already finalized".to_string(),
            ));
        }

        if frame.is_empty() {
            return Ok(());
        }

        self.buffer.clear();
        self.buffer
            .reserve(mp3lame_encoder::max_required_buffer_size(frame.samples().len()));

        let result = match self.channels {
            Channels::Mono => {
                let pcm: Vec<i16> = frame.samples().iter().map(|&s| to_i16(s)).collect();
                self.encoder.encode_to_vec(MonoPcm(&pcm), &mut self.buffer)
            }
            _ => {
                let (left, right): (Vec<i16>, Vec<i16>) = frame
                    .samples()
                    .chunks_exact(2)
                    .map(|lr| (to_i16(lr[0]), to_i16(lr[1])))
                    .unzip();
                self.encoder.encode_to_vec(
                    DualPcm {
                        left: &left,
                        right: &right,
                    },
                    &mut self.buffer,
                )
            }
        };
        result.map_err(|e| AudioError::EncodeError(format!("{:?}", e)))?;

        self.write_buffer()
    }

    fn finalize(&mut self) -> AudioResult<()> {
        if self.writer.is_none() {
            return Ok(());
        }

        self.buffer.clear();
        self.buffer
            .reserve(mp3lame_encoder::max_required_buffer_size(0));
        self.encoder
            .flush_to_vec::<FlushNoGap>(&mut self.buffer)
            .map_err(|e| AudioError::EncodeError(format!("{:?}", e)))?;
        self.write_buffer()?;

        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}
