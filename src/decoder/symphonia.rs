use crate::core::{AudioFrame, Channels};
use crate::error::{AudioError, AudioResult};
use log::{debug, warn};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Symphonia-based audio decoder
pub struct SymphoniaDecoder {
    reader: Box<dyn FormatReader>,
    decoder: Box<dyn symphonia::core::codecs::Decoder>,
    track_id: u32,
    sample_rate: u32,
    channels: Channels,
    frame_count: u64,
    finished: bool,
}

impl SymphoniaDecoder {
    /// Open a file and prepare to decode its first audio track
    pub fn from_file<P: AsRef<Path>>(path: P) -> AudioResult<Self> {
        let path = path.as_ref();
        let file = Box::new(File::open(path)?);
        let mss = MediaSourceStream::new(file, Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AudioError::UnsupportedFormat(e.to_string()))?;
        let reader = probed.format;

        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AudioError::InvalidMetadata("No audio track found".to_string()))?;

        let track_id = track.id;
        let codec_params = &track.codec_params;

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| AudioError::InvalidMetadata("Unknown sample rate".to_string()))?;

        let channels = match codec_params.channels {
            Some(layout) => Channels::from_count(layout.count() as u32)?,
            None => {
                return Err(AudioError::InvalidMetadata(
                    "Unknown channel count".to_string(),
                ));
            }
        };

        let decoder = symphonia::default::get_codecs()
            .make(codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::DecodeError(e.to_string()))?;

        debug!(
            "Opened {}: {} Hz, {}",
            path.display(),
            sample_rate,
            channels.name()
        );

        Ok(SymphoniaDecoder {
            reader,
            decoder,
            track_id,
            sample_rate,
            channels,
            frame_count: 0,
            finished: false,
        })
    }
}

impl super::Decoder for SymphoniaDecoder {
    fn decode_frame(&mut self) -> AudioResult<Option<AudioFrame>> {
        if self.finished {
            return Ok(None);
        }

        loop {
            let packet = match self.reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    self.finished = true;
                    return Ok(None);
                }
                Err(e) => return Err(AudioError::DecodeError(e.to_string())),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(msg)) => {
                    // Corrupt packet; the rest of the stream is still usable
                    warn!("Skipping undecodable packet: {}", msg);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if decoded.frames() == 0 {
                continue;
            }

            let spec = *decoded.spec();
            let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
            buffer.copy_interleaved_ref(decoded);

            let frame = AudioFrame::new(
                buffer.samples().to_vec(),
                self.sample_rate,
                self.channels,
                self.frame_count,
            )?;
            self.frame_count += 1;

            return Ok(Some(frame));
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> Channels {
        self.channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;
    use crate::test_utils::write_tone_wav;
    use tempfile::TempDir;

    #[test]
    fn test_invalid_file() {
        let result = SymphoniaDecoder::from_file("/nonexistent/file.wav");
        assert!(matches!(result, Err(AudioError::Io(_))));
    }

    #[test]
    fn test_empty_file_is_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.wav");
        File::create(&path).unwrap();

        let result = SymphoniaDecoder::from_file(&path);
        assert!(matches!(result, Err(AudioError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_decodes_every_sample() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tone.wav");
        write_tone_wav(&path, 2, 22050, 5000);

        let mut decoder = SymphoniaDecoder::from_file(&path).unwrap();
        assert_eq!(decoder.sample_rate(), 22050);
        assert_eq!(decoder.channels(), Channels::Stereo);

        let mut total = 0;
        while let Some(frame) = decoder.decode_frame().unwrap() {
            assert_eq!(frame.channels(), Channels::Stereo);
            total += frame.samples_per_channel();
        }
        assert!(decoder.is_finished());
        assert_eq!(total, 5000);
    }
}
