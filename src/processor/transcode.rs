use super::Codec;
use crate::core::EncodingParameters;
use crate::decoder::{self, Decoder};
use crate::encoder::{Encoder, Mp3Encoder};
use crate::error::{AudioError, AudioResult};
use crate::filter::{Filter, Remix, Resample};
use log::{debug, warn};
use std::path::Path;

/// Decodes any Symphonia-readable file and re-encodes it as MP3.
///
/// Pipeline: decode -> remix to the target layout -> resample to the target
/// rate -> LAME encode. A failed conversion removes its partial output file.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mp3Transcoder;

impl Mp3Transcoder {
    /// Create a transcoder
    pub fn new() -> Self {
        Mp3Transcoder
    }

    fn check_parameters(params: &EncodingParameters) -> AudioResult<()> {
        if params.codec != EncodingParameters::LAME_CODEC {
            return Err(AudioError::ConfigError(format!(
                "Unsupported codec: {}",
                params.codec
            )));
        }
        if params.output_format != "mp3" {
            return Err(AudioError::UnsupportedFormat(params.output_format.clone()));
        }
        Ok(())
    }

    fn pump(
        decoder: &mut dyn Decoder,
        remix: &mut Remix,
        resample: &mut Resample,
        encoder: &mut Mp3Encoder,
    ) -> AudioResult<()> {
        while let Some(frame) = decoder.decode_frame()? {
            let frame = remix.process(&frame)?;
            let frame = resample.process(&frame)?;
            encoder.encode(&frame)?;
        }
        if let Some(tail) = resample.flush()? {
            encoder.encode(&tail)?;
        }
        encoder.finalize()
    }

    fn run(input: &Path, output: &Path, params: &EncodingParameters) -> AudioResult<u64> {
        let mut decoder = decoder::from_file(input)?;
        let mut remix = Remix::new(decoder.channels(), params.channels)?;
        let mut resample = Resample::new(decoder.sample_rate(), params.sample_rate_hz, params.channels)?;
        let mut encoder = Mp3Encoder::new(output, params)?;

        let result = Self::pump(decoder.as_mut(), &mut remix, &mut resample, &mut encoder);

        if let Err(e) = result {
            drop(encoder);
            if let Err(rm) = std::fs::remove_file(output) {
                warn!("Could not remove partial output {}: {}", output.display(), rm);
            }
            return Err(e);
        }

        Ok(encoder.bytes_written())
    }
}

impl Codec for Mp3Transcoder {
    fn encode(&self, input: &Path, output: &Path, params: &EncodingParameters) -> AudioResult<()> {
        Self::check_parameters(params)?;
        let bytes = Self::run(input, output, params)?;
        debug!(
            "Encoded {} -> {} ({} bytes)",
            input.display(),
            output.display(),
            bytes
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use crate::test_utils::write_tone_wav;
    use tempfile::TempDir;

    #[test]
    fn test_transcode_stereo_wav() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("a.wav");
        let output = dir.path().join("a.mp3");
        write_tone_wav(&input, 2, 44100, 44100);

        Mp3Transcoder::new()
            .encode(&input, &output, &EncodingParameters::default())
            .unwrap();

        assert!(std::fs::metadata(&output).unwrap().len() > 0);
    }

    #[test]
    fn test_transcode_mono_resampled_wav() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("m.wav");
        let output = dir.path().join("m.mp3");
        write_tone_wav(&input, 1, 22050, 10000);

        Mp3Transcoder::new()
            .encode(&input, &output, &EncodingParameters::default())
            .unwrap();

        assert!(output.exists());
    }

    #[test]
    fn test_empty_input_fails_without_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("empty.wav");
        let output = dir.path().join("empty.mp3");
        File::create(&input).unwrap();

        let result = Mp3Transcoder::new().encode(&input, &output, &EncodingParameters::default());
        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_three_channel_input_is_unsupported() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("odd.wav");
        let output = dir.path().join("odd.mp3");
        write_tone_wav(&input, 3, 44100, 100);

        let err = Mp3Transcoder::new()
            .encode(&input, &output, &EncodingParameters::default())
            .unwrap_err();
        assert!(matches!(err, AudioError::UnsupportedFormat(_)));
        assert!(err.to_string().contains("supported: 1, 2, 4, 6 or 8"));
        assert!(!output.exists());
    }

    #[test]
    fn test_rejects_foreign_codec() {
        let params = EncodingParameters {
            codec: "aac".to_string(),
            ..EncodingParameters::default()
        };
        let result = Mp3Transcoder::new().encode(Path::new("in.wav"), Path::new("out.mp3"), &params);
        assert!(matches!(result, Err(AudioError::ConfigError(_))));
    }
}
