use super::Channels;

/// Output settings shared by every conversion in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingParameters {
    /// Codec identifier, e.g. "libmp3lame"
    pub codec: String,
    /// Constant bitrate in bits per second
    pub bitrate_bps: u32,
    /// Output channel layout
    pub channels: Channels,
    /// Output sample rate in Hz
    pub sample_rate_hz: u32,
    /// Container format, also used as the output file extension
    pub output_format: String,
}

impl EncodingParameters {
    /// LAME codec identifier
    pub const LAME_CODEC: &'static str = "libmp3lame";

    /// 128 kbps stereo MP3 at 44.1 kHz
    pub fn mp3() -> Self {
        EncodingParameters {
            codec: Self::LAME_CODEC.to_string(),
            bitrate_bps: 128_000,
            channels: Channels::Stereo,
            sample_rate_hz: 44_100,
            output_format: "mp3".to_string(),
        }
    }

    /// File extension for converted files
    pub fn extension(&self) -> &str {
        &self.output_format
    }

    /// Bitrate in kbps
    pub fn bitrate_kbps(&self) -> u32 {
        self.bitrate_bps / 1000
    }
}

impl Default for EncodingParameters {
    fn default() -> Self {
        Self::mp3()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = EncodingParameters::default();
        assert_eq!(params.codec, "libmp3lame");
        assert_eq!(params.bitrate_bps, 128_000);
        assert_eq!(params.bitrate_kbps(), 128);
        assert_eq!(params.channels, Channels::Stereo);
        assert_eq!(params.sample_rate_hz, 44_100);
        assert_eq!(params.extension(), "mp3");
    }
}
