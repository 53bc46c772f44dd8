//! Fixtures shared by the unit tests.

use std::path::Path;

/// Write a 16-bit PCM WAV file holding a 440 Hz tone.
///
/// Every channel carries the same signal.
pub fn write_tone_wav(path: &Path, channels: u16, sample_rate: u32, frames: usize) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let value = ((t * 440.0 * std::f32::consts::TAU).sin() * 8000.0) as i16;
        for _ in 0..channels {
            writer.write_sample(value).unwrap();
        }
    }
    writer.finalize().unwrap();
}
