use crate::core::{AudioFrame, Channels};
use crate::error::{AudioError, AudioResult};
use log::debug;
use rubato::{FftFixedIn, Resampler};

/// Requested input block size; rubato may round it
const CHUNK_SIZE: usize = 1024;

/// Sample-rate converter backed by rubato's FFT resampler.
///
/// Input frames of any length are buffered into fixed-size chunks. The
/// resampler's startup delay is trimmed from the head of the stream and
/// [`flush`](super::Filter::flush) emits exactly the number of frames the
/// input duration calls for, so output length tracks input length.
pub struct Resample {
    input_rate: u32,
    output_rate: u32,
    channels: Channels,
    resampler: Option<FftFixedIn<f32>>,
    chunk_size: usize,
    /// Deinterleaved samples waiting for a full chunk
    pending: Vec<Vec<f32>>,
    /// Output frames still to drop for the resampler delay
    skip: usize,
    frames_in: u64,
    frames_out: u64,
    frame_number: u64,
}

impl Resample {
    /// Create a new resampler
    ///
    /// # Arguments
    /// * `input_rate` - Input sample rate in Hz
    /// * `output_rate` - Output sample rate in Hz
    /// * `channels` - Channel layout of the frames to process
    pub fn new(input_rate: u32, output_rate: u32, channels: Channels) -> AudioResult<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: 0 });
        }

        let width = channels.count() as usize;
        let (resampler, chunk_size, skip) = if input_rate == output_rate {
            (None, 0, 0)
        } else {
            let resampler = FftFixedIn::<f32>::new(
                input_rate as usize,
                output_rate as usize,
                CHUNK_SIZE,
                2,
                width,
            )?;
            let chunk_size = resampler.input_frames_next();
            let delay = resampler.output_delay();
            debug!(
                "Resampler: {} Hz -> {} Hz ({} channels, chunk {}, delay {})",
                input_rate, output_rate, width, chunk_size, delay
            );
            (Some(resampler), chunk_size, delay)
        };

        Ok(Resample {
            input_rate,
            output_rate,
            channels,
            resampler,
            chunk_size,
            pending: vec![Vec::new(); width],
            skip,
            frames_in: 0,
            frames_out: 0,
            frame_number: 0,
        })
    }

    /// Get the input sample rate
    pub fn input_rate(&self) -> u32 {
        self.input_rate
    }

    /// Get the output sample rate
    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }

    /// Whether any conversion happens
    pub fn needs_resampling(&self) -> bool {
        self.resampler.is_some()
    }

    /// Output frames the input seen so far should produce
    fn expected_frames_out(&self) -> u64 {
        let num = self.frames_in * self.output_rate as u64;
        num.div_ceil(self.input_rate as u64)
    }

    /// Run every complete pending chunk through the resampler
    fn drain_chunks(&mut self, output: &mut Vec<f32>) -> AudioResult<()> {
        let Some(resampler) = self.resampler.as_mut() else {
            return Ok(());
        };
        let chunk_size = self.chunk_size;

        while self.pending[0].len() >= chunk_size {
            let chunk: Vec<Vec<f32>> = self
                .pending
                .iter_mut()
                .map(|ch| ch.drain(..chunk_size).collect())
                .collect();
            let resampled = resampler.process(&chunk, None)?;
            self.frames_out += interleave(&resampled, &mut self.skip, output) as u64;
        }

        Ok(())
    }

    fn next_frame(&mut self, samples: Vec<f32>) -> AudioResult<AudioFrame> {
        let frame = AudioFrame::new(samples, self.output_rate, self.channels, self.frame_number)?;
        self.frame_number += 1;
        Ok(frame)
    }
}

/// Interleave per-channel output into `output`, dropping the first `skip`
/// frames. Returns the number of frames appended.
fn interleave(channels: &[Vec<f32>], skip: &mut usize, output: &mut Vec<f32>) -> usize {
    let Some(first) = channels.first() else {
        return 0;
    };
    let frames = first.len();
    let start = (*skip).min(frames);
    *skip -= start;

    for i in start..frames {
        for ch in channels {
            output.push(ch[i]);
        }
    }

    frames - start
}

impl super::Filter for Resample {
    fn process(&mut self, frame: &AudioFrame) -> AudioResult<AudioFrame> {
        if frame.channels() != self.channels {
            return Err(AudioError::InvalidChannels {
                expected: self.channels.count(),
                got: frame.channels().count(),
            });
        }

        if frame.sample_rate() != self.input_rate {
            return Err(AudioError::InvalidSampleRate {
                rate: frame.sample_rate(),
            });
        }

        if !self.needs_resampling() {
            return Ok(frame.clone());
        }

        let width = self.channels.count() as usize;
        for (i, &sample) in frame.samples().iter().enumerate() {
            self.pending[i % width].push(sample);
        }
        self.frames_in += frame.samples_per_channel() as u64;

        let mut output = Vec::new();
        self.drain_chunks(&mut output)?;
        self.next_frame(output)
    }

    fn flush(&mut self) -> AudioResult<Option<AudioFrame>> {
        if !self.needs_resampling() || self.frames_in == 0 {
            return Ok(None);
        }

        let width = self.channels.count() as usize;
        let expected = self.expected_frames_out();
        let mut output = Vec::new();

        // Zero padding pushes the buffered tail and the resampler delay out
        while self.frames_out < expected {
            let fill = self.chunk_size - self.pending[0].len();
            for ch in &mut self.pending {
                ch.extend(std::iter::repeat_n(0.0, fill));
            }
            self.drain_chunks(&mut output)?;
        }

        let surplus = (self.frames_out - expected) as usize;
        output.truncate(output.len() - surplus * width);
        self.frames_out = expected;
        for ch in &mut self.pending {
            ch.clear();
        }

        if output.is_empty() {
            return Ok(None);
        }
        self.next_frame(output).map(Some)
    }
}
