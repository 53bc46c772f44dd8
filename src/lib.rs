#![warn(missing_docs)]

//! # wav2mp3: Concurrent WAV to MP3 batch converter
//!
//! Converts every `.wav` file directly inside a directory into an `.mp3`
//! file in another directory, one concurrent task per file.
//!
//! ## Features
//!
//! - **Batch** - directory scan, one task per file, optional concurrency cap,
//!   per-file failure isolation
//! - **Decode** - any format Symphonia reads (WAV in practice)
//! - **Transform** - channel remix and rubato resampling to the target layout
//! - **Encode** - 128 kbps stereo 44.1 kHz MP3 through LAME
//!
//! ## Quick Start
//!
//! ```ignore
//! use wav2mp3::batch::BatchConverter;
//! use wav2mp3::processor::Mp3Transcoder;
//!
//! let report = BatchConverter::new(Mp3Transcoder::new())
//!     .convert("in".as_ref(), "out".as_ref())
//!     .await?;
//! println!("{} of {} converted", report.succeeded(), report.dispatched());
//! ```

/// Core audio types and structures
pub mod core;
/// Error types for audio operations
pub mod error;
/// Audio decoder implementations
pub mod decoder;
/// Audio filter implementations
pub mod filter;
/// Audio encoder implementations
pub mod encoder;
/// Single-file codec adapter
pub mod processor;
/// Concurrent directory conversion
pub mod batch;

#[cfg(test)]
mod test_utils;

pub use batch::{BatchConverter, BatchReport, BatchStatus, ConversionOutcome, ConversionTask};
pub use self::core::{AudioFrame, Channels, EncodingParameters};
pub use error::{AudioError, AudioResult};
pub use processor::{Codec, Mp3Transcoder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
