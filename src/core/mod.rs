//! Core audio types and structures

/// Audio frame and channel layout types
pub mod audio;
/// Fixed encoding parameters
pub mod params;

pub use audio::{AudioFrame, Channels};
pub use params::EncodingParameters;
