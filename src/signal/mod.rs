//! Audio Signal Module
//!
//! Format-agnostic in-memory audio:
//! - Signal metadata (sampling rate, channels, sample width)
//! - Channel-major sample matrix with structural channel edits

mod audio_signal;
mod meta;

pub use audio_signal::AudioSignal;
pub use meta::{AudioSignalMeta, SUPPORTED_BITS_PER_SAMPLE};
