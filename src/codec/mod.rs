//! Audio Codec Module
//!
//! Capability traits for turning files into [`AudioSignal`]s and back, and
//! their implementations per container format. A new container format adds
//! an implementation here without touching the signal model.

pub mod wav;

use std::path::Path;

use crate::error::Result;
use crate::signal::AudioSignal;

pub use wav::{WaveDecoder, WaveEncoder};

/// Converts files of one container format into format-agnostic signals
pub trait AudioDecoder: Send + Sync {
    /// Read and decode the file at `path`
    ///
    /// Every structural check runs before any sample is trusted; on failure
    /// no partial signal is returned.
    fn decode(&self, path: &Path) -> Result<AudioSignal>;

    /// Tell whether `path` would decode successfully
    ///
    /// Never fails: a missing or malformed file is reported as `false`.
    fn is_valid(&self, path: &Path) -> bool;
}

/// Writes format-agnostic signals as files of one container format
pub trait AudioEncoder: Send + Sync {
    /// Encode `signal` into a new (or truncated) file at `path`
    fn encode(&self, signal: &AudioSignal, path: &Path) -> Result<()>;
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Pick a decoder by file extension
pub fn decoder_for(path: &Path) -> Option<Box<dyn AudioDecoder>> {
    let ext = extension(path)?;
    wav::WAVE_EXTENSIONS
        .contains(&ext.as_str())
        .then(|| Box::new(WaveDecoder::new()) as Box<dyn AudioDecoder>)
}

/// Pick an encoder by file extension
pub fn encoder_for(path: &Path) -> Option<Box<dyn AudioEncoder>> {
    let ext = extension(path)?;
    wav::WAVE_EXTENSIONS
        .contains(&ext.as_str())
        .then(|| Box::new(WaveEncoder::new()) as Box<dyn AudioEncoder>)
}
