//! Soundproc - PCM Audio Signal Processing
//!
//! Soundproc loads uncompressed RIFF/WAVE files into an in-memory signal,
//! edits the channel layout, and writes the result back out.
//!
//! # Architecture
//!
//! - [`signal`]: `AudioSignal`, a channels x frames sample matrix plus metadata
//! - [`codec`]: decoder/encoder traits and the WAVE implementation
//! - [`transform`]: non-mutating transformations and chains of them
//! - [`cli`]: command-line front end used by the `soundproc` binary
//!
//! # Example
//!
//! ```no_run
//! use soundproc::{AudioDecoder, AudioEncoder, WaveDecoder, WaveEncoder};
//! use std::path::Path;
//!
//! let mut signal = WaveDecoder::new().decode(Path::new("in.wav"))?;
//! signal.duplicate_channel(0, 1)?;
//! WaveEncoder::new().encode(&signal, Path::new("out.wav"))?;
//! # Ok::<(), soundproc::SoundError>(())
//! ```

pub mod cli;
pub mod codec;
pub mod error;
pub mod signal;
pub mod transform;

pub use codec::{AudioDecoder, AudioEncoder, WaveDecoder, WaveEncoder};
pub use error::{Result, SoundError};
pub use signal::{AudioSignal, AudioSignalMeta};
pub use transform::{TimeTransformation, TransformationChain};
