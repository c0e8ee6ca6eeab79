//! RIFF/WAVE container (integer PCM only)

mod chunk;
mod decoder;
mod encoder;

pub use chunk::{FmtChunkInfo, FormatCode};
pub use decoder::{WaveDecoder, WAVE_EXTENSIONS};
pub use encoder::WaveEncoder;
