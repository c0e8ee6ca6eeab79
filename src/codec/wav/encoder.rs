//! WAVE encoding
//!
//! Writes a canonical PCM file: RIFF header, 16-byte fmt chunk, data chunk.
//! The fmt fields are recomputed from the signal's metadata on every call.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use super::chunk::{
    pack_samples, CHUNK_HEADER_LEN, DATA_TAG, FMT_TAG, PCM_FMT_LEN, RIFF_TAG, WAVE_TAG,
};
use crate::codec::AudioEncoder;
use crate::error::{Result, SoundError};
use crate::signal::{AudioSignal, AudioSignalMeta};

const PCM_FORMAT_CODE: u16 = 0x0001;

/// Encoder for integer PCM RIFF/WAVE files
#[derive(Debug, Clone, Copy, Default)]
pub struct WaveEncoder;

impl WaveEncoder {
    /// Create a new WAVE encoder
    pub fn new() -> Self {
        WaveEncoder
    }

    /// Serialize `signal` into `writer`
    ///
    /// # Errors
    /// * `WavFormat` - If the data does not fit a 32-bit RIFF size field, or
    ///   block align or byte rate overflow their fmt fields. Nothing has been
    ///   written in that case.
    /// * `Io` - If the writer fails
    pub fn encode_to_writer<W: Write>(&self, signal: &AudioSignal, mut writer: W) -> Result<()> {
        let fields = FmtFields::new(signal.meta())?;
        let data_len = data_chunk_len(signal)?;
        let riff_len = riff_chunk_len(data_len)?;

        write_header_chunk(&mut writer, riff_len)?;
        write_fmt_chunk(&mut writer, signal.meta(), fields)?;
        write_data_chunk(&mut writer, signal, data_len)?;
        Ok(())
    }

    /// Serialize `signal` into a new byte vector
    pub fn encode_to_bytes(&self, signal: &AudioSignal) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_to_writer(signal, &mut out)?;
        Ok(out)
    }
}

impl AudioEncoder for WaveEncoder {
    fn encode(&self, signal: &AudioSignal, path: &Path) -> Result<()> {
        // Size checks before the destination is created or truncated.
        FmtFields::new(signal.meta())?;
        riff_chunk_len(data_chunk_len(signal)?)?;

        let write_error = |source| SoundError::FileWrite {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(write_error)?;
        let mut writer = BufWriter::new(file);

        if let Err(e) = self.encode_to_writer(signal, &mut writer) {
            return Err(match e {
                SoundError::Io(source) => write_error(source),
                other => other,
            });
        }
        writer.flush().map_err(write_error)?;

        info!(
            path = %path.display(),
            channels = signal.num_channels(),
            frames = signal.num_frames(),
            bits_per_sample = signal.meta().bits_per_sample(),
            "encoded WAVE file"
        );
        Ok(())
    }
}

/// Derived fmt fields, checked against their on-disk widths
#[derive(Debug, Clone, Copy)]
struct FmtFields {
    block_align: u16,
    byte_rate: u32,
}

impl FmtFields {
    fn new(meta: &AudioSignalMeta) -> Result<Self> {
        let block_align = u16::try_from(meta.block_align()).map_err(|_| {
            SoundError::wav_format(format!(
                "block align of {} bytes does not fit the fmt chunk",
                meta.block_align()
            ))
        })?;
        let byte_rate = u32::try_from(meta.byte_rate()).map_err(|_| {
            SoundError::wav_format(format!(
                "byte rate of {} bytes per second does not fit the fmt chunk",
                meta.byte_rate()
            ))
        })?;
        Ok(Self {
            block_align,
            byte_rate,
        })
    }
}

fn data_chunk_len(signal: &AudioSignal) -> Result<u32> {
    let len = signal.meta().bytes_per_sample() as u64
        * signal.num_frames() as u64
        * u64::from(signal.num_channels());
    u32::try_from(len).map_err(|_| {
        SoundError::wav_format(format!(
            "sample data of {} bytes does not fit a WAVE data chunk",
            len
        ))
    })
}

/// `"WAVE"` + fmt chunk + data chunk
fn riff_chunk_len(data_len: u32) -> Result<u32> {
    let fmt_chunk_len = CHUNK_HEADER_LEN as u32 + PCM_FMT_LEN;
    let data_chunk_len = CHUNK_HEADER_LEN as u32;
    4u32.checked_add(fmt_chunk_len)
        .and_then(|len| len.checked_add(data_chunk_len))
        .and_then(|len| len.checked_add(data_len))
        .ok_or_else(|| {
            SoundError::wav_format(format!(
                "sample data of {} bytes does not fit a RIFF container",
                data_len
            ))
        })
}

fn write_header_chunk<W: Write>(writer: &mut W, riff_len: u32) -> Result<()> {
    writer.write_all(&RIFF_TAG)?;
    writer.write_all(&riff_len.to_le_bytes())?;
    writer.write_all(&WAVE_TAG)?;
    Ok(())
}

fn write_fmt_chunk<W: Write>(
    writer: &mut W,
    meta: &AudioSignalMeta,
    fields: FmtFields,
) -> Result<()> {
    writer.write_all(&FMT_TAG)?;
    writer.write_all(&PCM_FMT_LEN.to_le_bytes())?;
    writer.write_all(&PCM_FORMAT_CODE.to_le_bytes())?;
    writer.write_all(&meta.channels().to_le_bytes())?;
    writer.write_all(&meta.sampling_rate().to_le_bytes())?;
    writer.write_all(&fields.byte_rate.to_le_bytes())?;
    writer.write_all(&fields.block_align.to_le_bytes())?;
    writer.write_all(&meta.bits_per_sample().to_le_bytes())?;
    Ok(())
}

/// Samples go out frame-major: every channel of frame 0, then frame 1, ...
fn write_data_chunk<W: Write>(writer: &mut W, signal: &AudioSignal, data_len: u32) -> Result<()> {
    let mut payload = Vec::with_capacity(data_len as usize);
    let data = signal.data();
    let width = signal.meta().bytes_per_sample();
    pack_samples(data.t().iter(), width, &mut payload);

    writer.write_all(&DATA_TAG)?;
    writer.write_all(&data_len.to_le_bytes())?;
    writer.write_all(&payload)?;
    Ok(())
}
