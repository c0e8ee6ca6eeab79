//! WAVE decoding
//!
//! Decoding is strictly sequential: the RIFF header, then the `fmt ` chunk,
//! then the `data` chunk, each validated before the next is trusted. A
//! dry-run validation pass runs first and the extraction pass re-walks the
//! same chunks, so a file either decodes completely or not at all.

use std::fs;
use std::path::Path;

use ndarray::Array2;
use tracing::{debug, info, warn};

use super::chunk::{
    display_tag, u16_at, unpack_samples, ChunkCursor, FmtChunkInfo, FormatCode,
    CHUNK_HEADER_LEN, DATA_TAG, FMT_TAG, PCM_FMT_LEN, RIFF_HEADER_LEN, RIFF_TAG, WAVE_TAG,
};
use crate::codec::AudioDecoder;
use crate::error::{Result, SoundError};
use crate::signal::{AudioSignal, AudioSignalMeta, SUPPORTED_BITS_PER_SAMPLE};

/// File extensions accepted by the decoder (compared case-insensitively)
pub const WAVE_EXTENSIONS: [&str; 2] = ["wav", "wave"];

/// Decoder for integer PCM RIFF/WAVE files
#[derive(Debug, Clone, Copy, Default)]
pub struct WaveDecoder;

impl WaveDecoder {
    /// Create a new WAVE decoder
    pub fn new() -> Self {
        WaveDecoder
    }

    /// Run every structural check on the file without extracting samples
    ///
    /// # Returns
    /// * `Ok(FmtChunkInfo)` - The validated fmt chunk fields
    ///
    /// # Errors
    /// * `Path` - If the path is missing, not a regular file, or lacks a
    ///   `.wav`/`.wave` extension
    /// * `FileRead` - If the file cannot be read
    /// * `WavFormat` - If the header, fmt, or data chunk is malformed
    pub fn validate(&self, path: &Path) -> Result<FmtChunkInfo> {
        check_path(path)?;
        let bytes = read_file(path)?;
        validate_layout(&bytes)
    }

    /// Decode an in-memory RIFF/WAVE image
    ///
    /// Applies the same structural checks as [`WaveDecoder::decode`],
    /// without the path check.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<AudioSignal> {
        validate_layout(bytes)?;
        extract_signal(bytes)
    }
}

impl AudioDecoder for WaveDecoder {
    fn decode(&self, path: &Path) -> Result<AudioSignal> {
        check_path(path)?;
        let bytes = read_file(path)?;
        let signal = self.decode_bytes(&bytes)?;

        info!(
            path = %path.display(),
            channels = signal.num_channels(),
            frames = signal.num_frames(),
            sampling_rate = signal.meta().sampling_rate(),
            "decoded WAVE file"
        );
        Ok(signal)
    }

    fn is_valid(&self, path: &Path) -> bool {
        match self.validate(path) {
            Ok(_) => true,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "WAVE validation failed");
                false
            }
        }
    }
}

/// Check that `path` is an existing regular file with a WAVE extension
fn check_path(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(SoundError::path(path, "not an existing regular file"));
    }

    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if WAVE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)) => Ok(()),
        Some(ext) => Err(SoundError::path(
            path,
            format!("incorrect extension '.{}', expected .wav or .wave", ext),
        )),
        None => Err(SoundError::path(path, "missing extension, expected .wav or .wave")),
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| SoundError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Dry-run pass over the header, fmt and data chunks
fn validate_layout(bytes: &[u8]) -> Result<FmtChunkInfo> {
    let mut cursor = ChunkCursor::new(bytes);

    validate_header_chunk(&cursor)?;
    cursor.advance(RIFF_HEADER_LEN)?;

    let fmt = validate_fmt_chunk(&cursor)?;
    let fmt_header = cursor.peek_chunk_header()?;
    cursor.advance(CHUNK_HEADER_LEN + fmt_header.size as usize)?;

    validate_data_chunk(&cursor, &fmt)?;
    Ok(fmt)
}

fn validate_header_chunk(cursor: &ChunkCursor<'_>) -> Result<()> {
    let remaining = cursor.remaining();
    if remaining < CHUNK_HEADER_LEN {
        return Err(SoundError::wav_format(format!(
            "header chunk should be at least {} bytes long, file has {}",
            CHUNK_HEADER_LEN, remaining
        )));
    }

    let header = cursor.peek_chunk_header()?;
    if header.id != RIFF_TAG {
        return Err(SoundError::wav_format(format!(
            "unexpected header chunk tag: expected \"RIFF\", got {}",
            header.tag()
        )));
    }

    let expected = (remaining - CHUNK_HEADER_LEN) as u64;
    if u64::from(header.size) != expected {
        return Err(SoundError::wav_format(format!(
            "declared RIFF chunk size {} does not match file size minus 8 ({})",
            header.size, expected
        )));
    }

    if header.size < 4 {
        return Err(SoundError::wav_format("missing \"WAVE\" format specifier"));
    }
    let format = cursor.peek_bytes(CHUNK_HEADER_LEN, 4)?;
    if format != WAVE_TAG {
        return Err(SoundError::wav_format(format!(
            "missing \"WAVE\" format specifier, got {}",
            display_tag(format)
        )));
    }

    debug!(size = header.size, "validated RIFF header");
    Ok(())
}

fn validate_fmt_chunk(cursor: &ChunkCursor<'_>) -> Result<FmtChunkInfo> {
    let remaining = cursor.remaining();
    if remaining < CHUNK_HEADER_LEN {
        return Err(SoundError::wav_format(format!(
            "fmt chunk should be at least {} bytes long, {} bytes left",
            CHUNK_HEADER_LEN, remaining
        )));
    }

    let header = cursor.peek_chunk_header()?;
    if header.id != FMT_TAG {
        return Err(SoundError::wav_format(format!(
            "unexpected chunk tag: expected \"fmt \", got {}",
            header.tag()
        )));
    }

    let available = remaining - CHUNK_HEADER_LEN;
    if u64::from(header.size) > available as u64 {
        return Err(SoundError::wav_format(format!(
            "declared fmt chunk size {} exceeds the {} bytes left in the file",
            header.size, available
        )));
    }

    let code = u16_at(cursor.peek_bytes(CHUNK_HEADER_LEN, 2)?, 0);
    let format = FormatCode::from(code);
    if format != FormatCode::Pcm {
        return Err(SoundError::wav_format(format!(
            "unhandled audio format {}, only PCM (0x0001) is supported",
            format
        )));
    }

    if header.size != PCM_FMT_LEN {
        return Err(SoundError::wav_format(format!(
            "wrong fmt chunk size for PCM: {} (should be {})",
            header.size, PCM_FMT_LEN
        )));
    }

    let payload = cursor.peek_bytes(CHUNK_HEADER_LEN, PCM_FMT_LEN as usize)?;
    let fmt = FmtChunkInfo::parse(payload);
    check_fmt_fields(&fmt)?;

    debug!(
        channels = fmt.num_channels,
        sample_rate = fmt.sample_rate,
        bits_per_sample = fmt.bits_per_sample,
        "validated fmt chunk"
    );
    Ok(fmt)
}

fn check_fmt_fields(fmt: &FmtChunkInfo) -> Result<()> {
    if fmt.num_channels == 0 {
        return Err(SoundError::wav_format("fmt chunk declares zero channels"));
    }

    if fmt.sample_rate == 0 {
        return Err(SoundError::wav_format("fmt chunk declares a zero sample rate"));
    }

    if fmt.bits_per_sample % 8 != 0 {
        return Err(SoundError::wav_format(format!(
            "incorrect number of bits per sample: {}, expected a multiple of 8",
            fmt.bits_per_sample
        )));
    }

    if !SUPPORTED_BITS_PER_SAMPLE.contains(&fmt.bits_per_sample) {
        return Err(SoundError::wav_format(format!(
            "unsupported bits per sample: {}, expected one of {:?}",
            fmt.bits_per_sample, SUPPORTED_BITS_PER_SAMPLE
        )));
    }

    let expected_block_align = u32::from(fmt.num_channels) * u32::from(fmt.bits_per_sample) / 8;
    if expected_block_align != u32::from(fmt.block_align) {
        return Err(SoundError::wav_format(format!(
            "incorrect block align: {}, should be {}",
            fmt.block_align, expected_block_align
        )));
    }

    let expected_byte_rate = u64::from(expected_block_align) * u64::from(fmt.sample_rate);
    if expected_byte_rate != u64::from(fmt.byte_rate) {
        return Err(SoundError::wav_format(format!(
            "incorrect byte rate: {}, should be {}",
            fmt.byte_rate, expected_byte_rate
        )));
    }

    Ok(())
}

fn validate_data_chunk(cursor: &ChunkCursor<'_>, fmt: &FmtChunkInfo) -> Result<()> {
    let remaining = cursor.remaining();
    if remaining < CHUNK_HEADER_LEN {
        return Err(SoundError::wav_format(format!(
            "data chunk should be at least {} bytes long, {} bytes left",
            CHUNK_HEADER_LEN, remaining
        )));
    }

    let header = cursor.peek_chunk_header()?;
    if header.id != DATA_TAG {
        return Err(SoundError::wav_format(format!(
            "unexpected chunk tag: expected \"data\", got {}",
            header.tag()
        )));
    }

    let available = remaining - CHUNK_HEADER_LEN;
    if u64::from(header.size) != available as u64 {
        return Err(SoundError::wav_format(format!(
            "declared data chunk size {} does not match the {} bytes left in the file",
            header.size, available
        )));
    }

    let leftover = header.size % u32::from(fmt.block_align);
    if leftover > 1 {
        return Err(SoundError::wav_format(format!(
            "data chunk size {} is not a multiple of block align {}, even allowing one pad byte",
            header.size, fmt.block_align
        )));
    }
    if leftover == 1 {
        warn!(
            size = header.size,
            "data chunk ends with a pad byte, ignoring it"
        );
    }

    debug!(size = header.size, "validated data chunk");
    Ok(())
}

/// Extraction pass; expects `bytes` to have passed [`validate_layout`]
fn extract_signal(bytes: &[u8]) -> Result<AudioSignal> {
    let mut cursor = ChunkCursor::new(bytes);
    cursor.advance(RIFF_HEADER_LEN)?;

    let fmt_header = cursor.peek_chunk_header()?;
    let fmt = FmtChunkInfo::parse(cursor.peek_bytes(CHUNK_HEADER_LEN, PCM_FMT_LEN as usize)?);
    // Skip by the declared length so non-16-byte fmt payloads land on the data chunk.
    cursor.advance(CHUNK_HEADER_LEN + fmt_header.size as usize)?;

    let data_header = cursor.peek_chunk_header()?;
    cursor.advance(CHUNK_HEADER_LEN)?;

    let channels = usize::from(fmt.num_channels);
    let block_align = usize::from(fmt.block_align);
    let frames = data_header.size as usize / block_align;
    let payload = cursor.read_bytes(frames * block_align)?;

    let samples = unpack_samples(payload, fmt.bytes_per_sample());
    let interleaved = Array2::from_shape_vec((frames, channels), samples)
        .map_err(|e| SoundError::wav_format(format!("cannot shape sample data: {}", e)))?;
    let data = interleaved.t().as_standard_layout().into_owned();

    let meta = AudioSignalMeta::new(fmt.sample_rate, fmt.num_channels, fmt.bits_per_sample)?;
    AudioSignal::new(data, meta)
}
