//! RIFF/WAVE chunk primitives
//!
//! Layout of a canonical PCM file:
//!
//! | Offset | Size | Field                                   |
//! |-------:|-----:|-----------------------------------------|
//! |      0 |    4 | `"RIFF"`                                |
//! |      4 |    4 | RIFF chunk size (file size - 8)         |
//! |      8 |    4 | `"WAVE"`                                |
//! |     12 |    4 | `"fmt "`                                |
//! |     16 |    4 | fmt chunk size (16 for PCM)             |
//! |     20 |    2 | audio format (1 = PCM)                  |
//! |     22 |    2 | channels                                |
//! |     24 |    4 | sample rate                             |
//! |     28 |    4 | byte rate                               |
//! |     32 |    2 | block align                             |
//! |     34 |    2 | bits per sample                         |
//! |     36 |    4 | `"data"`                                |
//! |     40 |    4 | data chunk size                         |
//! |     44 |  ... | interleaved little-endian samples       |
//!
//! All multi-byte integers are little-endian.

use std::fmt;

use crate::error::{Result, SoundError};

pub(crate) const RIFF_TAG: [u8; 4] = *b"RIFF";
pub(crate) const WAVE_TAG: [u8; 4] = *b"WAVE";
pub(crate) const FMT_TAG: [u8; 4] = *b"fmt ";
pub(crate) const DATA_TAG: [u8; 4] = *b"data";

/// Tag plus length prefix of every chunk
pub(crate) const CHUNK_HEADER_LEN: usize = 8;
/// `"RIFF"`, size and `"WAVE"`
pub(crate) const RIFF_HEADER_LEN: usize = 12;
/// fmt payload length for PCM
pub(crate) const PCM_FMT_LEN: u32 = 16;

/// Audio format code stored in the fmt chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCode {
    Pcm,
    IeeeFloat,
    ALaw,
    MuLaw,
    Extensible,
    Unknown(u16),
}

impl From<u16> for FormatCode {
    fn from(code: u16) -> Self {
        match code {
            0x0001 => FormatCode::Pcm,
            0x0003 => FormatCode::IeeeFloat,
            0x0006 => FormatCode::ALaw,
            0x0007 => FormatCode::MuLaw,
            0xFFFE => FormatCode::Extensible,
            other => FormatCode::Unknown(other),
        }
    }
}

impl fmt::Display for FormatCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatCode::Pcm => write!(f, "PCM (0x0001)"),
            FormatCode::IeeeFloat => write!(f, "IEEE float (0x0003)"),
            FormatCode::ALaw => write!(f, "A-law (0x0006)"),
            FormatCode::MuLaw => write!(f, "mu-law (0x0007)"),
            FormatCode::Extensible => write!(f, "extensible (0xFFFE)"),
            FormatCode::Unknown(code) => write!(f, "unknown (0x{:04X})", code),
        }
    }
}

/// Tag and declared payload length of a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChunkHeader {
    pub id: [u8; 4],
    pub size: u32,
}

impl ChunkHeader {
    /// Printable form of the tag for diagnostics
    pub fn tag(&self) -> String {
        display_tag(&self.id)
    }
}

pub(crate) fn display_tag(tag: &[u8]) -> String {
    format!("\"{}\"", tag.escape_ascii())
}

/// Read position over an in-memory RIFF image
///
/// Every read is bounds-checked; running off the end of the buffer is a
/// `WavFormat` error.
#[derive(Debug)]
pub(crate) struct ChunkCursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ChunkCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Bytes between the cursor and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// Read the chunk header at the cursor without moving it.
    ///
    /// The caller advances explicitly once it has inspected the chunk.
    pub fn peek_chunk_header(&self) -> Result<ChunkHeader> {
        let raw = self.peek_bytes(0, CHUNK_HEADER_LEN)?;
        Ok(ChunkHeader {
            id: [raw[0], raw[1], raw[2], raw[3]],
            size: u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]),
        })
    }

    /// Borrow `len` bytes starting `offset` bytes past the cursor
    pub fn peek_bytes(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        let bytes: &'a [u8] = self.bytes;
        self.position
            .checked_add(offset)
            .and_then(|start| start.checked_add(len).map(|end| (start, end)))
            .and_then(|(start, end)| bytes.get(start..end))
            .ok_or_else(|| {
                SoundError::wav_format(format!(
                    "unexpected end of file: needed {} bytes at offset {}, file is {} bytes long",
                    len,
                    self.position.saturating_add(offset),
                    bytes.len()
                ))
            })
    }

    /// Borrow `len` bytes at the cursor and move past them
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let slice = self.peek_bytes(0, len)?;
        self.position += len;
        Ok(slice)
    }

    /// Move the cursor forward by `len` bytes
    pub fn advance(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }
}

/// Fields of a 16-byte PCM fmt chunk payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FmtChunkInfo {
    pub num_channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl FmtChunkInfo {
    /// Parse the fields following the audio format code.
    ///
    /// `payload` starts at the audio format field and holds at least
    /// [`PCM_FMT_LEN`] bytes.
    pub(crate) fn parse(payload: &[u8]) -> Self {
        Self {
            num_channels: u16_at(payload, 2),
            sample_rate: u32_at(payload, 4),
            byte_rate: u32_at(payload, 8),
            block_align: u16_at(payload, 12),
            bits_per_sample: u16_at(payload, 14),
        }
    }

    /// Bytes per single-channel sample
    pub fn bytes_per_sample(&self) -> usize {
        usize::from(self.bits_per_sample / 8)
    }
}

pub(crate) fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

pub(crate) fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Sign-extend little-endian samples of `width` bytes (1..=4) to `i32`.
///
/// Trailing bytes that do not fill a whole sample are ignored.
pub(crate) fn unpack_samples(bytes: &[u8], width: usize) -> Vec<i32> {
    debug_assert!((1..=4).contains(&width));
    let shift = 32 - 8 * width as u32;
    bytes
        .chunks_exact(width)
        .map(|sample| {
            let mut buf = [0u8; 4];
            buf[..width].copy_from_slice(sample);
            (i32::from_le_bytes(buf) << shift) >> shift
        })
        .collect()
}

/// Append the low `width` bytes of each sample's little-endian form
pub(crate) fn pack_samples<'s>(
    samples: impl IntoIterator<Item = &'s i32>,
    width: usize,
    out: &mut Vec<u8>,
) {
    debug_assert!((1..=4).contains(&width));
    for sample in samples {
        out.extend_from_slice(&sample.to_le_bytes()[..width]);
    }
}
