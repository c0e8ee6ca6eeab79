//! Format-agnostic signal metadata

use serde::Serialize;

use crate::error::{Result, SoundError};

/// Sample widths the signal model can hold (one to four bytes per sample)
pub const SUPPORTED_BITS_PER_SAMPLE: [u16; 4] = [8, 16, 24, 32];

/// Data needed to interpret the sample matrix of an [`AudioSignal`].
///
/// `channels` is owned by the signal: it only changes together with the
/// sample matrix through the signal's channel edits.
///
/// [`AudioSignal`]: super::AudioSignal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AudioSignalMeta {
    /// Samples per second
    sampling_rate: u32,
    /// Number of channels (rows of the sample matrix)
    channels: u16,
    /// Bits used to encode one sample
    bits_per_sample: u16,
}

impl AudioSignalMeta {
    /// Create metadata, rejecting a zero sampling rate or an unsupported width
    pub fn new(sampling_rate: u32, channels: u16, bits_per_sample: u16) -> Result<Self> {
        if sampling_rate == 0 {
            return Err(SoundError::invalid_signal("sampling rate must be positive"));
        }
        if !SUPPORTED_BITS_PER_SAMPLE.contains(&bits_per_sample) {
            return Err(SoundError::invalid_signal(format!(
                "unsupported bits per sample: {} (expected one of {:?})",
                bits_per_sample, SUPPORTED_BITS_PER_SAMPLE
            )));
        }
        Ok(Self {
            sampling_rate,
            channels,
            bits_per_sample,
        })
    }

    /// Samples per second
    pub fn sampling_rate(&self) -> u32 {
        self.sampling_rate
    }

    /// Number of channels
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Bits per sample
    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    /// Bytes per sample
    pub fn bytes_per_sample(&self) -> usize {
        usize::from(self.bits_per_sample / 8)
    }

    /// Bytes per frame across all channels
    pub fn block_align(&self) -> u32 {
        u32::from(self.channels) * u32::from(self.bits_per_sample) / 8
    }

    /// Bytes per second of audio
    pub fn byte_rate(&self) -> u64 {
        u64::from(self.block_align()) * u64::from(self.sampling_rate)
    }

    pub(crate) fn with_channels(self, channels: u16) -> Self {
        Self { channels, ..self }
    }
}
