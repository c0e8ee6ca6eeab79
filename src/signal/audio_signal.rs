//! Channel-major audio signal
//!
//! `AudioSignal` owns a `(channels, frames)` sample matrix together with the
//! metadata describing it. The number of matrix rows always equals
//! `meta.channels()`; structural edits replace both at once.

use std::iter;

use ndarray::{Array2, ArrayD, ArrayView1, ArrayView2, Axis, Ix2};
use tracing::debug;

use super::AudioSignalMeta;
use crate::error::{Result, SoundError};

/// Decoded audio in a format-agnostic representation
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSignal {
    /// Samples, one row per channel
    data: Array2<i32>,
    meta: AudioSignalMeta,
}

impl AudioSignal {
    /// Create a signal from a `(channels, frames)` matrix
    ///
    /// # Errors
    /// * `InvalidSignal` - If the row count differs from `meta.channels()`
    pub fn new(data: Array2<i32>, meta: AudioSignalMeta) -> Result<Self> {
        if data.nrows() != usize::from(meta.channels()) {
            return Err(SoundError::invalid_signal(format!(
                "sample matrix has {} rows but metadata declares {} channels",
                data.nrows(),
                meta.channels()
            )));
        }
        Ok(Self { data, meta })
    }

    /// Create a signal from an array of unknown dimensionality
    ///
    /// # Errors
    /// * `InvalidSignal` - If the array is not 2-dimensional or its row count
    ///   differs from `meta.channels()`
    pub fn from_dyn(data: ArrayD<i32>, meta: AudioSignalMeta) -> Result<Self> {
        let ndim = data.ndim();
        let data = data.into_dimensionality::<Ix2>().map_err(|_| {
            SoundError::invalid_signal(format!(
                "sample array must be 2-dimensional, got {} dimensions",
                ndim
            ))
        })?;
        Self::new(data, meta)
    }

    /// Create a signal from one sample vector per channel
    ///
    /// # Errors
    /// * `InvalidSignal` - If the channels differ in length or their count
    ///   differs from `meta.channels()`
    pub fn from_channels(channels: Vec<Vec<i32>>, meta: AudioSignalMeta) -> Result<Self> {
        let rows = channels.len();
        let frames = channels.first().map_or(0, Vec::len);

        if let Some(ragged) = channels.iter().position(|c| c.len() != frames) {
            return Err(SoundError::invalid_signal(format!(
                "channel {} has {} samples, expected {}",
                ragged,
                channels[ragged].len(),
                frames
            )));
        }

        let flat: Vec<i32> = channels.into_iter().flatten().collect();
        let data = Array2::from_shape_vec((rows, frames), flat)
            .map_err(|e| SoundError::invalid_signal(e.to_string()))?;

        Self::new(data, meta)
    }

    /// Read-only view of the sample matrix
    pub fn data(&self) -> ArrayView2<'_, i32> {
        self.data.view()
    }

    /// Signal metadata
    pub fn meta(&self) -> &AudioSignalMeta {
        &self.meta
    }

    /// Samples of a single channel
    pub fn channel(&self, index: usize) -> Option<ArrayView1<'_, i32>> {
        (index < self.data.nrows()).then(|| self.data.row(index))
    }

    /// Number of channels
    pub fn num_channels(&self) -> u16 {
        self.meta.channels()
    }

    /// Number of frames (samples per channel)
    pub fn num_frames(&self) -> usize {
        self.data.ncols()
    }

    /// Length of the signal in seconds
    pub fn duration(&self) -> f64 {
        self.num_frames() as f64 / f64::from(self.meta.sampling_rate())
    }

    /// Consume the signal, returning its matrix and metadata
    pub fn into_parts(self) -> (Array2<i32>, AudioSignalMeta) {
        (self.data, self.meta)
    }

    /// Remove the channel at `channel`
    ///
    /// Removing the last remaining channel is allowed and leaves a
    /// zero-channel signal that keeps its frame count.
    ///
    /// # Errors
    /// * `ChannelOutOfRange` - If `channel` is not below the channel count.
    ///   The signal is left unmodified.
    pub fn drop_channel(&mut self, channel: usize) -> Result<()> {
        let channels = self.meta.channels();
        self.check_channel(channel)?;

        let keep: Vec<usize> = (0..usize::from(channels))
            .filter(|&c| c != channel)
            .collect();
        let data = self.data.select(Axis(0), &keep);
        let meta = self.meta.with_channels(channels - 1);

        self.replace(data, meta);
        debug!(channel, channels = channels - 1, "dropped channel");
        Ok(())
    }

    /// Copy the channel at `source` and insert it before row `position`
    ///
    /// `position == channels` appends the copy at the end.
    ///
    /// # Errors
    /// * `PositionOutOfRange` - If `position` is greater than the channel
    ///   count (checked before `source`)
    /// * `ChannelOutOfRange` - If `source` is not below the channel count
    /// * `InvalidSignal` - If the signal already holds `u16::MAX` channels
    pub fn duplicate_channel(&mut self, source: usize, position: usize) -> Result<()> {
        let channels = self.meta.channels();
        if position > usize::from(channels) {
            return Err(SoundError::PositionOutOfRange {
                position: position as i64,
                channels,
            });
        }
        self.check_channel(source)?;

        let new_channels = channels
            .checked_add(1)
            .ok_or_else(|| SoundError::invalid_signal("channel count limit reached"))?;

        let order: Vec<usize> = (0..position)
            .chain(iter::once(source))
            .chain(position..usize::from(channels))
            .collect();
        let data = self.data.select(Axis(0), &order);
        let meta = self.meta.with_channels(new_channels);

        self.replace(data, meta);
        debug!(
            source,
            position,
            channels = new_channels,
            "duplicated channel"
        );
        Ok(())
    }

    fn check_channel(&self, channel: usize) -> Result<()> {
        let channels = self.meta.channels();
        if channel >= usize::from(channels) {
            return Err(SoundError::ChannelOutOfRange {
                channel: channel as i64,
                channels,
            });
        }
        Ok(())
    }

    // Matrix and metadata are always swapped together.
    fn replace(&mut self, data: Array2<i32>, meta: AudioSignalMeta) {
        debug_assert_eq!(data.nrows(), usize::from(meta.channels()));
        self.data = data;
        self.meta = meta;
    }
}
