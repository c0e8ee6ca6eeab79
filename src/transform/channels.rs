//! Channel-layout transformations

use ndarray::Axis;

use super::TimeTransformation;
use crate::error::{Result, SoundError};
use crate::signal::AudioSignal;

/// Remove one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropChannel {
    pub channel: usize,
}

impl DropChannel {
    pub fn new(channel: usize) -> Self {
        Self { channel }
    }
}

impl TimeTransformation for DropChannel {
    fn transform(&self, signal: &AudioSignal) -> Result<AudioSignal> {
        let mut output = signal.clone();
        output.drop_channel(self.channel)?;
        Ok(output)
    }

    fn identification(&self) -> String {
        format!("drop_channel(channel={})", self.channel)
    }

    fn box_clone(&self) -> Box<dyn TimeTransformation> {
        Box::new(*self)
    }
}

/// Copy one channel and insert it before `position`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateChannel {
    pub source: usize,
    pub position: usize,
}

impl DuplicateChannel {
    pub fn new(source: usize, position: usize) -> Self {
        Self { source, position }
    }
}

impl TimeTransformation for DuplicateChannel {
    fn transform(&self, signal: &AudioSignal) -> Result<AudioSignal> {
        let mut output = signal.clone();
        output.duplicate_channel(self.source, self.position)?;
        Ok(output)
    }

    fn identification(&self) -> String {
        format!(
            "duplicate_channel(source={}, position={})",
            self.source, self.position
        )
    }

    fn box_clone(&self) -> Box<dyn TimeTransformation> {
        Box::new(*self)
    }
}

/// Keep the listed channels, in the listed order
///
/// Indices may repeat, which duplicates the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectChannels {
    pub channels: Vec<usize>,
}

impl SelectChannels {
    pub fn new(channels: Vec<usize>) -> Self {
        Self { channels }
    }
}

impl TimeTransformation for SelectChannels {
    fn transform(&self, signal: &AudioSignal) -> Result<AudioSignal> {
        if self.channels.is_empty() {
            return Err(SoundError::invalid_signal("no channels selected"));
        }

        let available = signal.num_channels();
        let limit = usize::from(available);
        if let Some(&missing) = self.channels.iter().find(|&&c| c >= limit) {
            return Err(SoundError::ChannelOutOfRange {
                channel: missing as i64,
                channels: available,
            });
        }

        let count = u16::try_from(self.channels.len()).map_err(|_| {
            SoundError::invalid_signal(format!("{} channels selected", self.channels.len()))
        })?;

        let data = signal.data().select(Axis(0), &self.channels);
        AudioSignal::new(data, signal.meta().with_channels(count))
    }

    fn identification(&self) -> String {
        format!("select_channels(channels={:?})", self.channels)
    }

    fn box_clone(&self) -> Box<dyn TimeTransformation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::AudioSignalMeta;
    use ndarray::array;

    fn signal() -> AudioSignal {
        let meta = AudioSignalMeta::new(8000, 3, 16).unwrap();
        AudioSignal::new(array![[1, 2], [3, 4], [5, 6]], meta).unwrap()
    }

    #[test]
    fn test_drop_channel_leaves_input_untouched() {
        let input = signal();
        let output = DropChannel::new(1).transform(&input).unwrap();

        assert_eq!(output.data(), array![[1, 2], [5, 6]]);
        assert_eq!(input.num_channels(), 3);
    }

    #[test]
    fn test_duplicate_channel() {
        let output = DuplicateChannel::new(2, 3).transform(&signal()).unwrap();
        assert_eq!(output.data(), array![[1, 2], [3, 4], [5, 6], [5, 6]]);
        assert_eq!(output.meta().channels(), 4);
    }

    #[test]
    fn test_select_channels_reorders() {
        let selection = SelectChannels::new(vec![2, 0, 0]);
        let output = selection.transform(&signal()).unwrap();
        assert_eq!(output.data(), array![[5, 6], [1, 2], [1, 2]]);
        assert_eq!(output.meta().channels(), 3);
    }

    #[test]
    fn test_select_unknown_channel() {
        let result = SelectChannels::new(vec![0, 3]).transform(&signal());
        assert!(matches!(
            result,
            Err(SoundError::ChannelOutOfRange { channel: 3, .. })
        ));
    }

    #[test]
    fn test_select_nothing() {
        let result = SelectChannels::new(Vec::new()).transform(&signal());
        assert!(matches!(result, Err(SoundError::InvalidSignal { .. })));
    }
}
