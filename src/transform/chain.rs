//! Transformation chain
//!
//! Transformations run in chain order (index 0 first); each one receives
//! the previous one's output.

use tracing::debug;

use super::TimeTransformation;
use crate::error::Result;
use crate::signal::AudioSignal;

/// Ordered list of transformations applied as one
#[derive(Clone, Default)]
pub struct TransformationChain {
    transformations: Vec<Box<dyn TimeTransformation>>,
}

impl TransformationChain {
    /// Create a new empty chain
    pub fn new() -> Self {
        Self {
            transformations: Vec::new(),
        }
    }

    /// Append a transformation at the end of the chain
    pub fn add(&mut self, transformation: Box<dyn TimeTransformation>) {
        self.transformations.push(transformation);
    }

    /// Builder-style [`TransformationChain::add`]
    pub fn with(mut self, transformation: Box<dyn TimeTransformation>) -> Self {
        self.add(transformation);
        self
    }

    /// Insert a transformation at a specific index (clamped to the chain length)
    pub fn add_at(&mut self, transformation: Box<dyn TimeTransformation>, index: usize) {
        let index = index.min(self.transformations.len());
        self.transformations.insert(index, transformation);
    }

    /// Remove the transformation at `index`
    pub fn remove(&mut self, index: usize) -> Option<Box<dyn TimeTransformation>> {
        (index < self.transformations.len()).then(|| self.transformations.remove(index))
    }

    /// Get the number of transformations in the chain
    pub fn len(&self) -> usize {
        self.transformations.len()
    }

    /// Check if the chain is empty
    pub fn is_empty(&self) -> bool {
        self.transformations.is_empty()
    }

    /// Iterate over transformations
    pub fn iter(&self) -> impl Iterator<Item = &dyn TimeTransformation> {
        self.transformations.iter().map(|t| t.as_ref())
    }
}

impl TimeTransformation for TransformationChain {
    fn transform(&self, signal: &AudioSignal) -> Result<AudioSignal> {
        let mut current = signal.clone();
        for transformation in &self.transformations {
            current = transformation.transform(&current)?;
            debug!(
                step = %transformation.identification(),
                channels = current.num_channels(),
                "applied transformation"
            );
        }
        Ok(current)
    }

    fn identification(&self) -> String {
        if self.transformations.is_empty() {
            return "identity".to_string();
        }
        self.transformations
            .iter()
            .map(|t| t.identification())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    fn box_clone(&self) -> Box<dyn TimeTransformation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::AudioSignalMeta;
    use crate::transform::{DropChannel, DuplicateChannel};
    use ndarray::array;

    fn signal() -> AudioSignal {
        let meta = AudioSignalMeta::new(8000, 3, 16).unwrap();
        AudioSignal::new(array![[1, 1], [2, 2], [3, 3]], meta).unwrap()
    }

    #[test]
    fn test_chain_new() {
        let chain = TransformationChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
        assert_eq!(chain.identification(), "identity");
    }

    #[test]
    fn test_empty_chain_copies_input() {
        let input = signal();
        let output = TransformationChain::new().transform(&input).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_chain_applies_in_order() {
        let chain = TransformationChain::new()
            .with(Box::new(DropChannel::new(0)))
            .with(Box::new(DuplicateChannel::new(1, 0)));

        let input = signal();
        let output = chain.transform(&input).unwrap();

        assert_eq!(output.data(), array![[3, 3], [2, 2], [3, 3]]);
        assert_eq!(input.num_channels(), 3, "input must not be modified");
        assert_eq!(
            chain.identification(),
            "drop_channel(channel=0) -> duplicate_channel(source=1, position=0)"
        );
    }

    #[test]
    fn test_chain_stops_at_first_failure() {
        let chain = TransformationChain::new()
            .with(Box::new(DropChannel::new(0)))
            .with(Box::new(DropChannel::new(2)));
        assert!(chain.transform(&signal()).is_err());
    }

    #[test]
    fn test_add_at_and_remove() {
        let mut chain = TransformationChain::new();
        chain.add(Box::new(DropChannel::new(0)));
        chain.add_at(Box::new(DropChannel::new(1)), 0);
        chain.add_at(Box::new(DropChannel::new(2)), 99);

        let ids: Vec<String> = chain.iter().map(|t| t.identification()).collect();
        assert_eq!(
            ids,
            vec![
                "drop_channel(channel=1)",
                "drop_channel(channel=0)",
                "drop_channel(channel=2)"
            ]
        );

        assert!(chain.remove(5).is_none());
        assert!(chain.remove(0).is_some());
        assert_eq!(chain.len(), 2);
    }
}
