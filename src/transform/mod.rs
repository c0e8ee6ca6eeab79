//! Time-Domain Transformations
//!
//! Transformations turn one signal into another without modifying their
//! input. They can be stacked into a [`TransformationChain`], which applies
//! its members in order.

mod chain;
mod channels;

pub use chain::TransformationChain;
pub use channels::{DropChannel, DuplicateChannel, SelectChannels};

use crate::error::Result;
use crate::signal::AudioSignal;

/// Base trait for all time-domain transformations
pub trait TimeTransformation: Send + Sync {
    /// Produce a new signal from `signal`
    fn transform(&self, signal: &AudioSignal) -> Result<AudioSignal>;

    /// Describe the transformation and its parameters
    fn identification(&self) -> String;

    /// Clone the transformation into a boxed trait object
    fn box_clone(&self) -> Box<dyn TimeTransformation>;
}

impl Clone for Box<dyn TimeTransformation> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}
