pub mod dense;
pub mod neuron;

pub use dense::{Layer, LayerParameters};
pub use neuron::{Neuron, NeuronParameters};
