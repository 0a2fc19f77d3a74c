pub mod error;
pub mod activation;
pub mod optim;
pub mod layers;
pub mod network;
pub mod dataset;
pub mod train;

// Convenience re-exports
pub use error::{Error, Result};
pub use activation::activation::{ActivationBounds, ActivationKind};
pub use layers::dense::{Layer, LayerParameters};
pub use layers::neuron::{Neuron, NeuronParameters};
pub use network::network::{Network, NetworkParameters};
pub use network::spec::NetworkSpec;
pub use dataset::dataset::Dataset;
pub use dataset::scaling::{ScalingRange, ScalingTransform};
pub use optim::sgd::Sgd;
pub use train::trainer::{Trainer, TrainingOutcome, TrainingReport};
pub use train::train_config::{ScalingMode, TrainingParameters};
