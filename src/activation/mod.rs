pub mod activation;

pub use activation::{ActivationBounds, ActivationKind};
