pub mod dataset;
pub mod generator;
pub mod loader;
pub mod scaling;

pub use dataset::{ComponentStatistics, Dataset, DatasetStatistics};
pub use scaling::{ComponentScaling, ScalingRange, ScalingTransform};
