pub mod trainer;
pub mod iteration_stats;
pub mod train_config;
pub mod loop_fn;

pub use trainer::{normalization_ranges, Trainer, TrainingOutcome, TrainingReport};
pub use iteration_stats::IterationStats;
pub use train_config::{ScalingMode, TrainingParameters};
pub use loop_fn::{component_errors, evaluation_error, run_one_pass, ComponentErrors};
