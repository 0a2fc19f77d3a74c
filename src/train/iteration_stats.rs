use serde::{Serialize, Deserialize};

/// Per-iteration statistics recorded by `Trainer::train`.
///
/// One value is recorded after every completed pass over the training split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationStats {
    /// 1-based iteration number.
    pub iteration: u64,
    /// Mean summed absolute error over the evaluation split after this pass.
    pub error: f64,
    /// Error before this pass minus error after it; negative when the pass
    /// made things worse.
    pub error_rate: f64,
    /// Wall-clock duration of this single iteration in milliseconds.
    pub elapsed_ms: u64,
}
