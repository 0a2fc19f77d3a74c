use serde::{Serialize, Deserialize};

use crate::dataset::scaling::ScalingRange;
use crate::error::{Error, Result};

/// How the trainer rescales a dataset before training.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMode {
    /// Train on the raw values.
    None,
    /// Min/max normalize into the first layer's activation input bounds and
    /// the last layer's activation output bounds (`[-1, 1]` when unbounded).
    Normalize,
    /// Min/max normalize into explicit ranges.
    NormalizeTo { inputs: ScalingRange, outputs: ScalingRange },
    /// Zero mean, unit variance per component.
    Standardize,
}

impl Default for ScalingMode {
    fn default() -> Self {
        ScalingMode::Normalize
    }
}

/// Configuration for a `Trainer` run.
///
/// # Fields
/// - `max_iterations`: iteration cap; `None` is unbounded
/// - `error_threshold`: stop once the evaluation error is at or below it
/// - `rate_threshold`: stop once one iteration improves the error by at
///   most this much
/// - `validation_split`: fraction in `[0, 1]`; samples before
///   `floor(len * split)` train, the rest evaluate
/// - `scaling`: dataset rescaling applied once before training
/// - `verbose`: report progress at `info` level instead of `debug`
/// - `report_interval`: report every n-th iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingParameters {
    pub max_iterations: Option<u64>,
    pub error_threshold: Option<f64>,
    pub rate_threshold: Option<f64>,
    pub validation_split: f64,
    pub scaling: ScalingMode,
    pub verbose: bool,
    pub report_interval: u64,
}

impl Default for TrainingParameters {
    fn default() -> Self {
        TrainingParameters {
            max_iterations: Some(10_000),
            error_threshold: None,
            rate_threshold: None,
            validation_split: 0.7,
            scaling: ScalingMode::Normalize,
            verbose: false,
            report_interval: 1,
        }
    }
}

impl TrainingParameters {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.validation_split) {
            return Err(Error::InvalidParameter(format!(
                "validation split must lie in [0, 1], got {}",
                self.validation_split
            )));
        }
        for (name, value) in [("error threshold", self.error_threshold), ("rate threshold", self.rate_threshold)] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(Error::InvalidParameter(format!("{} must be finite, got {}", name, v)));
                }
            }
        }
        if self.max_iterations.is_none() && self.error_threshold.is_none() && self.rate_threshold.is_none() {
            return Err(Error::InvalidParameter(
                "at least one of max iterations, error threshold or rate threshold must be set".into(),
            ));
        }
        if self.report_interval == 0 {
            return Err(Error::InvalidParameter("report interval must be at least 1".into()));
        }
        if let ScalingMode::NormalizeTo { inputs, outputs } = self.scaling {
            inputs.validate()?;
            outputs.validate()?;
        }
        Ok(())
    }

    /// Index of the first evaluation sample for a dataset of `len` samples.
    pub fn split_index(&self, len: usize) -> usize {
        ((len as f64 * self.validation_split).floor() as usize).min(len)
    }
}
