use std::time::Instant;

use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::dataset::dataset::Dataset;
use crate::dataset::scaling::{ScalingRange, ScalingTransform};
use crate::error::{ensure_len, Error, Result};
use crate::network::network::Network;
use crate::train::iteration_stats::IterationStats;
use crate::train::loop_fn::{evaluation_error, run_one_pass};
use crate::train::train_config::{ScalingMode, TrainingParameters};

/// Why a training run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingOutcome {
    /// The evaluation error reached the error threshold.
    Converged,
    /// An iteration improved the error by no more than the rate threshold.
    Stalled,
    /// The iteration cap was exceeded.
    Exhausted,
}

/// Summary of a finished `Trainer::train` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub outcome: TrainingOutcome,
    /// Completed passes over the training split.
    pub iterations: u64,
    pub initial_error: f64,
    pub final_error: f64,
    /// Improvement achieved by the last pass (the initial error if none ran).
    pub error_rate: f64,
    pub history: Vec<IterationStats>,
    /// Mapping applied to the dataset, if any; use it to scale new inputs
    /// and to map network outputs back to dataset units.
    pub scaling: Option<ScalingTransform>,
}

/// Trains a `Network` on a `Dataset` until one of the configured stopping
/// criteria holds.
#[derive(Debug, Clone)]
pub struct Trainer {
    parameters: TrainingParameters,
}

impl Trainer {
    pub fn new(parameters: TrainingParameters) -> Result<Trainer> {
        parameters.validate()?;
        Ok(Trainer { parameters })
    }

    pub fn parameters(&self) -> &TrainingParameters {
        &self.parameters
    }

    /// Rescales `dataset` in place, then alternates one online pass over the
    /// training split with an error measurement on the evaluation split.
    ///
    /// The dataset is only modified once every precondition has been
    /// checked. The network keeps whatever weights the last pass produced.
    pub fn train(&self, network: &mut Network, dataset: &mut Dataset) -> Result<TrainingReport> {
        if dataset.is_empty() {
            return Err(Error::EmptyDataset);
        }
        ensure_len("dataset inputs", network.inputs_size(), dataset.inputs_size())?;
        ensure_len("dataset outputs", network.outputs_size(), dataset.outputs_size())?;

        let split = self.parameters.split_index(dataset.len());
        let (training, evaluation) = (split, dataset.len() - split);
        if training == 0 || evaluation == 0 {
            return Err(Error::EmptySplit { training, evaluation });
        }

        let scaling = self.scale(network, dataset)?;

        let (train_inputs, eval_inputs) = dataset.inputs().split_at(split);
        let (train_targets, eval_targets) = dataset.outputs().split_at(split);

        let initial_error = evaluation_error(network, eval_inputs, eval_targets)?;
        self.report(format_args!(
            "start training: {} training samples, {} evaluation samples, error {:.6}",
            training, evaluation, initial_error
        ));

        let mut error = initial_error;
        let mut error_rate = initial_error;
        let mut iterations = 0u64;
        let mut history = Vec::new();

        let outcome = loop {
            if let Some(outcome) = self.stop_reason(iterations, error, error_rate) {
                break outcome;
            }

            let t_start = Instant::now();
            run_one_pass(network, train_inputs, train_targets)?;
            let current = evaluation_error(network, eval_inputs, eval_targets)?;

            error_rate = error - current;
            error = current;
            iterations += 1;

            let stats = IterationStats {
                iteration: iterations,
                error,
                error_rate,
                elapsed_ms: t_start.elapsed().as_millis() as u64,
            };
            if iterations % self.parameters.report_interval == 0 {
                self.report(format_args!(
                    "iteration {}: error {:.6} (goal {:?}), rate {:.6} (goal {:?})",
                    iterations, error, self.parameters.error_threshold, error_rate, self.parameters.rate_threshold
                ));
            }
            history.push(stats);
        };

        self.report(format_args!(
            "end training: {:?} after {} iterations, error {:.6}, rate {:.6}",
            outcome, iterations, error, error_rate
        ));

        Ok(TrainingReport {
            outcome,
            iterations,
            initial_error,
            final_error: error,
            error_rate,
            history,
            scaling,
        })
    }

    /// Checked before every pass, in order: error threshold, rate
    /// threshold, iteration cap. A `None` criterion never holds.
    fn stop_reason(&self, iterations: u64, error: f64, error_rate: f64) -> Option<TrainingOutcome> {
        let p = &self.parameters;
        if p.error_threshold.map_or(false, |t| error <= t) {
            Some(TrainingOutcome::Converged)
        } else if p.rate_threshold.map_or(false, |t| error_rate <= t) {
            Some(TrainingOutcome::Stalled)
        } else if p.max_iterations.map_or(false, |max| iterations > max) {
            Some(TrainingOutcome::Exhausted)
        } else {
            None
        }
    }

    fn scale(&self, network: &Network, dataset: &mut Dataset) -> Result<Option<ScalingTransform>> {
        match self.parameters.scaling {
            ScalingMode::None => Ok(None),
            ScalingMode::Normalize => {
                let (inputs, outputs) = normalization_ranges(network);
                dataset.normalize(inputs, outputs).map(Some)
            }
            ScalingMode::NormalizeTo { inputs, outputs } => dataset.normalize(inputs, outputs).map(Some),
            ScalingMode::Standardize => dataset.standardize().map(Some),
        }
    }

    fn report(&self, message: std::fmt::Arguments<'_>) {
        if self.parameters.verbose {
            info!("{}", message);
        } else {
            debug!("{}", message);
        }
    }
}

/// Ranges `ScalingMode::Normalize` maps inputs and targets into: the first
/// layer's activation input bounds and the last layer's activation output
/// bounds, each `[-1, 1]` when the activation has none.
pub fn normalization_ranges(network: &Network) -> (ScalingRange, ScalingRange) {
    let first = network.layers().first().and_then(|l| l.activation().bounds());
    let last = network.layers().last().and_then(|l| l.activation().bounds());
    (
        first.map(|b| b.inputs).unwrap_or_default(),
        last.map(|b| b.outputs).unwrap_or_default(),
    )
}
