use serde::{Serialize, Deserialize};

use crate::dataset::scaling::{ScalingRange, ScalingTransform};
use crate::error::{ensure_len, Error, Result};

/// Componentwise statistics over a set of equally sized vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentStatistics {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
    pub mean: Vec<f64>,
    /// Population standard deviation.
    pub std_dev: Vec<f64>,
}

impl ComponentStatistics {
    fn compute(rows: &[Vec<f64>]) -> ComponentStatistics {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let n = rows.len() as f64;

        let mut min = vec![f64::INFINITY; width];
        let mut max = vec![f64::NEG_INFINITY; width];
        let mut mean = vec![0.0; width];
        for row in rows {
            for (j, &x) in row.iter().enumerate() {
                min[j] = min[j].min(x);
                max[j] = max[j].max(x);
                mean[j] += x;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut std_dev = vec![0.0; width];
        for row in rows {
            for (j, &x) in row.iter().enumerate() {
                std_dev[j] += (x - mean[j]).powi(2);
            }
        }
        std_dev.iter_mut().for_each(|s| *s = (*s / n).sqrt());

        ComponentStatistics { min, max, mean, std_dev }
    }

    fn include(&mut self, row: &[f64]) {
        for (j, &x) in row.iter().enumerate() {
            self.min[j] = self.min[j].min(x);
            self.max[j] = self.max[j].max(x);
        }
    }

    fn width(&self) -> usize {
        self.min.len()
    }

    fn is_consistent(&self) -> bool {
        let w = self.width();
        self.max.len() == w && self.mean.len() == w && self.std_dev.len() == w
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatistics {
    pub inputs: ComponentStatistics,
    pub outputs: ComponentStatistics,
}

/// Paired input/target vectors plus the statistics used to rescale them.
///
/// `add_data` keeps min/max current but not mean/std_dev; until
/// `refresh_statistics` runs, `standardize` refuses to use them.
#[derive(Debug, Clone)]
pub struct Dataset {
    inputs: Vec<Vec<f64>>,
    outputs: Vec<Vec<f64>>,
    statistics: DatasetStatistics,
    moments_stale: bool,
}

impl Dataset {
    pub fn new(inputs: Vec<Vec<f64>>, outputs: Vec<Vec<f64>>) -> Result<Dataset> {
        check_samples(&inputs, &outputs)?;
        let statistics = DatasetStatistics {
            inputs: ComponentStatistics::compute(&inputs),
            outputs: ComponentStatistics::compute(&outputs),
        };
        Ok(Dataset { inputs, outputs, statistics, moments_stale: false })
    }

    /// Builds a dataset around statistics computed elsewhere, e.g. those of a
    /// larger dataset the samples were drawn from.
    pub fn with_statistics(
        inputs: Vec<Vec<f64>>,
        outputs: Vec<Vec<f64>>,
        statistics: DatasetStatistics,
    ) -> Result<Dataset> {
        check_samples(&inputs, &outputs)?;
        if !statistics.inputs.is_consistent() || !statistics.outputs.is_consistent() {
            return Err(Error::InvalidParameter("statistics vectors differ in length".into()));
        }
        ensure_len("input statistics", inputs[0].len(), statistics.inputs.width())?;
        ensure_len("output statistics", outputs[0].len(), statistics.outputs.width())?;
        Ok(Dataset { inputs, outputs, statistics, moments_stale: false })
    }

    /// Appends one sample. Min/max follow the new sample; mean and
    /// standard deviation become stale.
    pub fn add_data(&mut self, inputs: Vec<f64>, outputs: Vec<f64>) -> Result<()> {
        ensure_len("dataset inputs", self.inputs_size(), inputs.len())?;
        ensure_len("dataset outputs", self.outputs_size(), outputs.len())?;
        self.statistics.inputs.include(&inputs);
        self.statistics.outputs.include(&outputs);
        self.inputs.push(inputs);
        self.outputs.push(outputs);
        self.moments_stale = true;
        Ok(())
    }

    /// Recomputes every statistic from the stored samples.
    pub fn refresh_statistics(&mut self) {
        self.statistics = DatasetStatistics {
            inputs: ComponentStatistics::compute(&self.inputs),
            outputs: ComponentStatistics::compute(&self.outputs),
        };
        self.moments_stale = false;
    }

    /// Rescales every sample in place so each component's recorded min/max
    /// land on the bounds of `inputs_range` / `outputs_range`.
    pub fn normalize(&mut self, inputs_range: ScalingRange, outputs_range: ScalingRange) -> Result<ScalingTransform> {
        inputs_range.validate()?;
        outputs_range.validate()?;
        let transform = ScalingTransform::normalize(&self.statistics, inputs_range, outputs_range);
        self.apply(&transform)?;
        Ok(transform)
    }

    /// Rescales every sample in place to zero mean and unit variance.
    pub fn standardize(&mut self) -> Result<ScalingTransform> {
        if self.moments_stale {
            return Err(Error::StaleStatistics);
        }
        let transform = ScalingTransform::standardize(&self.statistics);
        self.apply(&transform)?;
        Ok(transform)
    }

    fn apply(&mut self, transform: &ScalingTransform) -> Result<()> {
        for row in &mut self.inputs {
            transform.scale_inputs(row)?;
        }
        for row in &mut self.outputs {
            transform.scale_outputs(row)?;
        }
        self.refresh_statistics();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn inputs_size(&self) -> usize {
        self.statistics.inputs.width()
    }

    pub fn outputs_size(&self) -> usize {
        self.statistics.outputs.width()
    }

    pub fn inputs(&self) -> &[Vec<f64>] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Vec<f64>] {
        &self.outputs
    }

    pub fn sample(&self, index: usize) -> Option<(&[f64], &[f64])> {
        Some((self.inputs.get(index)?.as_slice(), self.outputs.get(index)?.as_slice()))
    }

    pub fn statistics(&self) -> &DatasetStatistics {
        &self.statistics
    }

    pub fn has_stale_moments(&self) -> bool {
        self.moments_stale
    }
}

fn check_samples(inputs: &[Vec<f64>], outputs: &[Vec<f64>]) -> Result<()> {
    if inputs.is_empty() {
        return Err(Error::EmptyDataset);
    }
    ensure_len("dataset outputs count", inputs.len(), outputs.len())?;
    let (in_width, out_width) = (inputs[0].len(), outputs[0].len());
    if in_width == 0 || out_width == 0 {
        return Err(Error::Construction("dataset vectors must not be empty".into()));
    }
    for (i, o) in inputs.iter().zip(outputs) {
        ensure_len("dataset inputs", in_width, i.len())?;
        ensure_len("dataset outputs", out_width, o.len())?;
    }
    Ok(())
}
