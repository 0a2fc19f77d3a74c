use serde::{Serialize, Deserialize};

use crate::dataset::scaling::ScalingTransform;
use crate::error::{ensure_len, Error, Result};
use crate::network::network::Network;

/// Trains `network` once on every sample, in order, one sample at a time.
pub fn run_one_pass(network: &mut Network, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<()> {
    for (input, target) in inputs.iter().zip(targets) {
        network.train(input, target)?;
    }
    Ok(())
}

/// Mean over samples of the summed absolute difference between network
/// output and target.
///
/// Fails with `EmptyDataset` when there are no samples to average over.
pub fn evaluation_error(network: &mut Network, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<f64> {
    if inputs.is_empty() {
        return Err(Error::EmptyDataset);
    }
    let mut total = 0.0;
    for (input, target) in inputs.iter().zip(targets) {
        total += summed_absolute_error(network.evaluate(input)?, target);
    }
    Ok(total / inputs.len() as f64)
}

pub fn summed_absolute_error(predicted: &[f64], expected: &[f64]) -> f64 {
    predicted.iter().zip(expected).map(|(p, e)| (p - e).abs()).sum()
}

/// Absolute error accumulated separately for each output component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentErrors {
    pub samples: usize,
    /// `sums[j]` is the total of `|predicted[j] - expected[j]|` over all samples.
    pub sums: Vec<f64>,
}

impl ComponentErrors {
    pub fn new(outputs_size: usize) -> Self {
        ComponentErrors { samples: 0, sums: vec![0.0; outputs_size] }
    }

    pub fn add(&mut self, predicted: &[f64], expected: &[f64]) -> Result<()> {
        ensure_len("predicted outputs", self.sums.len(), predicted.len())?;
        ensure_len("expected outputs", self.sums.len(), expected.len())?;
        for ((sum, p), e) in self.sums.iter_mut().zip(predicted).zip(expected) {
            *sum += (p - e).abs();
        }
        self.samples += 1;
        Ok(())
    }

    /// Per-component mean absolute error; all zeros before any sample.
    pub fn means(&self) -> Vec<f64> {
        if self.samples == 0 {
            return vec![0.0; self.sums.len()];
        }
        self.sums.iter().map(|s| s / self.samples as f64).collect()
    }
}

/// Evaluates every sample and accumulates the absolute error per output
/// component. With `scaling`, predictions and targets are first mapped back
/// to dataset units.
pub fn component_errors(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    scaling: Option<&ScalingTransform>,
) -> Result<ComponentErrors> {
    if inputs.is_empty() {
        return Err(Error::EmptyDataset);
    }
    let mut errors = ComponentErrors::new(network.outputs_size());
    for (input, target) in inputs.iter().zip(targets) {
        let mut predicted = network.evaluate(input)?.to_vec();
        let mut expected = target.clone();
        if let Some(transform) = scaling {
            transform.restore_outputs(&mut predicted)?;
            transform.restore_outputs(&mut expected)?;
        }
        errors.add(&predicted, &expected)?;
    }
    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationKind;
    use crate::layers::{LayerParameters, NeuronParameters};
    use crate::network::NetworkParameters;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn identity_network() -> Network {
        let neuron = NeuronParameters::new(ActivationKind::Linear, 0.1, 0.0, 0.0);
        let mut network = Network::new(
            &NetworkParameters::new(2, vec![LayerParameters::new(2, neuron)]),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
        network.set_neuron_weights(0, 0, vec![1.0, 0.0]).unwrap();
        network.set_neuron_weights(0, 1, vec![0.0, 1.0]).unwrap();
        network
    }

    #[test]
    fn summed_absolute_error_adds_component_distances() {
        assert_eq!(summed_absolute_error(&[1.0, -2.0], &[0.5, 1.0]), 3.5);
    }

    #[test]
    fn evaluation_error_averages_over_samples() {
        let mut network = identity_network();
        let inputs = vec![vec![1.0, 1.0], vec![0.0, 0.0]];
        let targets = vec![vec![1.0, 2.0], vec![-1.0, 2.0]];
        // sample errors: 1 and 3
        assert_eq!(evaluation_error(&mut network, &inputs, &targets).unwrap(), 2.0);
    }

    #[test]
    fn evaluation_error_needs_samples() {
        let mut network = identity_network();
        assert!(matches!(evaluation_error(&mut network, &[], &[]), Err(Error::EmptyDataset)));
        assert!(matches!(component_errors(&mut network, &[], &[], None), Err(Error::EmptyDataset)));
    }

    #[test]
    fn component_errors_sum_and_average_each_output() {
        let mut network = identity_network();
        let inputs = vec![vec![1.0, 1.0], vec![0.0, 0.0]];
        let targets = vec![vec![1.0, 2.0], vec![-1.0, 2.0]];
        let errors = component_errors(&mut network, &inputs, &targets, None).unwrap();
        assert_eq!(errors.samples, 2);
        assert_eq!(errors.sums, vec![1.0, 3.0]);
        assert_eq!(errors.means(), vec![0.5, 1.5]);
    }

    #[test]
    fn component_errors_restore_dataset_units() {
        use crate::dataset::scaling::ComponentScaling;

        let mut network = identity_network();
        // outputs were halved before training
        let halve = ComponentScaling { offset: 0.0, divisor: 2.0, factor: 1.0, shift: 0.0 };
        let transform = ScalingTransform { inputs: vec![halve; 2], outputs: vec![halve; 2] };
        let errors = component_errors(&mut network, &[vec![1.0, 1.0]], &[vec![1.5, 0.0]], Some(&transform)).unwrap();
        assert_eq!(errors.sums, vec![1.0, 2.0]);
    }

    #[test]
    fn component_errors_check_widths() {
        let mut errors = ComponentErrors::new(2);
        assert!(errors.add(&[1.0], &[1.0]).is_err());
        assert_eq!(errors.means(), vec![0.0, 0.0]);
    }

    #[test]
    fn one_pass_trains_every_sample_in_order() {
        let mut network = identity_network();
        let inputs = vec![vec![1.0, 0.0]];
        let targets = vec![vec![2.0, 0.0]];
        run_one_pass(&mut network, &inputs, &targets).unwrap();
        // e = -1, w00 += 0.1
        assert!((network.neuron(0, 0).unwrap().weights()[0] - 1.1).abs() < 1e-12);
    }
}
