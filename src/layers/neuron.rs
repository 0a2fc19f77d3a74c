use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::ActivationKind;
use crate::error::{ensure_len, Error, Result};
use crate::optim::sgd::Sgd;

/// Per-neuron hyperparameters, shared by every neuron of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeuronParameters {
    pub activation: ActivationKind,
    pub learning_rate: f64,
    #[serde(default)]
    pub bias: f64,
    #[serde(default)]
    pub momentum: f64,
}

impl NeuronParameters {
    pub fn new(activation: ActivationKind, learning_rate: f64, bias: f64, momentum: f64) -> Self {
        NeuronParameters { activation, learning_rate, bias, momentum }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "learning rate must be finite and positive, got {}",
                self.learning_rate
            )));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(Error::InvalidParameter(format!(
                "momentum must lie in [0, 1), got {}",
                self.momentum
            )));
        }
        if !self.bias.is_finite() {
            return Err(Error::InvalidParameter(format!("bias must be finite, got {}", self.bias)));
        }
        Ok(())
    }
}

/// A single weighted-sum-plus-activation unit.
///
/// Weights start at zero; call `initialize_random_weights` once after
/// construction. The bias is a fixed parameter and is never trained.
#[derive(Debug, Clone)]
pub struct Neuron {
    activation: ActivationKind,
    weights: Vec<f64>,
    bias: f64,
    optimizer: Sgd,
    // raw gradients of the previous step, one per weight
    last_gradients: Vec<f64>,
}

impl Neuron {
    pub fn new(inputs_size: usize, parameters: &NeuronParameters) -> Neuron {
        Neuron {
            activation: parameters.activation,
            weights: vec![0.0; inputs_size],
            bias: parameters.bias,
            optimizer: Sgd::new(parameters.learning_rate, parameters.momentum),
            last_gradients: vec![0.0; inputs_size],
        }
    }

    /// Draws every weight uniformly from `[-ε, ε]` with `ε = sqrt(6) / sqrt(n + 1)`.
    pub fn initialize_random_weights<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let epsilon = 6.0_f64.sqrt() / (self.weights.len() as f64 + 1.0).sqrt();
        let between = Uniform::new_inclusive(-epsilon, epsilon);
        for w in &mut self.weights {
            *w = between.sample(rng);
        }
    }

    pub fn evaluate(&self, inputs: &[f64]) -> Result<f64> {
        Ok(self.activation.function(self.weighted_sum(inputs)?))
    }

    /// Trains this neuron as part of the output layer against `target`.
    ///
    /// Returns the error sent upstream for each input, weighted by the
    /// weights as they were before this update.
    pub fn train_output(&mut self, inputs: &[f64], target: f64) -> Result<Vec<f64>> {
        let mut errors = vec![0.0; self.weights.len()];
        self.train_output_into(inputs, target, &mut errors)?;
        Ok(errors)
    }

    /// Trains this neuron inside a hidden (or first) layer.
    ///
    /// `next_layer_errors[k][node_index]` is the error the k-th neuron of the
    /// next layer sends back to this neuron.
    pub fn train_hidden(
        &mut self,
        inputs: &[f64],
        next_layer_errors: &[Vec<f64>],
        node_index: usize,
    ) -> Result<Vec<f64>> {
        let mut errors = vec![0.0; self.weights.len()];
        self.train_hidden_into(inputs, next_layer_errors, node_index, &mut errors)?;
        Ok(errors)
    }

    pub(crate) fn train_output_into(&mut self, inputs: &[f64], target: f64, errors: &mut [f64]) -> Result<()> {
        ensure_len("neuron error buffer", self.weights.len(), errors.len())?;
        let z = self.weighted_sum(inputs)?;
        let actual = self.activation.function(z);
        let local_error = self.activation.derivative(z) * (actual - target);
        self.update(inputs, local_error, errors);
        Ok(())
    }

    pub(crate) fn train_hidden_into(
        &mut self,
        inputs: &[f64],
        next_layer_errors: &[Vec<f64>],
        node_index: usize,
        errors: &mut [f64],
    ) -> Result<()> {
        ensure_len("neuron error buffer", self.weights.len(), errors.len())?;
        let z = self.weighted_sum(inputs)?;

        let mut incoming = 0.0;
        for next in next_layer_errors {
            match next.get(node_index) {
                Some(e) => incoming += e,
                None => return Err(Error::shape("next layer errors", node_index + 1, next.len())),
            }
        }

        let local_error = self.activation.derivative(z) * incoming;
        self.update(inputs, local_error, errors);
        Ok(())
    }

    fn update(&mut self, inputs: &[f64], local_error: f64, errors: &mut [f64]) {
        for (i, &x) in inputs.iter().enumerate() {
            errors[i] = local_error * self.weights[i];
            self.optimizer.step(&mut self.weights[i], &mut self.last_gradients[i], local_error * x);
        }
    }

    fn weighted_sum(&self, inputs: &[f64]) -> Result<f64> {
        ensure_len("neuron inputs", self.weights.len(), inputs.len())?;
        Ok(self.bias + self.weights.iter().zip(inputs).map(|(w, x)| w * x).sum::<f64>())
    }

    pub fn set_activation(&mut self, activation: ActivationKind) {
        self.activation = activation;
    }

    /// Resizes the weight and saved-gradient vectors. New slots start at zero.
    pub fn set_inputs_size(&mut self, inputs_size: usize) {
        self.weights.resize(inputs_size, 0.0);
        self.last_gradients.resize(inputs_size, 0.0);
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.optimizer.learning_rate = learning_rate;
    }

    pub fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }

    /// Replaces the weights; the length must match the current input size.
    pub fn set_weights(&mut self, weights: Vec<f64>) -> Result<()> {
        ensure_len("neuron weights", self.weights.len(), weights.len())?;
        self.weights = weights;
        Ok(())
    }

    pub fn inputs_size(&self) -> usize { self.weights.len() }
    pub fn weights(&self) -> &[f64] { &self.weights }
    pub fn bias(&self) -> f64 { self.bias }
    pub fn learning_rate(&self) -> f64 { self.optimizer.learning_rate }
    pub fn momentum(&self) -> f64 { self.optimizer.momentum }
    pub fn activation(&self) -> ActivationKind { self.activation }
}
