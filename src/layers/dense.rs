use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::ActivationKind;
use crate::error::{ensure_len, Error, Result};
use crate::layers::neuron::{Neuron, NeuronParameters};

/// Describes one fully-connected layer.
///
/// Fields:
/// - `size`: number of neurons in this layer
/// - `neuron`: parameters shared by every neuron (activation, learning rate,
///   bias, momentum)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerParameters {
    pub size: usize,
    pub neuron: NeuronParameters,
}

impl LayerParameters {
    pub fn new(size: usize, neuron: NeuronParameters) -> Self {
        LayerParameters { size, neuron }
    }
}

/// An ordered group of neurons reading the same input vector.
#[derive(Debug, Clone)]
pub struct Layer {
    activation: ActivationKind,
    neurons: Vec<Neuron>,
}

impl Layer {
    /// Builds `parameters.size` neurons of `previous_size` inputs each and
    /// draws their initial weights from `rng`.
    pub fn new<R: Rng + ?Sized>(
        previous_size: usize,
        parameters: &LayerParameters,
        rng: &mut R,
    ) -> Result<Layer> {
        if parameters.size == 0 {
            return Err(Error::Construction("layer must contain at least one neuron".into()));
        }
        if previous_size == 0 {
            return Err(Error::Construction("layer must have at least one input".into()));
        }
        parameters.neuron.validate()?;

        let neurons = (0..parameters.size)
            .map(|_| {
                let mut neuron = Neuron::new(previous_size, &parameters.neuron);
                neuron.initialize_random_weights(rng);
                neuron
            })
            .collect();

        Ok(Layer { activation: parameters.neuron.activation, neurons })
    }

    pub fn evaluate(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        let mut outputs = Vec::with_capacity(self.size());
        self.evaluate_into(inputs, &mut outputs)?;
        Ok(outputs)
    }

    /// Same as `evaluate`, reusing `outputs` as the destination.
    pub fn evaluate_into(&self, inputs: &[f64], outputs: &mut Vec<f64>) -> Result<()> {
        ensure_len("layer inputs", self.inputs_size(), inputs.len())?;
        outputs.clear();
        for neuron in &self.neurons {
            outputs.push(neuron.evaluate(inputs)?);
        }
        Ok(())
    }

    /// Trains this layer as the output layer. Returns one upstream error
    /// vector per neuron.
    pub fn train_output(&mut self, inputs: &[f64], targets: &[f64]) -> Result<Vec<Vec<f64>>> {
        let mut errors = self.error_buffers();
        self.train_output_into(inputs, targets, &mut errors)?;
        Ok(errors)
    }

    /// Trains this layer from the error vectors of the layer after it;
    /// neuron `i` collects entry `i` of every vector.
    pub fn train_hidden(&mut self, inputs: &[f64], next_layer_errors: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let mut errors = self.error_buffers();
        self.train_hidden_into(inputs, next_layer_errors, &mut errors)?;
        Ok(errors)
    }

    pub(crate) fn train_output_into(
        &mut self,
        inputs: &[f64],
        targets: &[f64],
        errors: &mut [Vec<f64>],
    ) -> Result<()> {
        ensure_len("layer targets", self.size(), targets.len())?;
        ensure_len("layer inputs", self.inputs_size(), inputs.len())?;
        ensure_len("layer error buffers", self.size(), errors.len())?;
        for ((neuron, &target), out) in self.neurons.iter_mut().zip(targets).zip(errors.iter_mut()) {
            neuron.train_output_into(inputs, target, out)?;
        }
        Ok(())
    }

    pub(crate) fn train_hidden_into(
        &mut self,
        inputs: &[f64],
        next_layer_errors: &[Vec<f64>],
        errors: &mut [Vec<f64>],
    ) -> Result<()> {
        ensure_len("layer inputs", self.inputs_size(), inputs.len())?;
        ensure_len("layer error buffers", self.size(), errors.len())?;
        for (i, (neuron, out)) in self.neurons.iter_mut().zip(errors.iter_mut()).enumerate() {
            neuron.train_hidden_into(inputs, next_layer_errors, i, out)?;
        }
        Ok(())
    }

    /// Zeroed error buffers shaped for this layer: one vector per neuron,
    /// one entry per input.
    pub fn error_buffers(&self) -> Vec<Vec<f64>> {
        vec![vec![0.0; self.inputs_size()]; self.size()]
    }

    pub fn set_neuron_weights(&mut self, index: usize, weights: Vec<f64>) -> Result<()> {
        let size = self.size();
        let neuron = self
            .neurons
            .get_mut(index)
            .ok_or_else(|| Error::InvalidParameter(format!("neuron index {} out of range for layer of {}", index, size)))?;
        neuron.set_weights(weights)
    }

    pub fn size(&self) -> usize {
        self.neurons.len()
    }

    pub fn inputs_size(&self) -> usize {
        self.neurons.first().map(Neuron::inputs_size).unwrap_or(0)
    }

    pub fn activation(&self) -> ActivationKind {
        self.activation
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn neuron(&self, index: usize) -> Option<&Neuron> {
        self.neurons.get(index)
    }
}
