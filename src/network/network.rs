use std::path::Path;

use rand::Rng;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::error::{ensure_len, Error, Result};
use crate::layers::dense::{Layer, LayerParameters};
use crate::layers::neuron::Neuron;

/// Network shape: the input width plus one entry per layer, input → output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkParameters {
    pub inputs: usize,
    pub layers: Vec<LayerParameters>,
}

impl NetworkParameters {
    pub fn new(inputs: usize, layers: Vec<LayerParameters>) -> Self {
        NetworkParameters { inputs, layers }
    }
}

/// A multilayer perceptron.
///
/// `outputs[i]` caches layer `i`'s most recent forward result and
/// `errors[i]` holds layer `i`'s upstream error vectors during `train`.
/// Both are reused across calls and only reflect the last pass.
#[derive(Debug, Clone)]
pub struct Network {
    inputs_size: usize,
    layers: Vec<Layer>,
    outputs: Vec<Vec<f64>>,
    errors: Vec<Vec<Vec<f64>>>,
}

impl Network {
    /// Builds the layers left to right, each reading the previous layer's
    /// neurons (the network inputs for the first layer).
    pub fn new<R: Rng + ?Sized>(parameters: &NetworkParameters, rng: &mut R) -> Result<Network> {
        if parameters.layers.is_empty() {
            return Err(Error::Construction("network needs at least one layer".into()));
        }
        if parameters.inputs == 0 {
            return Err(Error::Construction("network needs at least one input".into()));
        }

        let mut layers = Vec::with_capacity(parameters.layers.len());
        let mut previous_size = parameters.inputs;
        for layer_parameters in &parameters.layers {
            let layer = Layer::new(previous_size, layer_parameters, rng)?;
            previous_size = layer.size();
            layers.push(layer);
        }

        let outputs = layers.iter().map(|l| Vec::with_capacity(l.size())).collect();
        let errors = layers.iter().map(Layer::error_buffers).collect();

        debug!(
            inputs = parameters.inputs,
            layers = ?layers.iter().map(Layer::size).collect::<Vec<_>>(),
            "built network"
        );

        Ok(Network { inputs_size: parameters.inputs, layers, outputs, errors })
    }

    /// Forward pass. The returned slice borrows the output cache and is
    /// overwritten by the next `evaluate` or `train`.
    pub fn evaluate(&mut self, inputs: &[f64]) -> Result<&[f64]> {
        self.forward(inputs)?;
        Ok(self.outputs.last().map(Vec::as_slice).unwrap_or(&[]))
    }

    /// One online backpropagation step on a single sample.
    ///
    /// Layers are updated strictly from the output back to the input; each
    /// layer's upstream errors are computed from its weights before its own
    /// update, and consumed only by the layer right before it.
    pub fn train(&mut self, inputs: &[f64], targets: &[f64]) -> Result<()> {
        ensure_len("network inputs", self.inputs_size, inputs.len())?;
        ensure_len("network targets", self.outputs_size(), targets.len())?;

        self.forward(inputs)?;

        let last = self.layers.len() - 1;
        let last_inputs: &[f64] = if last == 0 { inputs } else { &self.outputs[last - 1] };
        self.layers[last].train_output_into(last_inputs, targets, &mut self.errors[last])?;

        for i in (0..last).rev() {
            let layer_inputs: &[f64] = if i == 0 { inputs } else { &self.outputs[i - 1] };
            let (head, tail) = self.errors.split_at_mut(i + 1);
            self.layers[i].train_hidden_into(layer_inputs, &tail[0], &mut head[i])?;
        }

        Ok(())
    }

    fn forward(&mut self, inputs: &[f64]) -> Result<()> {
        ensure_len("network inputs", self.inputs_size, inputs.len())?;
        for (i, layer) in self.layers.iter().enumerate() {
            let (done, rest) = self.outputs.split_at_mut(i);
            let layer_inputs: &[f64] = if i == 0 { inputs } else { &done[i - 1] };
            layer.evaluate_into(layer_inputs, &mut rest[0])?;
        }
        Ok(())
    }

    pub fn set_neuron_weights(&mut self, layer: usize, neuron: usize, weights: Vec<f64>) -> Result<()> {
        let count = self.layers.len();
        self.layers
            .get_mut(layer)
            .ok_or_else(|| Error::InvalidParameter(format!("layer index {} out of range for network of {}", layer, count)))?
            .set_neuron_weights(neuron, weights)
    }

    pub fn neuron(&self, layer: usize, neuron: usize) -> Option<&Neuron> {
        self.layers.get(layer).and_then(|l| l.neuron(neuron))
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn inputs_size(&self) -> usize {
        self.inputs_size
    }

    pub fn outputs_size(&self) -> usize {
        self.layers.last().map(Layer::size).unwrap_or(0)
    }

    /// Raw weight dump, indexed `[layer][neuron][input]`.
    pub fn weights(&self) -> Vec<Vec<Vec<f64>>> {
        self.layers
            .iter()
            .map(|l| l.neurons().iter().map(|n| n.weights().to_vec()).collect())
            .collect()
    }

    /// Writes `weights()` as pretty-printed JSON.
    pub fn save_weights_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.weights())?;
        Ok(())
    }
}
