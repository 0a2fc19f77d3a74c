//! Compares the weight updates made by `Network::train` against central
//! finite differences of `L = 0.5 * Σ (y - t)^2`.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use mlp_trainer::{ActivationKind, LayerParameters, Network, NetworkParameters, NeuronParameters};

const LEARNING_RATE: f64 = 0.1;
const STEP: f64 = 1e-6;

fn three_layer_network(seed: u64) -> Network {
    let hidden = NeuronParameters::new(ActivationKind::HyperbolicTangent, LEARNING_RATE, 0.3, 0.0);
    let output = NeuronParameters::new(ActivationKind::Linear, LEARNING_RATE, -0.2, 0.0);
    let params = NetworkParameters::new(
        2,
        vec![
            LayerParameters::new(3, hidden),
            LayerParameters::new(2, hidden),
            LayerParameters::new(2, output),
        ],
    );
    Network::new(&params, &mut StdRng::seed_from_u64(seed)).unwrap()
}

fn loss(network: &mut Network, inputs: &[f64], targets: &[f64]) -> f64 {
    let outputs = network.evaluate(inputs).unwrap();
    0.5 * outputs.iter().zip(targets).map(|(y, t)| (y - t).powi(2)).sum::<f64>()
}

fn numerical_gradient(network: &Network, layer: usize, neuron: usize, input: usize, x: &[f64], t: &[f64]) -> f64 {
    let weights = network.neuron(layer, neuron).unwrap().weights().to_vec();

    let mut plus = network.clone();
    let mut w = weights.clone();
    w[input] += STEP;
    plus.set_neuron_weights(layer, neuron, w).unwrap();

    let mut minus = network.clone();
    let mut w = weights;
    w[input] -= STEP;
    minus.set_neuron_weights(layer, neuron, w).unwrap();

    (loss(&mut plus, x, t) - loss(&mut minus, x, t)) / (2.0 * STEP)
}

#[test]
fn backpropagated_updates_match_finite_differences() {
    let inputs = [0.4, -0.7];
    let targets = [0.25, -0.5];

    for seed in [1, 7, 42] {
        let before = three_layer_network(seed);
        let mut trained = before.clone();
        trained.train(&inputs, &targets).unwrap();

        let old = before.weights();
        let new = trained.weights();
        for (l, layer) in old.iter().enumerate() {
            for (n, neuron) in layer.iter().enumerate() {
                for i in 0..neuron.len() {
                    let analytic = (old[l][n][i] - new[l][n][i]) / LEARNING_RATE;
                    let numerical = numerical_gradient(&before, l, n, i, &inputs, &targets);
                    assert_relative_eq!(analytic, numerical, epsilon = 1e-7, max_relative = 1e-5);
                }
            }
        }
    }
}

#[test]
fn first_layer_gradient_from_training_predicts_the_loss_change() {
    let inputs = [0.9, 0.1];
    let targets = [0.0, 0.0];
    let mut network = three_layer_network(3);

    let mut trained = network.clone();
    trained.train(&inputs, &targets).unwrap();
    let before = network.neuron(0, 1).unwrap().weights()[0];
    let gradient = (before - trained.neuron(0, 1).unwrap().weights()[0]) / LEARNING_RATE;

    let nudge = 1e-4;
    let mut nudged = network.clone();
    let mut w = network.neuron(0, 1).unwrap().weights().to_vec();
    w[0] += nudge;
    nudged.set_neuron_weights(0, 1, w).unwrap();

    let base = loss(&mut network, &inputs, &targets);
    let predicted = base + gradient * nudge;
    assert_relative_eq!(loss(&mut nudged, &inputs, &targets), predicted, epsilon = 1e-6);
    assert!(gradient.abs() > 1e-6);
}

#[test]
fn single_step_reduces_squared_error() {
    let neuron = NeuronParameters::new(ActivationKind::Linear, 0.01, 0.0, 0.0);
    let params = NetworkParameters::new(3, vec![LayerParameters::new(1, neuron)]);
    let mut network = Network::new(&params, &mut StdRng::seed_from_u64(11)).unwrap();

    let inputs = [0.5, -1.0, 2.0];
    let targets = [4.0];
    let before = loss(&mut network, &inputs, &targets);
    network.train(&inputs, &targets).unwrap();
    assert!(loss(&mut network, &inputs, &targets) < before);
}
