//! Command-line driver: generate datasets and train networks on them.
//!
//! ```text
//! mlp-trainer generate --function sum --size 1000 --output sum.txt
//! mlp-trainer train --dataset sum.txt --hidden 5,5 --error-threshold 0.05 --verbose
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use mlp_trainer::dataset::{generator, loader};
use mlp_trainer::train::component_errors;
use mlp_trainer::{
    ActivationKind, Dataset, LayerParameters, Network, NetworkParameters, NetworkSpec, NeuronParameters,
    ScalingMode, ScalingTransform, Trainer, TrainingParameters,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Train small multilayer perceptrons with online backpropagation")]
struct Cli {
    /// Log every iteration at info level
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a synthetic dataset file
    Generate {
        #[command(flatten)]
        source: GeneratorArgs,

        /// Destination file
        #[arg(long)]
        output: PathBuf,
    },
    /// Build a network and train it on a dataset
    Train(TrainArgs),
}

#[derive(clap::Args, Debug)]
struct GeneratorArgs {
    /// Target function of the two inputs
    #[arg(long, value_enum, default_value_t = TargetFunction::Sum)]
    function: TargetFunction,

    /// Number of samples
    #[arg(long, default_value_t = 1000)]
    size: usize,

    /// Lower bound of every input component
    #[arg(long, default_value_t = -100.0, allow_hyphen_values = true)]
    lower: f64,

    /// Upper bound of every input component
    #[arg(long, default_value_t = 100.0, allow_hyphen_values = true)]
    upper: f64,

    /// Space inputs evenly instead of sampling them at random
    #[arg(long)]
    sampled: bool,

    /// Seed for the random generator (entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(clap::Args, Debug)]
struct TrainArgs {
    /// Dataset file; a synthetic one is generated when omitted
    #[arg(long)]
    dataset: Option<PathBuf>,

    #[command(flatten)]
    source: GeneratorArgs,

    /// Load network and training parameters from a JSON spec
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hidden layer sizes, comma separated
    #[arg(long, value_delimiter = ',', default_value = "5,5")]
    hidden: Vec<usize>,

    #[arg(long, value_enum, default_value_t = Activation::Tanh)]
    activation: Activation,

    #[arg(long, value_enum, default_value_t = Activation::Tanh)]
    output_activation: Activation,

    #[arg(long, default_value_t = 0.01)]
    learning_rate: f64,

    #[arg(long, default_value_t = 0.0)]
    momentum: f64,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    bias: f64,

    /// Iteration cap
    #[arg(long, default_value_t = 1000, conflicts_with = "unbounded")]
    max_iterations: u64,

    /// Run without an iteration cap; needs an error or rate threshold
    #[arg(long)]
    unbounded: bool,

    /// Stop once the evaluation error is at or below this value
    #[arg(long)]
    error_threshold: Option<f64>,

    /// Stop once an iteration improves the error by at most this much
    #[arg(long, allow_hyphen_values = true)]
    rate_threshold: Option<f64>,

    /// Fraction of samples used for training; the rest is held out
    #[arg(long, default_value_t = 0.7)]
    split: f64,

    #[arg(long, value_enum, default_value_t = Scaling::Normalize)]
    scaling: Scaling,

    /// Report every n-th iteration
    #[arg(long, default_value_t = 1)]
    report_interval: u64,

    /// Write the trained weights as JSON
    #[arg(long)]
    dump_weights: Option<PathBuf>,

    /// Write the effective network spec as JSON
    #[arg(long)]
    write_config: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TargetFunction {
    /// f(x, y) = 2x + y
    Sum,
    /// f(x, y) = x * y
    Product,
}

impl TargetFunction {
    fn evaluate(self, x: &[f64]) -> Vec<f64> {
        match self {
            TargetFunction::Sum => vec![2.0 * x[0] + x[1]],
            TargetFunction::Product => vec![x[0] * x[1]],
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Activation {
    Linear,
    Tanh,
    Relu,
}

impl From<Activation> for ActivationKind {
    fn from(a: Activation) -> Self {
        match a {
            Activation::Linear => ActivationKind::Linear,
            Activation::Tanh => ActivationKind::HyperbolicTangent,
            Activation::Relu => ActivationKind::RectifiedLinearUnits,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Scaling {
    None,
    Normalize,
    Standardize,
}

impl From<Scaling> for ScalingMode {
    fn from(s: Scaling) -> Self {
        match s {
            Scaling::None => ScalingMode::None,
            Scaling::Normalize => ScalingMode::Normalize,
            Scaling::Standardize => ScalingMode::Standardize,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
        .init();

    match cli.command {
        Command::Generate { source, output } => {
            let mut rng = make_rng(source.seed);
            let dataset = generate(&source, &mut rng)?;
            loader::save(&dataset, &output).with_context(|| format!("writing {}", output.display()))?;
            info!(samples = dataset.len(), path = %output.display(), "dataset written");
        }
        Command::Train(args) => train(args, cli.verbose)?,
    }
    Ok(())
}

fn train(args: TrainArgs, verbose: bool) -> Result<()> {
    let mut rng = make_rng(args.source.seed);

    let mut spec = match &args.config {
        Some(path) => NetworkSpec::load_json(path).with_context(|| format!("loading {}", path.display()))?,
        None => spec_from_args(&args),
    };
    spec.training.verbose |= verbose;

    let mut dataset = match &args.dataset {
        Some(path) => loader::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => generate(&args.source, &mut rng)?,
    };
    if dataset.inputs_size() != spec.network.inputs {
        bail!(
            "dataset has {} inputs but the network expects {}",
            dataset.inputs_size(),
            spec.network.inputs
        );
    }

    if let Some(path) = &args.write_config {
        spec.save_json(path).with_context(|| format!("writing {}", path.display()))?;
    }

    let mut network = Network::new(&spec.network, &mut rng)?;
    let trainer = Trainer::new(spec.training.clone())?;
    let report = trainer.train(&mut network, &mut dataset)?;

    info!(
        outcome = ?report.outcome,
        iterations = report.iterations,
        initial_error = report.initial_error,
        final_error = report.final_error,
        "training finished"
    );

    let split = spec.training.split_index(dataset.len());
    let errors = component_errors(
        &mut network,
        &dataset.inputs()[split..],
        &dataset.outputs()[split..],
        report.scaling.as_ref(),
    )?;
    let means = errors.means();
    for (j, (sum, mean)) in errors.sums.iter().zip(&means).enumerate() {
        info!(output = j, samples = errors.samples, error_sum = *sum, error_mean = *mean, "evaluation error");
    }

    print_predictions(&mut network, &dataset, report.scaling.as_ref())?;

    if let Some(path) = &args.dump_weights {
        network
            .save_weights_json(path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "weights written");
    }
    Ok(())
}

fn spec_from_args(args: &TrainArgs) -> NetworkSpec {
    let hidden = NeuronParameters::new(args.activation.into(), args.learning_rate, args.bias, args.momentum);
    let output = NeuronParameters { activation: args.output_activation.into(), ..hidden };

    let mut layers: Vec<LayerParameters> = args
        .hidden
        .iter()
        .filter(|&&size| size > 0)
        .map(|&size| LayerParameters::new(size, hidden))
        .collect();
    layers.push(LayerParameters::new(1, output));

    NetworkSpec {
        name: format!("{:?}", args.source.function).to_lowercase(),
        network: NetworkParameters::new(2, layers),
        training: TrainingParameters {
            max_iterations: (!args.unbounded).then_some(args.max_iterations),
            error_threshold: args.error_threshold,
            rate_threshold: args.rate_threshold,
            validation_split: args.split,
            scaling: args.scaling.into(),
            verbose: false,
            report_interval: args.report_interval,
        },
    }
}

fn generate(source: &GeneratorArgs, rng: &mut StdRng) -> Result<Dataset> {
    let function = source.function;
    let dataset = if source.sampled {
        generator::generate_sampled(source.size, 2, source.lower, source.upper, |x| function.evaluate(x))?
    } else {
        generator::generate_random(source.size, 2, source.lower, source.upper, |x| function.evaluate(x), rng)?
    };
    Ok(dataset)
}

/// Shows a few held-out samples in dataset units.
fn print_predictions(network: &mut Network, dataset: &Dataset, scaling: Option<&ScalingTransform>) -> Result<()> {
    let start = dataset.len().saturating_sub(5);
    for i in start..dataset.len() {
        let Some((inputs, targets)) = dataset.sample(i) else { continue };
        let mut predicted = network.evaluate(inputs)?.to_vec();
        let mut expected = targets.to_vec();
        let mut shown_inputs = inputs.to_vec();
        if let Some(transform) = scaling {
            transform.restore_outputs(&mut predicted)?;
            transform.restore_outputs(&mut expected)?;
            transform.restore_inputs(&mut shown_inputs)?;
        }
        println!("Input: {:?} -> Output: {:.4?} (expected {:.4?})", shown_inputs, predicted, expected);
    }
    Ok(())
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn train_args(extra: &[&str]) -> TrainArgs {
        let argv = ["mlp-trainer", "train"].iter().chain(extra).copied();
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Train(args) => args,
            other => panic!("expected train, got {:?}", other),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn iteration_cap_defaults_to_a_thousand() {
        let spec = spec_from_args(&train_args(&[]));
        assert_eq!(spec.training.max_iterations, Some(1000));
        assert!(Trainer::new(spec.training).is_ok());
    }

    #[test]
    fn unbounded_drops_the_iteration_cap() {
        let spec = spec_from_args(&train_args(&["--unbounded", "--error-threshold", "0.05"]));
        assert_eq!(spec.training.max_iterations, None);
        assert_eq!(spec.training.error_threshold, Some(0.05));
        assert!(Trainer::new(spec.training).is_ok());
    }

    #[test]
    fn unbounded_conflicts_with_an_explicit_cap() {
        let argv = ["mlp-trainer", "train", "--unbounded", "--max-iterations", "5"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn unbounded_without_thresholds_is_rejected_by_the_trainer() {
        let spec = spec_from_args(&train_args(&["--unbounded"]));
        assert!(Trainer::new(spec.training).is_err());
    }
}
