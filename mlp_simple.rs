use rust_perceptron::architecture::{
    build_network, load_architecture, ArchitectureConfig, LayerConfig,
};
use rust_perceptron::config::{load_config, TrainingConfig};
use rust_perceptron::utils::SimpleRng;
use rust_perceptron::{FeatureVector, Network};
use std::error::Error;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// Small MLP learning XOR as a two-class problem (educational example).
const NUM_INPUTS: usize = 2;
const NUM_HIDDEN: usize = 4;
const NUM_CLASSES: usize = 2;
// Training hyperparameters used when no config file is given.
const LEARNING_RATE: f64 = 0.5;
const EPOCHS: usize = 5_000;
const SEED: u64 = 42;

// XOR samples: class 1 when exactly one input is set.
fn xor_samples() -> Vec<FeatureVector> {
    vec![
        FeatureVector::new(vec![0.0, 0.0], 0),
        FeatureVector::new(vec![0.0, 1.0], 1),
        FeatureVector::new(vec![1.0, 0.0], 1),
        FeatureVector::new(vec![1.0, 1.0], 0),
    ]
}

fn default_training() -> TrainingConfig {
    TrainingConfig {
        learning_rate: LEARNING_RATE,
        epochs: EPOCHS,
        seed: Some(SEED),
        shuffle: Some(true),
        target_encoding: Some("one_hot".to_string()),
    }
}

fn default_architecture() -> ArchitectureConfig {
    ArchitectureConfig {
        input_size: NUM_INPUTS,
        num_classes: NUM_CLASSES,
        hidden_layers: vec![LayerConfig {
            size: NUM_HIDDEN,
            activation: "sigmoid".to_string(),
            alpha: None,
        }],
        output_activation: "sigmoid".to_string(),
        output_alpha: None,
    }
}

// Usage: mlp_simple [training.json] [architecture.json]
fn configs_from_args(
    args: &[String],
) -> Result<(TrainingConfig, ArchitectureConfig), Box<dyn Error>> {
    let training = match args.get(1) {
        Some(path) => load_config(path)?,
        None => default_training(),
    };
    let architecture = match args.get(2) {
        Some(path) => load_architecture(path)?,
        None => default_architecture(),
    };
    Ok((training, architecture))
}

fn build(
    training: &TrainingConfig,
    architecture: &ArchitectureConfig,
) -> Result<(Network, SimpleRng), Box<dyn Error>> {
    let mut rng = match training.seed {
        Some(seed) => SimpleRng::new(seed),
        None => SimpleRng::from_time(),
    };
    let network = build_network(architecture, training.learning_rate, &mut rng)?
        .with_target_encoding(training.target_encoding());
    Ok((network, rng))
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let (training, architecture) = configs_from_args(args)?;
    let (mut network, mut rng) = build(&training, &architecture)?;
    let samples = xor_samples();

    let shuffle = if training.shuffle() { Some(&mut rng) } else { None };
    let history = network.train(&samples, training.epochs, shuffle)?;
    if let Some(last) = history.last() {
        info!(epochs = history.len(), final_error = *last, "training finished");
    }

    println!("Testing the trained network:");
    for sample in &samples {
        let scores = network.forward_propagation(sample)?.into_scores();
        println!(
            "Input: {:.1}, {:.1}, Expected class: {}, Scores: {:.3?}",
            sample.values()[0],
            sample.values()[1],
            sample.label(),
            scores
        );
    }
    let accuracy = network.test(&samples)?;
    println!("Accuracy: {:.2}%", accuracy * 100.0);
    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_args() {
        let args = vec!["mlp_simple".to_string()];
        let (training, architecture) = configs_from_args(&args).unwrap();
        assert_eq!(training.epochs, EPOCHS);
        assert_eq!(architecture.hidden_layers.len(), 1);
    }

    #[test]
    fn test_default_network_shape() {
        let (network, _) = build(&default_training(), &default_architecture()).unwrap();
        assert_eq!(network.layer_widths(), vec![NUM_HIDDEN, NUM_CLASSES]);
        assert_eq!(network.input_size(), NUM_INPUTS);
    }

    #[test]
    fn test_missing_config_file() {
        let args = vec!["mlp_simple".to_string(), "does/not/exist.json".to_string()];
        assert!(configs_from_args(&args).is_err());
    }
}
