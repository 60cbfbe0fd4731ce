//! Architecture configuration structures
//!
//! Describes a network topology in JSON so architectures can be tried out
//! without code changes, and builds the corresponding [`Network`].

use crate::network::Network;
use crate::utils::activations::{ActivationType, DEFAULT_ELU_ALPHA, DEFAULT_LEAKY_RELU_ALPHA};
use crate::utils::rng::SimpleRng;
use serde::Deserialize;
use std::error::Error;
use std::fs;

const VALID_ACTIVATIONS: [&str; 5] = ["sigmoid", "relu", "leaky_relu", "tanh", "elu"];

/// One hidden layer.
///
/// ```json
/// { "size": 16, "activation": "leaky_relu", "alpha": 0.05 }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct LayerConfig {
    /// Number of neurons
    pub size: usize,

    /// Activation name: "sigmoid", "relu", "leaky_relu", "tanh" or "elu"
    pub activation: String,

    /// Alpha for leaky_relu (default 0.01) and elu (default 1.0)
    pub alpha: Option<f64>,
}

/// Whole-network topology.
///
/// # Example
///
/// ```json
/// {
///   "input_size": 4,
///   "num_classes": 3,
///   "hidden_layers": [
///     { "size": 8, "activation": "tanh" }
///   ],
///   "output_activation": "sigmoid"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ArchitectureConfig {
    /// Number of features per sample
    pub input_size: usize,

    /// Width of the output layer
    pub num_classes: usize,

    /// Hidden layers, input side first
    #[serde(default)]
    pub hidden_layers: Vec<LayerConfig>,

    /// Activation name of the output layer
    pub output_activation: String,

    /// Alpha for a leaky_relu or elu output layer
    pub output_alpha: Option<f64>,
}

/// Loads an architecture configuration from a JSON file.
///
/// Reads the file at `path` and deserializes its JSON contents into an
/// `ArchitectureConfig`, then validates it.
///
/// # Examples
///
/// ```no_run
/// use rust_perceptron::architecture::load_architecture;
///
/// let arch = load_architecture("config/architectures/toy_mlp.json").unwrap();
/// assert_eq!(arch.input_size, 2);
/// ```
pub fn load_architecture(path: &str) -> Result<ArchitectureConfig, Box<dyn Error>> {
    let contents = fs::read_to_string(path)?;
    let config: ArchitectureConfig = serde_json::from_str(&contents)?;
    validate_architecture(&config)?;
    Ok(config)
}

/// Converts an activation name plus optional alpha into an [`ActivationType`].
pub fn parse_activation(name: &str, alpha: Option<f64>) -> Result<ActivationType, Box<dyn Error>> {
    let activation = match name.to_lowercase().as_str() {
        "sigmoid" => ActivationType::Sigmoid,
        "relu" => ActivationType::Relu,
        "tanh" => ActivationType::Tanh,
        "leaky_relu" => ActivationType::LeakyRelu {
            alpha: alpha.unwrap_or(DEFAULT_LEAKY_RELU_ALPHA),
        },
        "elu" => ActivationType::Elu {
            alpha: alpha.unwrap_or(DEFAULT_ELU_ALPHA),
        },
        _ => {
            return Err(invalid_data(format!(
                "Invalid activation function '{}'. Must be one of: {}",
                name,
                VALID_ACTIVATIONS.join(", ")
            )))
        }
    };

    match activation {
        ActivationType::LeakyRelu { alpha } if alpha < 0.0 => {
            Err(invalid_data("leaky_relu alpha must be non-negative".to_string()))
        }
        ActivationType::Elu { alpha } if alpha <= 0.0 => {
            Err(invalid_data("elu alpha must be positive".to_string()))
        }
        _ => Ok(activation),
    }
}

/// Validates an architecture configuration.
///
/// Checks that:
/// - `input_size` and `num_classes` are greater than 0
/// - every hidden layer has a positive size
/// - every activation name (and alpha) is valid
fn validate_architecture(config: &ArchitectureConfig) -> Result<(), Box<dyn Error>> {
    if config.input_size == 0 {
        return Err(invalid_data("input_size must be greater than 0".to_string()));
    }
    if config.num_classes == 0 {
        return Err(invalid_data("num_classes must be greater than 0".to_string()));
    }

    for (index, layer) in config.hidden_layers.iter().enumerate() {
        if layer.size == 0 {
            return Err(invalid_data(format!(
                "Layer {}: size must be greater than 0",
                index
            )));
        }
        parse_activation(&layer.activation, layer.alpha)
            .map_err(|e| invalid_data(format!("Layer {}: {}", index, e)))?;
    }

    parse_activation(&config.output_activation, config.output_alpha)
        .map_err(|e| invalid_data(format!("Output layer: {}", e)))?;

    Ok(())
}

/// Builds a network from an architecture configuration.
///
/// # Arguments
///
/// * `config` - Architecture configuration defining the layer sequence
/// * `learning_rate` - Step size for weight updates
/// * `rng` - Random number generator for weight initialization
///
/// # Examples
///
/// ```no_run
/// use rust_perceptron::architecture::{build_network, load_architecture};
/// use rust_perceptron::utils::rng::SimpleRng;
///
/// let config = load_architecture("config/architectures/toy_mlp.json").unwrap();
/// let mut rng = SimpleRng::new(42);
/// let network = build_network(&config, 0.1, &mut rng).unwrap();
/// assert_eq!(network.layers().len(), config.hidden_layers.len() + 1);
/// ```
pub fn build_network(
    config: &ArchitectureConfig,
    learning_rate: f64,
    rng: &mut SimpleRng,
) -> Result<Network, Box<dyn Error>> {
    validate_architecture(config)?;

    let hidden_sizes: Vec<usize> = config.hidden_layers.iter().map(|l| l.size).collect();
    let mut activations = config
        .hidden_layers
        .iter()
        .map(|l| parse_activation(&l.activation, l.alpha))
        .collect::<Result<Vec<_>, _>>()?;
    activations.push(parse_activation(
        &config.output_activation,
        config.output_alpha,
    )?);

    let network = Network::new(
        &hidden_sizes,
        &activations,
        config.input_size,
        config.num_classes,
        learning_rate,
        rng,
    )?;
    Ok(network)
}

fn invalid_data(message: String) -> Box<dyn Error> {
    Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(size: usize, activation: &str) -> LayerConfig {
        LayerConfig {
            size,
            activation: activation.to_string(),
            alpha: None,
        }
    }

    fn arch(hidden: Vec<LayerConfig>) -> ArchitectureConfig {
        ArchitectureConfig {
            input_size: 4,
            num_classes: 3,
            hidden_layers: hidden,
            output_activation: "sigmoid".to_string(),
            output_alpha: None,
        }
    }

    #[test]
    fn test_parse_activation_defaults() {
        assert_eq!(
            parse_activation("leaky_relu", None).unwrap(),
            ActivationType::LeakyRelu { alpha: 0.01 }
        );
        assert_eq!(
            parse_activation("ELU", None).unwrap(),
            ActivationType::Elu { alpha: 1.0 }
        );
        assert_eq!(
            parse_activation("tanh", Some(3.0)).unwrap(),
            ActivationType::Tanh
        );
    }

    #[test]
    fn test_parse_activation_invalid() {
        assert!(parse_activation("softmax", None).is_err());
        assert!(parse_activation("leaky_relu", Some(-0.1)).is_err());
        assert!(parse_activation("elu", Some(0.0)).is_err());
    }

    #[test]
    fn test_validate_zero_sized_layer() {
        let err = validate_architecture(&arch(vec![layer(0, "relu")])).unwrap_err();
        assert!(err.to_string().contains("Layer 0"));
    }

    #[test]
    fn test_validate_bad_output_activation() {
        let mut config = arch(vec![]);
        config.output_activation = "binary".to_string();
        assert!(validate_architecture(&config).is_err());
    }

    #[test]
    fn test_build_network() {
        let config = arch(vec![layer(8, "tanh"), layer(5, "relu")]);
        let mut rng = SimpleRng::new(42);
        let network = build_network(&config, 0.05, &mut rng).unwrap();

        assert_eq!(network.layer_widths(), vec![8, 5, 3]);
        assert_eq!(network.input_size(), 4);
        assert_eq!(network.layers()[0].activation(), ActivationType::Tanh);
        assert_eq!(network.layers()[1].activation(), ActivationType::Relu);
        assert_eq!(network.layers()[2].activation(), ActivationType::Sigmoid);
        assert_eq!(network.learning_rate(), 0.05);
    }

    #[test]
    fn test_build_network_rejects_bad_learning_rate() {
        let mut rng = SimpleRng::new(42);
        assert!(build_network(&arch(vec![]), 0.0, &mut rng).is_err());
    }
}
