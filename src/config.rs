//! Configuration structures for training
//!
//! Training hyperparameters are read from JSON files so runs can be tuned
//! without code changes.

use crate::network::TargetEncoding;
use serde::Deserialize;
use std::error::Error;
use std::fs;

/// Target encodings accepted in `target_encoding`.
const VALID_TARGET_ENCODINGS: [&str; 2] = ["label", "one_hot"];

/// Configuration for a training run.
///
/// # Example
///
/// ```json
/// {
///   "learning_rate": 0.1,
///   "epochs": 200,
///   "seed": 42,
///   "shuffle": true,
///   "target_encoding": "one_hot"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// Step size applied to every delta-driven weight update
    pub learning_rate: f64,

    /// Number of passes over the training samples
    pub epochs: usize,

    /// Seed for weight initialization and shuffling; omitted means time-seeded
    pub seed: Option<u64>,

    /// Reshuffle the sample order every epoch (default false)
    pub shuffle: Option<bool>,

    /// "label" (default) or "one_hot"
    pub target_encoding: Option<String>,
}

impl TrainingConfig {
    /// Parsed target encoding, falling back to [`TargetEncoding::Label`].
    pub fn target_encoding(&self) -> TargetEncoding {
        match self.target_encoding.as_deref() {
            Some("one_hot") => TargetEncoding::OneHot,
            _ => TargetEncoding::Label,
        }
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle.unwrap_or(false)
    }
}

/// Loads a training configuration from a JSON file.
///
/// Reads the file at `path` and deserializes its JSON contents into a `TrainingConfig`.
///
/// # Returns
///
/// `Ok(TrainingConfig)` on success, or an error if the file cannot be read,
/// the JSON is invalid, or a value is out of range.
///
/// # Examples
///
/// ```no_run
/// use rust_perceptron::config::load_config;
///
/// let cfg = load_config("config/toy_training.json").unwrap();
/// assert!(cfg.learning_rate > 0.0);
/// ```
pub fn load_config(path: &str) -> Result<TrainingConfig, Box<dyn Error>> {
    let contents = fs::read_to_string(path)?;
    let config: TrainingConfig = serde_json::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &TrainingConfig) -> Result<(), Box<dyn Error>> {
    if !(config.learning_rate.is_finite() && config.learning_rate > 0.0) {
        return Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "learning_rate must be positive",
        )));
    }

    if config.epochs == 0 {
        return Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "epochs must be greater than 0",
        )));
    }

    if let Some(ref encoding) = config.target_encoding {
        if !VALID_TARGET_ENCODINGS.contains(&encoding.as_str()) {
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Invalid target encoding '{}'. Must be one of: {}",
                    encoding,
                    VALID_TARGET_ENCODINGS.join(", ")
                ),
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(learning_rate: f64, epochs: usize, encoding: Option<&str>) -> TrainingConfig {
        TrainingConfig {
            learning_rate,
            epochs,
            seed: None,
            shuffle: None,
            target_encoding: encoding.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(validate_config(&config(0.1, 10, Some("one_hot"))).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_learning_rate() {
        assert!(validate_config(&config(0.0, 10, None)).is_err());
        assert!(validate_config(&config(-1.0, 10, None)).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_epochs() {
        assert!(validate_config(&config(0.1, 0, None)).is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_encoding() {
        let err = validate_config(&config(0.1, 1, Some("softmax"))).unwrap_err();
        assert!(err.to_string().contains("Invalid target encoding"));
    }

    #[test]
    fn test_defaults() {
        let cfg = config(0.1, 1, None);
        assert_eq!(cfg.target_encoding(), TargetEncoding::Label);
        assert!(!cfg.shuffle());
    }
}
