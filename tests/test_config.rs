//! Tests for training configuration parsing
//!
//! This file tests the config module including:
//! - Loading the shipped JSON config
//! - Optional fields and their defaults
//! - Handling invalid JSON, missing files and out-of-range values

use rust_perceptron::config::load_config;
use rust_perceptron::TargetEncoding;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp config");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp config");
    file
}

// ============================================================================
// Valid Config Loading Tests
// ============================================================================

mod valid_config_tests {
    use super::*;

    #[test]
    fn test_load_toy_training_config() {
        let config =
            load_config("config/toy_training.json").expect("Failed to load toy training config");

        assert!((config.learning_rate - 0.5).abs() < 1e-12);
        assert_eq!(config.epochs, 2000);
        assert_eq!(config.seed, Some(42));
        assert!(config.shuffle());
        assert_eq!(config.target_encoding(), TargetEncoding::OneHot);
    }

    #[test]
    fn test_optional_fields_default() {
        let temp = write_temp_config(r#"{ "learning_rate": 0.01, "epochs": 5 }"#);
        let config = load_config(temp.path().to_str().unwrap()).unwrap();

        assert_eq!(config.seed, None);
        assert!(!config.shuffle());
        assert_eq!(config.target_encoding(), TargetEncoding::Label);
    }
}

// ============================================================================
// Invalid Config Tests
// ============================================================================

mod invalid_config_tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        assert!(load_config("config/nonexistent.json").is_err());
    }

    #[test]
    fn test_invalid_json() {
        let temp = write_temp_config("{ learning_rate: 0.1 }");
        assert!(load_config(temp.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_missing_required_field() {
        let temp = write_temp_config(r#"{ "learning_rate": 0.1 }"#);
        assert!(load_config(temp.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_negative_learning_rate() {
        let temp = write_temp_config(r#"{ "learning_rate": -0.1, "epochs": 5 }"#);
        let err = load_config(temp.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("learning_rate"));
    }

    #[test]
    fn test_zero_epochs() {
        let temp = write_temp_config(r#"{ "learning_rate": 0.1, "epochs": 0 }"#);
        assert!(load_config(temp.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_unknown_target_encoding() {
        let temp = write_temp_config(
            r#"{ "learning_rate": 0.1, "epochs": 5, "target_encoding": "ordinal" }"#,
        );
        let err = load_config(temp.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("ordinal"));
    }
}
