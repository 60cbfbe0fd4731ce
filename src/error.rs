//! Error types for network construction, propagation and training.
//!
//! All failures are programmer or configuration errors: they surface
//! immediately and are never retried.

/// Errors raised by the network core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    #[error("dimension mismatch: expected {expected} values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("derivative of {activation} is undefined at {at}")]
    UndefinedDerivative { activation: &'static str, at: f64 },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("invalid hyperparameter: {0}")]
    InvalidHyperparameter(String),

    #[error("label {label} out of range for {num_classes} classes")]
    LabelOutOfRange { label: usize, num_classes: usize },

    #[error("pass was recorded by a different network")]
    ForeignPass,

    #[error("stale pass: recorded at generation {recorded}, network is at {current}")]
    StalePass { recorded: u64, current: u64 },
}

pub type Result<T> = std::result::Result<T, NetworkError>;
