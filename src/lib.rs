//! Rust Perceptron Library
//!
//! A hand-rolled feedforward multilayer perceptron: configurable hidden
//! layers, one activation per layer, forward propagation, backpropagation
//! and per-sample gradient descent.
//!
//! # Modules
//!
//! - `layers`: Neuron and fully connected Layer
//! - `network`: Network construction, propagation, training and evaluation
//! - `features`: Labelled input samples
//! - `utils`: Activation functions and the seeded RNG
//! - `config`: Training configuration
//! - `architecture`: Architecture configuration and network building
//! - `error`: Error type shared by the core

pub mod architecture;
pub mod config;
pub mod error;
pub mod features;
pub mod layers;
pub mod network;
pub mod utils;

pub use error::{NetworkError, Result};
pub use features::FeatureVector;
pub use network::{BackwardPass, ForwardPass, Network, TargetEncoding};
