//! Fully connected layer: a fixed set of neurons sharing one activation.
//!
//! Every neuron in a layer sees the same inputs (the previous layer's outputs,
//! or the raw features for the first layer), so all of them carry the same
//! number of weights.

use crate::error::{NetworkError, Result};
use crate::layers::Neuron;
use crate::utils::{ActivationType, SimpleRng};

/// Ordered, fixed-size collection of neurons with a shared activation.
///
/// # Example
///
/// ```
/// use rust_perceptron::layers::Layer;
/// use rust_perceptron::utils::{ActivationType, SimpleRng};
///
/// let mut rng = SimpleRng::new(42);
/// let layer = Layer::new(784, 30, ActivationType::Sigmoid, &mut rng);
/// assert_eq!(layer.input_width(), 784);
/// assert_eq!(layer.len(), 30);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    neurons: Vec<Neuron>,
    input_width: usize,
    activation: ActivationType,
}

impl Layer {
    /// Create `cur_layer_size` neurons, each with `prev_layer_size` random
    /// weights drawn from `rng`.
    pub fn new(
        prev_layer_size: usize,
        cur_layer_size: usize,
        activation: ActivationType,
        rng: &mut SimpleRng,
    ) -> Self {
        let neurons = (0..cur_layer_size)
            .map(|_| Neuron::new(prev_layer_size, rng))
            .collect();

        Self {
            neurons,
            input_width: prev_layer_size,
            activation,
        }
    }

    /// Assemble a layer from existing neurons.
    ///
    /// # Errors
    ///
    /// `InvalidTopology` if `neurons` is empty or the neurons disagree on
    /// their number of weights.
    pub fn from_neurons(neurons: Vec<Neuron>, activation: ActivationType) -> Result<Self> {
        let input_width = neurons
            .first()
            .map(Neuron::input_width)
            .ok_or_else(|| NetworkError::InvalidTopology("layer has no neurons".to_string()))?;

        if let Some((index, neuron)) = neurons
            .iter()
            .enumerate()
            .find(|(_, n)| n.input_width() != input_width)
        {
            return Err(NetworkError::InvalidTopology(format!(
                "neuron {} has {} weights, expected {}",
                index,
                neuron.input_width(),
                input_width
            )));
        }

        Ok(Self {
            neurons,
            input_width,
            activation,
        })
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    /// Mutable access to the neurons. The slice cannot be resized.
    pub fn neurons_mut(&mut self) -> &mut [Neuron] {
        &mut self.neurons
    }

    pub fn activation(&self) -> ActivationType {
        self.activation
    }

    /// Number of neurons in the layer.
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// Number of inputs each neuron expects.
    pub fn input_width(&self) -> usize {
        self.input_width
    }

    /// Get the number of trainable parameters.
    ///
    /// Returns input_width × len (weights) + len (biases).
    pub fn parameter_count(&self) -> usize {
        (self.input_width + 1) * self.neurons.len()
    }
}
