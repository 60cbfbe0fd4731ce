//! A single unit: incoming weights, a bias, and the output/delta committed by
//! the most recent training step.

use crate::utils::SimpleRng;

/// Lower bound of the uniform weight initialization range.
pub const INIT_WEIGHT_MIN: f64 = -1.0;
/// Upper bound of the uniform weight initialization range.
pub const INIT_WEIGHT_MAX: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    weights: Vec<f64>,
    bias: f64,
    output: f64,
    delta: f64,
}

impl Neuron {
    /// Create a neuron with one weight per unit of the previous layer.
    pub fn new(prev_layer_size: usize, rng: &mut SimpleRng) -> Self {
        let mut neuron = Self {
            weights: Vec::with_capacity(prev_layer_size),
            bias: 0.0,
            output: 0.0,
            delta: 0.0,
        };
        neuron.init_weights(prev_layer_size, rng);
        neuron
    }

    /// Build a neuron from explicit parameters.
    pub fn with_weights(weights: Vec<f64>, bias: f64) -> Self {
        Self {
            weights,
            bias,
            output: 0.0,
            delta: 0.0,
        }
    }

    /// Draw `prev_layer_size` weights and the bias uniformly from [-1, 1].
    pub fn init_weights(&mut self, prev_layer_size: usize, rng: &mut SimpleRng) {
        self.weights.clear();
        for _ in 0..prev_layer_size {
            self.weights
                .push(rng.gen_range_f64(INIT_WEIGHT_MIN, INIT_WEIGHT_MAX));
        }
        self.bias = rng.gen_range_f64(INIT_WEIGHT_MIN, INIT_WEIGHT_MAX);
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Mutable view of the weights; the length is fixed.
    pub fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }

    pub fn output(&self) -> f64 {
        self.output
    }

    pub fn set_output(&mut self, output: f64) {
        self.output = output;
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn set_delta(&mut self, delta: f64) {
        self.delta = delta;
    }

    /// Number of incoming connections.
    pub fn input_width(&self) -> usize {
        self.weights.len()
    }

    /// Weighted sum of `inputs` plus the bias. Callers check the lengths.
    pub(crate) fn pre_activation(&self, inputs: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(inputs)
            .fold(self.bias, |acc, (w, x)| acc + w * x)
    }
}
