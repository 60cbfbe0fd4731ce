//! Feedforward network: topology, forward propagation, backpropagation and
//! per-sample weight updates.
//!
//! One training step moves through three stages, each consuming the
//! previous stage's record:
//!
//! ```text
//! forward_propagation(&features) -> ForwardPass
//! backpropagation(ForwardPass)   -> BackwardPass
//! update_weights(BackwardPass)   -> ()
//! ```
//!
//! The records carry every per-sample value (pre-activations, outputs,
//! deltas). Each `ForwardPass` is stamped with the identity of the network
//! that produced it and that network's update generation. Handing a record
//! to another network, or to the same network after its weights moved, fails
//! with `ForeignPass` or `StalePass`. Only `update_weights` mutates the
//! network, and every successful update bumps the generation.

use crate::error::{NetworkError, Result};
use crate::features::FeatureVector;
use crate::layers::Layer;
use crate::utils::{ActivationType, SimpleRng};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, trace};

static NEXT_NETWORK_ID: AtomicU64 = AtomicU64::new(1);

fn next_network_id() -> u64 {
    NEXT_NETWORK_ID.fetch_add(1, Ordering::Relaxed)
}

/// How a class label becomes the target value of each output neuron.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetEncoding {
    /// Every output neuron is pulled towards the label value itself.
    #[default]
    Label,
    /// The neuron at the label index is pulled to 1.0, all others to 0.0.
    OneHot,
}

impl TargetEncoding {
    fn target(self, label: usize, neuron: usize) -> f64 {
        match self {
            TargetEncoding::Label => label as f64,
            TargetEncoding::OneHot => {
                if neuron == label {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct LayerRecord {
    pre_activations: Vec<f64>,
    outputs: Vec<f64>,
}

/// Result of a forward pass over one sample.
///
/// Holds the sample's inputs and label plus every layer's pre-activations
/// and outputs, which is exactly what backpropagation needs.
#[derive(Debug, Clone)]
pub struct ForwardPass {
    network_id: u64,
    generation: u64,
    inputs: Vec<f64>,
    label: usize,
    layers: Vec<LayerRecord>,
}

impl ForwardPass {
    /// Per-class scores: the output layer's activations.
    pub fn scores(&self) -> &[f64] {
        self.layers
            .last()
            .map(|record| record.outputs.as_slice())
            .unwrap_or(&[])
    }

    /// Consume the pass and keep only the per-class scores.
    pub fn into_scores(mut self) -> Vec<f64> {
        self.layers
            .pop()
            .map(|record| record.outputs)
            .unwrap_or_default()
    }

    /// Activated outputs of layer `index`.
    pub fn layer_outputs(&self, index: usize) -> Option<&[f64]> {
        self.layers.get(index).map(|r| r.outputs.as_slice())
    }

    /// Class label of the sample that was propagated.
    pub fn label(&self) -> usize {
        self.label
    }
}

/// Deltas for every neuron of a sample, ready to be applied.
#[derive(Debug, Clone)]
pub struct BackwardPass {
    forward: ForwardPass,
    deltas: Vec<Vec<f64>>,
    output_errors: Vec<f64>,
}

impl BackwardPass {
    /// Deltas of layer `index`.
    pub fn deltas(&self, index: usize) -> Option<&[f64]> {
        self.deltas.get(index).map(Vec::as_slice)
    }

    /// Target minus output for each output neuron.
    pub fn output_errors(&self) -> &[f64] {
        &self.output_errors
    }

    /// Sum of squared output errors.
    pub fn squared_error(&self) -> f64 {
        self.output_errors.iter().map(|e| e * e).sum()
    }

    /// Per-class scores of the forward pass these deltas came from.
    pub fn scores(&self) -> &[f64] {
        self.forward.scores()
    }
}

/// Multilayer perceptron trained one sample at a time.
///
/// A clone gets its own identity, so passes recorded on the original are
/// rejected by the copy.
#[derive(Debug)]
pub struct Network {
    id: u64,
    generation: u64,
    layers: Vec<Layer>,
    num_classes: usize,
    learning_rate: f64,
    target_encoding: TargetEncoding,
    test_performance: f64,
}

impl Clone for Network {
    fn clone(&self) -> Self {
        Self {
            id: next_network_id(),
            generation: self.generation,
            layers: self.layers.clone(),
            num_classes: self.num_classes,
            learning_rate: self.learning_rate,
            target_encoding: self.target_encoding,
            test_performance: self.test_performance,
        }
    }
}

impl Network {
    /// Build a network from hidden layer sizes.
    ///
    /// `activations` has one entry per layer: one for each hidden layer
    /// followed by one for the output layer of width `num_classes`.
    ///
    /// # Errors
    ///
    /// * `InvalidTopology` if any size is zero or the activation count does
    ///   not match the layer count.
    /// * `InvalidHyperparameter` if the learning rate is not positive and finite.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_perceptron::network::Network;
    /// use rust_perceptron::utils::{ActivationType, SimpleRng};
    ///
    /// let mut rng = SimpleRng::new(42);
    /// let network = Network::new(
    ///     &[3],
    ///     &[ActivationType::Sigmoid, ActivationType::Sigmoid],
    ///     4,
    ///     2,
    ///     0.1,
    ///     &mut rng,
    /// )
    /// .unwrap();
    /// assert_eq!(network.layer_widths(), vec![3, 2]);
    /// ```
    pub fn new(
        hidden_sizes: &[usize],
        activations: &[ActivationType],
        input_size: usize,
        num_classes: usize,
        learning_rate: f64,
        rng: &mut SimpleRng,
    ) -> Result<Self> {
        if input_size == 0 {
            return Err(NetworkError::InvalidTopology(
                "input size must be greater than 0".to_string(),
            ));
        }
        if num_classes == 0 {
            return Err(NetworkError::InvalidTopology(
                "number of classes must be greater than 0".to_string(),
            ));
        }
        if let Some(index) = hidden_sizes.iter().position(|&size| size == 0) {
            return Err(NetworkError::InvalidTopology(format!(
                "hidden layer {} has size 0",
                index
            )));
        }
        if activations.len() != hidden_sizes.len() + 1 {
            return Err(NetworkError::InvalidTopology(format!(
                "expected {} activations (one per hidden layer plus output), got {}",
                hidden_sizes.len() + 1,
                activations.len()
            )));
        }
        validate_learning_rate(learning_rate)?;

        let mut layers = Vec::with_capacity(hidden_sizes.len() + 1);
        let mut prev_size = input_size;
        for (&size, &activation) in hidden_sizes.iter().zip(activations) {
            layers.push(Layer::new(prev_size, size, activation, rng));
            prev_size = size;
        }
        let output_activation = activations[activations.len() - 1];
        layers.push(Layer::new(prev_size, num_classes, output_activation, rng));

        let network = Self {
            id: next_network_id(),
            generation: 0,
            layers,
            num_classes,
            learning_rate,
            target_encoding: TargetEncoding::default(),
            test_performance: 0.0,
        };
        debug!(
            input_size,
            widths = ?network.layer_widths(),
            learning_rate,
            "built network"
        );
        Ok(network)
    }

    /// Build a network from pre-built layers; the last layer is the output
    /// layer and fixes the number of classes.
    ///
    /// # Errors
    ///
    /// `InvalidTopology` if `layers` is empty, a layer is empty, or a
    /// layer's input width differs from the previous layer's size.
    pub fn from_layers(layers: Vec<Layer>, learning_rate: f64) -> Result<Self> {
        let last = layers
            .last()
            .ok_or_else(|| NetworkError::InvalidTopology("network has no layers".to_string()))?;
        let num_classes = last.len();

        for (index, layer) in layers.iter().enumerate() {
            if layer.is_empty() {
                return Err(NetworkError::InvalidTopology(format!(
                    "layer {} has no neurons",
                    index
                )));
            }
            if index == 0 && layer.input_width() == 0 {
                return Err(NetworkError::InvalidTopology(
                    "input size must be greater than 0".to_string(),
                ));
            }
            if index > 0 && layer.input_width() != layers[index - 1].len() {
                return Err(NetworkError::InvalidTopology(format!(
                    "layer {} expects {} inputs but layer {} has {} neurons",
                    index,
                    layer.input_width(),
                    index - 1,
                    layers[index - 1].len()
                )));
            }
        }
        validate_learning_rate(learning_rate)?;

        let network = Self {
            id: next_network_id(),
            generation: 0,
            layers,
            num_classes,
            learning_rate,
            target_encoding: TargetEncoding::default(),
            test_performance: 0.0,
        };
        debug!(widths = ?network.layer_widths(), learning_rate, "assembled network");
        Ok(network)
    }

    /// Choose how labels are turned into output targets.
    pub fn with_target_encoding(mut self, target_encoding: TargetEncoding) -> Self {
        self.target_encoding = target_encoding;
        self
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Accuracy recorded by the last call to `test` or `validate`.
    pub fn test_performance(&self) -> f64 {
        self.test_performance
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn target_encoding(&self) -> TargetEncoding {
        self.target_encoding
    }

    /// Number of features the first layer expects.
    pub fn input_size(&self) -> usize {
        self.layers[0].input_width()
    }

    /// Number of weight updates applied so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Neuron count of each layer, input side first.
    pub fn layer_widths(&self) -> Vec<usize> {
        self.layers.iter().map(Layer::len).collect()
    }

    /// Total number of weights and biases.
    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(Layer::parameter_count).sum()
    }

    /// Run the sample through every layer.
    ///
    /// Each neuron computes `weights · inputs + bias`, applies its layer's
    /// activation, and the layer's outputs become the next layer's inputs.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the feature count differs from `input_size()`.
    pub fn forward_propagation(&self, features: &FeatureVector) -> Result<ForwardPass> {
        let expected = self.input_size();
        if features.len() != expected {
            return Err(NetworkError::DimensionMismatch {
                expected,
                actual: features.len(),
            });
        }

        let mut records: Vec<LayerRecord> = Vec::with_capacity(self.layers.len());
        for (index, layer) in self.layers.iter().enumerate() {
            let inputs = match index {
                0 => features.values(),
                _ => records[index - 1].outputs.as_slice(),
            };
            let record = propagate_layer(layer, inputs);
            records.push(record);
        }

        Ok(ForwardPass {
            network_id: self.id,
            generation: self.generation,
            inputs: features.values().to_vec(),
            label: features.label(),
            layers: records,
        })
    }

    /// Compute every neuron's delta for the sample recorded in `pass`.
    ///
    /// Output neurons use `target - output` as their error; hidden neuron
    /// `j` of layer `i` sums `weights[j] * delta` over the neurons of layer
    /// `i + 1`. Each error is then scaled by the derivative of its own
    /// layer's activation. The network is left untouched.
    ///
    /// # Errors
    ///
    /// * `UndefinedDerivative` if a ReLU neuron sits exactly at zero.
    /// * `LabelOutOfRange` for one-hot targets with a label past the last class.
    /// * `DimensionMismatch` if `pass` came from a network of another shape.
    /// * `ForeignPass` if `pass` came from another network of the same shape.
    /// * `StalePass` if the weights were updated after `pass` was recorded.
    pub fn backpropagation(&self, pass: ForwardPass) -> Result<BackwardPass> {
        self.check_pass(&pass)?;
        let label = pass.label;
        if self.target_encoding == TargetEncoding::OneHot && label >= self.num_classes {
            return Err(NetworkError::LabelOutOfRange {
                label,
                num_classes: self.num_classes,
            });
        }

        let output_index = self.layers.len() - 1;
        let mut deltas: Vec<Vec<f64>> = vec![Vec::new(); self.layers.len()];
        let mut output_errors = Vec::new();

        for index in (0..self.layers.len()).rev() {
            let layer = &self.layers[index];
            let record = &pass.layers[index];

            let errors: Vec<f64> = if index == output_index {
                record
                    .outputs
                    .iter()
                    .enumerate()
                    .map(|(k, &output)| self.target_encoding.target(label, k) - output)
                    .collect()
            } else {
                let next = &self.layers[index + 1];
                let next_deltas = &deltas[index + 1];
                (0..layer.len())
                    .map(|j| {
                        next.neurons()
                            .iter()
                            .zip(next_deltas)
                            .map(|(neuron, delta)| neuron.weights()[j] * delta)
                            .sum::<f64>()
                    })
                    .collect()
            };

            let activation = layer.activation();
            deltas[index] = errors
                .iter()
                .zip(record.pre_activations.iter().zip(&record.outputs))
                .map(|(error, (&z, &y))| activation.derivative(z, y).map(|d| error * d))
                .collect::<Result<Vec<f64>>>()?;

            if index == output_index {
                output_errors = errors;
            }
        }

        trace!(label, errors = ?output_errors, "backpropagated sample");
        Ok(BackwardPass {
            forward: pass,
            deltas,
            output_errors,
        })
    }

    /// Apply the deltas in `pass`: `w[i] += learning_rate * delta * input[i]`
    /// and `bias += learning_rate * delta`.
    ///
    /// The first layer's inputs are the raw features, later layers use the
    /// outputs recorded during the forward pass. The pass is checked against
    /// the network (shape, identity, generation) before the first write, so a
    /// rejected pass changes nothing. The outputs and deltas applied are
    /// committed to the neurons and the generation moves on.
    pub fn update_weights(&mut self, pass: BackwardPass) -> Result<()> {
        self.check_pass(&pass.forward)?;
        for (layer, deltas) in self.layers.iter().zip(&pass.deltas) {
            if deltas.len() != layer.len() {
                return Err(NetworkError::DimensionMismatch {
                    expected: layer.len(),
                    actual: deltas.len(),
                });
            }
        }

        let learning_rate = self.learning_rate;
        let BackwardPass {
            forward, deltas, ..
        } = pass;

        for (index, layer) in self.layers.iter_mut().enumerate() {
            let inputs = match index {
                0 => forward.inputs.as_slice(),
                _ => forward.layers[index - 1].outputs.as_slice(),
            };
            let outputs = &forward.layers[index].outputs;

            for ((neuron, &delta), &output) in layer
                .neurons_mut()
                .iter_mut()
                .zip(&deltas[index])
                .zip(outputs)
            {
                let step = learning_rate * delta;
                for (weight, &input) in neuron.weights_mut().iter_mut().zip(inputs) {
                    *weight += step * input;
                }
                neuron.set_bias(neuron.bias() + step);
                neuron.set_output(output);
                neuron.set_delta(delta);
            }
        }
        self.generation += 1;
        Ok(())
    }

    /// One full training step on a sample; returns its squared output error
    /// measured before the update.
    pub fn train_sample(&mut self, features: &FeatureVector) -> Result<f64> {
        let forward = self.forward_propagation(features)?;
        let backward = self.backpropagation(forward)?;
        let error = backward.squared_error();
        self.update_weights(backward)?;
        Ok(error)
    }

    /// Train on every sample once, in order. Returns the mean squared
    /// output error of the epoch.
    pub fn train_epoch(&mut self, samples: &[FeatureVector]) -> Result<f64> {
        let order: Vec<usize> = (0..samples.len()).collect();
        self.run_epoch(samples, &order)
    }

    /// Train for `epochs` passes over `samples`, reshuffling the visit order
    /// each epoch when `shuffle` supplies a generator. Returns the mean
    /// squared output error of each epoch.
    ///
    /// Samples are processed strictly one after another. An error stops
    /// training; updates from samples already processed are kept.
    pub fn train(
        &mut self,
        samples: &[FeatureVector],
        epochs: usize,
        mut shuffle: Option<&mut SimpleRng>,
    ) -> Result<Vec<f64>> {
        let mut order: Vec<usize> = (0..samples.len()).collect();
        let mut history = Vec::with_capacity(epochs);

        for epoch in 0..epochs {
            if let Some(rng) = shuffle.as_deref_mut() {
                rng.shuffle_usize(&mut order);
            }
            let mean_error = self.run_epoch(samples, &order)?;
            info!(epoch, mean_error, "epoch complete");
            history.push(mean_error);
        }
        Ok(history)
    }

    fn run_epoch(&mut self, samples: &[FeatureVector], order: &[usize]) -> Result<f64> {
        if order.is_empty() {
            return Ok(0.0);
        }
        let mut total = 0.0;
        for &index in order {
            total += self.train_sample(&samples[index])?;
        }
        Ok(total / order.len() as f64)
    }

    /// Index of the highest score; ties go to the lowest index.
    pub fn predict(&self, features: &FeatureVector) -> Result<usize> {
        let pass = self.forward_propagation(features)?;
        Ok(arg_max(pass.scores()))
    }

    /// Fraction of `batch` predicted correctly; recorded as the test
    /// performance.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` on the first malformed sample; no sample is skipped.
    pub fn test(&mut self, batch: &[FeatureVector]) -> Result<f64> {
        let accuracy = self.accuracy(batch)?;
        self.test_performance = accuracy;
        info!(samples = batch.len(), accuracy, "test performance");
        Ok(accuracy)
    }

    /// Same sweep as [`Network::test`] over a validation batch.
    pub fn validate(&mut self, batch: &[FeatureVector]) -> Result<f64> {
        let accuracy = self.accuracy(batch)?;
        self.test_performance = accuracy;
        info!(samples = batch.len(), accuracy, "validation performance");
        Ok(accuracy)
    }

    fn accuracy(&self, batch: &[FeatureVector]) -> Result<f64> {
        if batch.is_empty() {
            return Ok(0.0);
        }
        let mut correct = 0usize;
        for sample in batch {
            if self.predict(sample)? == sample.label() {
                correct += 1;
            }
        }
        Ok(correct as f64 / batch.len() as f64)
    }

    fn check_pass(&self, pass: &ForwardPass) -> Result<()> {
        if pass.inputs.len() != self.input_size() {
            return Err(NetworkError::DimensionMismatch {
                expected: self.input_size(),
                actual: pass.inputs.len(),
            });
        }
        if pass.layers.len() != self.layers.len() {
            return Err(NetworkError::DimensionMismatch {
                expected: self.layers.len(),
                actual: pass.layers.len(),
            });
        }
        for (layer, record) in self.layers.iter().zip(&pass.layers) {
            if record.outputs.len() != layer.len() {
                return Err(NetworkError::DimensionMismatch {
                    expected: layer.len(),
                    actual: record.outputs.len(),
                });
            }
        }
        if pass.network_id != self.id {
            return Err(NetworkError::ForeignPass);
        }
        if pass.generation != self.generation {
            return Err(NetworkError::StalePass {
                recorded: pass.generation,
                current: self.generation,
            });
        }
        Ok(())
    }
}

fn validate_learning_rate(learning_rate: f64) -> Result<()> {
    if learning_rate.is_finite() && learning_rate > 0.0 {
        Ok(())
    } else {
        Err(NetworkError::InvalidHyperparameter(format!(
            "learning rate must be positive and finite, got {}",
            learning_rate
        )))
    }
}

fn propagate_layer(layer: &Layer, inputs: &[f64]) -> LayerRecord {
    let activation = layer.activation();
    let pre_activations: Vec<f64> = layer
        .neurons()
        .iter()
        .map(|neuron| neuron.pre_activation(inputs))
        .collect();
    let outputs = pre_activations
        .iter()
        .map(|&z| activation.forward(z))
        .collect();

    LayerRecord {
        pre_activations,
        outputs,
    }
}

fn arg_max(scores: &[f64]) -> usize {
    let mut best = 0;
    for (index, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = index;
        }
    }
    best
}
