//! Network building blocks: neurons and the fully connected layers that own
//! them.

pub mod dense;
pub mod neuron;

pub use dense::Layer;
pub use neuron::Neuron;
