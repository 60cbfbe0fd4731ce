//! Activation functions for neural networks
//!
//! Each layer carries one [`ActivationType`]; the enum dispatches to the
//! scalar forward/backward pairs defined here:
//! - Sigmoid
//! - ReLU
//! - Leaky ReLU (parameterised by alpha)
//! - Tanh
//! - ELU (parameterised by alpha)

use crate::error::{NetworkError, Result};
use std::fmt;

/// Default negative slope for Leaky ReLU.
pub const DEFAULT_LEAKY_RELU_ALPHA: f64 = 0.01;

/// Default saturation value for ELU.
pub const DEFAULT_ELU_ALPHA: f64 = 1.0;

/// Sigmoid activation function.
///
/// Returns the sigmoid of the input: 1 / (1 + exp(-x))
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid derivative assuming y = sigmoid(z).
///
/// Returns the derivative: y * (1 - y)
pub fn sigmoid_derivative(y: f64) -> f64 {
    y * (1.0 - y)
}

/// ReLU activation function: max(x, 0).
pub fn relu(x: f64) -> f64 {
    if x > 0.0 {
        x
    } else {
        0.0
    }
}

/// ReLU derivative at the pre-activation `x`.
///
/// The derivative does not exist at exactly zero, so that point is an error
/// instead of an arbitrary choice of 0 or 1.
pub fn relu_derivative(x: f64) -> Result<f64> {
    if x > 0.0 {
        Ok(1.0)
    } else if x < 0.0 {
        Ok(0.0)
    } else {
        Err(NetworkError::UndefinedDerivative {
            activation: "relu",
            at: x,
        })
    }
}

/// Leaky ReLU: x for positive inputs, alpha * x otherwise.
pub fn leaky_relu(x: f64, alpha: f64) -> f64 {
    if x > 0.0 {
        x
    } else {
        alpha * x
    }
}

/// Leaky ReLU derivative: 1 for positive inputs, alpha otherwise.
pub fn leaky_relu_derivative(x: f64, alpha: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else {
        alpha
    }
}

/// Tanh written in its logistic form: 2 / (1 + exp(-2x)) - 1.
pub fn tanh(x: f64) -> f64 {
    2.0 / (1.0 + (-2.0 * x).exp()) - 1.0
}

/// Tanh derivative at the pre-activation `x`: 1 - tanh(x)^2.
pub fn tanh_derivative(x: f64) -> f64 {
    let t = tanh(x);
    1.0 - t * t
}

/// ELU: x for positive inputs, alpha * (exp(x) - 1) otherwise.
pub fn elu(x: f64, alpha: f64) -> f64 {
    if x > 0.0 {
        x
    } else {
        alpha * (x.exp() - 1.0)
    }
}

/// ELU derivative: 1 for positive inputs, alpha * exp(x) otherwise.
pub fn elu_derivative(x: f64, alpha: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else {
        alpha * x.exp()
    }
}

/// Activation applied uniformly to every neuron of a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivationType {
    Sigmoid,
    Relu,
    LeakyRelu { alpha: f64 },
    Tanh,
    Elu { alpha: f64 },
}

impl ActivationType {
    /// Leaky ReLU with the default alpha of 0.01.
    pub fn leaky_relu() -> Self {
        ActivationType::LeakyRelu {
            alpha: DEFAULT_LEAKY_RELU_ALPHA,
        }
    }

    /// ELU with the default alpha of 1.0.
    pub fn elu() -> Self {
        ActivationType::Elu {
            alpha: DEFAULT_ELU_ALPHA,
        }
    }

    /// Lowercase name, matching the names accepted by the JSON configs.
    pub fn name(&self) -> &'static str {
        match self {
            ActivationType::Sigmoid => "sigmoid",
            ActivationType::Relu => "relu",
            ActivationType::LeakyRelu { .. } => "leaky_relu",
            ActivationType::Tanh => "tanh",
            ActivationType::Elu { .. } => "elu",
        }
    }

    /// Apply the activation to a pre-activation value.
    pub fn forward(&self, x: f64) -> f64 {
        match *self {
            ActivationType::Sigmoid => sigmoid(x),
            ActivationType::Relu => relu(x),
            ActivationType::LeakyRelu { alpha } => leaky_relu(x, alpha),
            ActivationType::Tanh => tanh(x),
            ActivationType::Elu { alpha } => elu(x, alpha),
        }
    }

    /// Derivative of the activation.
    ///
    /// Sigmoid expects the already-activated output `y`; every other variant
    /// expects the pre-activation `x`. Use [`ActivationType::derivative`]
    /// when both values are at hand.
    ///
    /// # Errors
    ///
    /// `UndefinedDerivative` for ReLU evaluated at exactly zero.
    pub fn backward(&self, v: f64) -> Result<f64> {
        match *self {
            ActivationType::Sigmoid => Ok(sigmoid_derivative(v)),
            ActivationType::Relu => relu_derivative(v),
            ActivationType::LeakyRelu { alpha } => Ok(leaky_relu_derivative(v, alpha)),
            ActivationType::Tanh => Ok(tanh_derivative(v)),
            ActivationType::Elu { alpha } => Ok(elu_derivative(v, alpha)),
        }
    }

    /// Derivative given both the pre-activation and the activated output,
    /// routing whichever one [`ActivationType::backward`] expects.
    pub fn derivative(&self, pre_activation: f64, output: f64) -> Result<f64> {
        match self {
            ActivationType::Sigmoid => self.backward(output),
            _ => self.backward(pre_activation),
        }
    }
}

impl fmt::Display for ActivationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationType::LeakyRelu { alpha } | ActivationType::Elu { alpha } => {
                write!(f, "{}(alpha={})", self.name(), alpha)
            }
            _ => f.write_str(self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_sigmoid_zero() {
        let result = sigmoid(0.0);
        assert!((result - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_sigmoid_positive() {
        let result = sigmoid(2.0);
        assert!(result > 0.5 && result < 1.0);
    }

    #[test]
    fn test_sigmoid_negative() {
        let result = sigmoid(-2.0);
        assert!(result > 0.0 && result < 0.5);
    }

    #[test]
    fn test_sigmoid_derivative_at_half() {
        let result = sigmoid_derivative(0.5);
        assert!((result - 0.25).abs() < EPSILON);
    }

    #[test]
    fn test_relu_derivative_undefined_at_zero() {
        let err = relu_derivative(0.0).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::UndefinedDerivative {
                activation: "relu",
                ..
            }
        ));
    }

    #[test]
    fn test_relu_derivative_near_zero() {
        assert_eq!(relu_derivative(0.0001).unwrap(), 1.0);
        assert_eq!(relu_derivative(-0.0001).unwrap(), 0.0);
    }

    #[test]
    fn test_leaky_relu_slope() {
        assert_eq!(leaky_relu(-2.0, 0.1), -0.2);
        assert_eq!(leaky_relu_derivative(-2.0, 0.1), 0.1);
        assert_eq!(leaky_relu_derivative(3.0, 0.1), 1.0);
    }

    #[test]
    fn test_tanh_matches_std() {
        for &x in &[-3.0, -0.5, 0.0, 0.5, 3.0] {
            assert!((tanh(x) - x.tanh()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_elu_continuous_at_zero() {
        assert!((elu(-1e-9, 1.0) - 0.0).abs() < 1e-8);
        assert!((elu_derivative(-1e-9, 1.0) - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_sigmoid_derivative_uses_output() {
        let z = 0.7;
        let y = sigmoid(z);
        let d = ActivationType::Sigmoid.derivative(z, y).unwrap();
        assert!((d - y * (1.0 - y)).abs() < EPSILON);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(ActivationType::Relu.to_string(), "relu");
        assert_eq!(
            ActivationType::leaky_relu().to_string(),
            "leaky_relu(alpha=0.01)"
        );
    }
}
