use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

/// Fully connected layer: `a = f(x W + b)` with `W: input_size x size`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub size: usize,
    pub input_size: usize,
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction,
    /// Activations from the last forward pass, kept for backprop.
    #[serde(skip)]
    pub neurons: Matrix,
    /// Pre-activation values (z = xW + b) from the last forward pass.
    #[serde(skip)]
    pre_neurons: Matrix,
}

impl Layer {
    /// Glorot-uniform weights and zero biases.
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Layer {
        Layer {
            size,
            input_size,
            weights: Matrix::glorot_uniform(input_size, size, rng),
            biases: Matrix::zeros(1, size),
            activator: activation,
            neurons: Matrix::zeros(1, size),
            pre_neurons: Matrix::zeros(1, size),
        }
    }

    pub fn feed_from(&mut self, input: &[f64]) -> Vec<f64> {
        let z = &Matrix::row(input.to_vec()) * &self.weights + self.biases.clone();
        let a = self.activator.apply(&z.data[0]);
        self.pre_neurons = z;
        self.neurons = Matrix::row(a.clone());
        a
    }

    /// Computes gradients for one sample. Returns (weights_grad, biases_grad).
    /// `delta` is ∂L/∂a for this layer; `inputs` is the `1 x input_size` row
    /// that was fed in.
    pub fn compute_gradients(&self, delta: &Matrix, inputs: &Matrix) -> (Matrix, Matrix) {
        let act_derivative = self.pre_neurons.map(|x| self.activator.derivative(x));
        let layer_delta = delta.hadamard(&act_derivative);

        let weights_grad = &inputs.transpose() * &layer_delta;
        (weights_grad, layer_delta)
    }

    pub fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }
}
