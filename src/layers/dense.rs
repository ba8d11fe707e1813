use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    activation::Sigmoid,
    error::{NetworkError, Result},
    math::{matrix::Matrix, vector},
};

/// One fully connected sigmoid layer.
///
/// `weights` has shape (outputs, inputs); `biases` has one entry per output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub weights: Matrix,
    pub biases: Vec<f64>,
}

impl Layer {
    /// Glorot-initialized weights, zero biases.
    pub fn new<R: Rng + ?Sized>(input_size: usize, size: usize, rng: &mut R) -> Layer {
        Layer {
            weights: Matrix::glorot(size, input_size, rng),
            biases: vec![0.0; size],
        }
    }

    /// Builds a layer from existing parameters after checking that the bias
    /// length matches the weight row count.
    pub fn from_parameters(weights: Matrix, biases: Vec<f64>) -> Result<Layer> {
        weights.expect_shape(biases.len(), weights.cols, "Layer::from_parameters")?;
        Ok(Layer { weights, biases })
    }

    pub fn input_size(&self) -> usize {
        self.weights.cols
    }

    pub fn size(&self) -> usize {
        self.weights.rows
    }

    /// a = σ(W·x + b). Does not touch `self`; the caller owns the activation.
    pub fn feed_from(&self, input: &[f64]) -> Result<Vec<f64>> {
        let z = vector::add(&self.weights.mul_vec(input)?, &self.biases)?;
        Ok(Sigmoid::apply(&z))
    }

    /// Maps this layer's delta back into the previous layer's activation
    /// space: Wᵀ·δ.
    pub fn propagate(&self, delta: &[f64]) -> Result<Vec<f64>> {
        self.weights.transpose_mul_vec(delta)
    }

    /// Weight and bias gradients for one example: (δ·inputᵀ, δ).
    pub fn compute_gradients(&self, delta: &[f64], input: &[f64]) -> Result<(Matrix, Vec<f64>)> {
        let weights_grad = Matrix::outer(delta, input);
        let (rows, cols) = self.weights.shape();
        weights_grad.expect_shape(rows, cols, "Layer::compute_gradients")?;
        Ok((weights_grad, delta.to_vec()))
    }

    /// Checks that gradients fit this layer without applying them.
    pub fn check_gradients(&self, weights_grad: &Matrix, biases_grad: &[f64]) -> Result<()> {
        weights_grad.expect_shape(self.weights.rows, self.weights.cols, "Layer::apply_gradients")?;
        if biases_grad.len() != self.biases.len() {
            return Err(NetworkError::shape(
                "Layer::apply_gradients",
                self.biases.len(),
                biases_grad.len(),
            ));
        }
        Ok(())
    }

    /// Applies pre-computed gradients scaled by lr.
    pub fn apply_gradients(
        &mut self,
        weights_grad: &Matrix,
        biases_grad: &[f64],
        lr: f64,
    ) -> Result<()> {
        self.check_gradients(weights_grad, biases_grad)?;
        self.weights.sub_scaled_assign(weights_grad, lr)?;
        vector::sub_scaled_assign(&mut self.biases, biases_grad, lr)
    }
}
