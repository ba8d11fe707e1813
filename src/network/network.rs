use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

use crate::{
    activation::Sigmoid,
    data::Example,
    error::{NetworkError, Result},
    layers::dense::Layer,
    loss::QuadraticLoss,
    math::{matrix::Matrix, vector},
    network::{gradients::Gradients, spec::NetworkSpec},
};

/// A feedforward sigmoid network.
///
/// Layer `i` maps activations of width `layer_sizes[i]` to width
/// `layer_sizes[i + 1]`. Parameters are only mutated through
/// `apply_gradients`, which requires exclusive access.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    /// Builds a network from a layer-size specification using an
    /// entropy-seeded RNG.
    pub fn new(layer_sizes: &[usize]) -> Result<Network> {
        Network::with_rng(layer_sizes, &mut StdRng::from_entropy())
    }

    /// Same as `new`, but reproducible.
    pub fn seeded(layer_sizes: &[usize], seed: u64) -> Result<Network> {
        Network::with_rng(layer_sizes, &mut StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> Result<Network> {
        NetworkSpec::validate_sizes(layer_sizes)?;
        let layers = layer_sizes
            .windows(2)
            .map(|w| Layer::new(w[0], w[1], &mut *rng))
            .collect();
        Ok(Network { layers })
    }

    /// Reassembles a network from existing layers, checking that there is at
    /// least one layer, that every width is positive and that consecutive
    /// layers chain.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Network> {
        if layers.is_empty() {
            return Err(NetworkError::InvalidConfiguration(
                "a network needs at least one weight layer".to_owned(),
            ));
        }
        for (i, layer) in layers.iter().enumerate() {
            if layer.size() == 0 || layer.input_size() == 0 {
                return Err(NetworkError::InvalidConfiguration(format!(
                    "layer {i} has a zero width ({}x{})",
                    layer.size(),
                    layer.input_size()
                )));
            }
            let stored = layer.weights.as_slice().len();
            if layer.weights.declared_len() != Some(stored) {
                return Err(NetworkError::shape(
                    "Network::from_layers (weights)",
                    format!("{}x{} elements", layer.size(), layer.input_size()),
                    stored,
                ));
            }
            if layer.biases.len() != layer.size() {
                return Err(NetworkError::shape(
                    "Network::from_layers (biases)",
                    layer.size(),
                    layer.biases.len(),
                ));
            }
        }
        for pair in layers.windows(2) {
            if pair[1].input_size() != pair[0].size() {
                return Err(NetworkError::shape(
                    "Network::from_layers (layer chaining)",
                    pair[0].size(),
                    pair[1].input_size(),
                ));
            }
        }
        Ok(Network { layers })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Widths of every layer, input layer included.
    pub fn layer_sizes(&self) -> Vec<usize> {
        std::iter::once(self.input_size())
            .chain(self.layers.iter().map(Layer::size))
            .collect()
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].size()
    }

    pub fn weights(&self) -> impl Iterator<Item = &Matrix> {
        self.layers.iter().map(|l| &l.weights)
    }

    pub fn biases(&self) -> impl Iterator<Item = &[f64]> {
        self.layers.iter().map(|l| l.biases.as_slice())
    }

    /// Checks that an example's input and target widths match the network.
    pub fn check_example(&self, example: &Example) -> Result<()> {
        if example.input.len() != self.input_size() {
            return Err(NetworkError::shape(
                "example input",
                self.input_size(),
                example.input.len(),
            ));
        }
        if example.target.len() != self.output_size() {
            return Err(NetworkError::shape(
                "example target",
                self.output_size(),
                example.target.len(),
            ));
        }
        Ok(())
    }

    /// Forward pass. Returns the activation of every non-input layer, in
    /// order; the last entry is the network output.
    pub fn feed_forward(&self, input: &[f64]) -> Result<Vec<Vec<f64>>> {
        if input.len() != self.input_size() {
            return Err(NetworkError::shape(
                "Network::feed_forward",
                self.input_size(),
                input.len(),
            ));
        }
        let mut activations: Vec<Vec<f64>> = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let a = match activations.last() {
                Some(prev) => layer.feed_from(prev)?,
                None => layer.feed_from(input)?,
            };
            activations.push(a);
        }
        Ok(activations)
    }

    /// Output activation only.
    pub fn evaluate(&self, input: &[f64]) -> Result<Vec<f64>> {
        let mut activations = self.feed_forward(input)?;
        Ok(activations.pop().unwrap_or_default())
    }

    /// Backpropagates the quadratic-loss error of one example through the
    /// activation trace produced by `feed_forward`.
    ///
    /// Returns one delta per layer, shaped like the corresponding activation.
    pub fn backward_pass(
        &self,
        activations: &[Vec<f64>],
        target: &[f64],
    ) -> Result<Vec<Vec<f64>>> {
        let n = self.layers.len();
        if activations.len() != n {
            return Err(NetworkError::shape(
                "Network::backward_pass (trace length)",
                n,
                activations.len(),
            ));
        }
        for (layer, a) in self.layers.iter().zip(activations) {
            if a.len() != layer.size() {
                return Err(NetworkError::shape(
                    "Network::backward_pass (activation)",
                    layer.size(),
                    a.len(),
                ));
            }
        }

        let output = &activations[n - 1];
        let error = QuadraticLoss::derivative(output, target)?;

        let mut deltas = vec![Vec::new(); n];
        deltas[n - 1] = vector::hadamard(&error, &Sigmoid::derivatives(output))?;
        for i in (0..n - 1).rev() {
            let back = self.layers[i + 1].propagate(&deltas[i + 1])?;
            deltas[i] = vector::hadamard(&back, &Sigmoid::derivatives(&activations[i]))?;
        }
        Ok(deltas)
    }

    /// Loss and parameter gradients for a single example, from one forward
    /// and one backward pass.
    pub fn gradients(&self, example: &Example) -> Result<Gradients> {
        self.check_example(example)?;
        let activations = self.feed_forward(&example.input)?;
        let loss = QuadraticLoss::loss(&activations[activations.len() - 1], &example.target)?;
        let deltas = self.backward_pass(&activations, &example.target)?;

        let mut weights = Vec::with_capacity(self.layers.len());
        let mut biases = Vec::with_capacity(self.layers.len());
        for (i, (layer, delta)) in self.layers.iter().zip(&deltas).enumerate() {
            let layer_input = if i == 0 { &example.input } else { &activations[i - 1] };
            let (w_grad, b_grad) = layer.compute_gradients(delta, layer_input)?;
            weights.push(w_grad);
            biases.push(b_grad);
        }
        Ok(Gradients { weights, biases, loss })
    }

    /// Gradient-descent step: W -= lr·gW, b -= lr·gB for every layer.
    ///
    /// All shapes are validated first, so on error no layer has changed.
    pub fn apply_gradients(&mut self, grads: &Gradients, learning_rate: f64) -> Result<()> {
        if grads.weights.len() != self.layers.len() || grads.biases.len() != self.layers.len() {
            return Err(NetworkError::shape(
                "Network::apply_gradients (layer count)",
                self.layers.len(),
                format!("{} weight / {} bias gradients", grads.weights.len(), grads.biases.len()),
            ));
        }
        for (layer, (w, b)) in self.layers.iter().zip(grads.weights.iter().zip(&grads.biases)) {
            layer.check_gradients(w, b)?;
        }
        for (layer, (w, b)) in self.layers.iter_mut().zip(grads.weights.iter().zip(&grads.biases)) {
            layer.apply_gradients(w, b, learning_rate)?;
        }
        Ok(())
    }

    /// Mean per-example quadratic loss over a dataset.
    pub fn overall_loss(&self, data: &[Example]) -> Result<f64> {
        if data.is_empty() {
            return Err(NetworkError::EmptyDataset("overall loss"));
        }
        let mut total = 0.0;
        for example in data {
            self.check_example(example)?;
            total += QuadraticLoss::loss(&self.evaluate(&example.input)?, &example.target)?;
        }
        Ok(total / data.len() as f64)
    }
}
