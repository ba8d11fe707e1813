use crate::{
    error::{NetworkError, Result},
    math::{matrix::Matrix, vector},
    network::network::Network,
};

/// Per-layer parameter gradients plus the loss of the forward pass they were
/// computed from. Summed and rescaled by the batch schedulers.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub weights: Vec<Matrix>,
    pub biases: Vec<Vec<f64>>,
    pub loss: f64,
}

impl Gradients {
    /// Zero gradients shaped like `network`'s parameters.
    pub fn zeros_for(network: &Network) -> Gradients {
        Gradients {
            weights: network.weights().map(|w| Matrix::zeros(w.rows, w.cols)).collect(),
            biases: network.biases().map(|b| vec![0.0; b.len()]).collect(),
            loss: 0.0,
        }
    }

    pub fn accumulate(&mut self, other: &Gradients) -> Result<()> {
        if self.weights.len() != other.weights.len() || self.biases.len() != other.biases.len() {
            return Err(NetworkError::shape(
                "Gradients::accumulate",
                self.weights.len(),
                other.weights.len(),
            ));
        }
        for (acc, w) in self.weights.iter_mut().zip(&other.weights) {
            acc.add_assign(w)?;
        }
        for (acc, b) in self.biases.iter_mut().zip(&other.biases) {
            vector::add_assign(acc, b)?;
        }
        self.loss += other.loss;
        Ok(())
    }

    /// Multiplies every gradient entry and the loss by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for w in &mut self.weights {
            w.scale(factor);
        }
        for b in &mut self.biases {
            vector::scale(b, factor);
        }
        self.loss *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Example;

    #[test]
    fn zeros_match_network_shapes() {
        let net = Network::seeded(&[4, 3, 2], 1).unwrap();
        let g = Gradients::zeros_for(&net);
        assert_eq!(g.weights[0].shape(), (3, 4));
        assert_eq!(g.weights[1].shape(), (2, 3));
        assert_eq!(g.biases[1].len(), 2);
        assert_eq!(g.loss, 0.0);
    }

    #[test]
    fn accumulate_then_scale_averages() {
        let net = Network::seeded(&[2, 2, 1], 3).unwrap();
        let a = net.gradients(&Example::new(vec![1.0, 0.0], vec![1.0])).unwrap();
        let b = net.gradients(&Example::new(vec![0.0, 1.0], vec![0.0])).unwrap();

        let mut acc = Gradients::zeros_for(&net);
        acc.accumulate(&a).unwrap();
        acc.accumulate(&b).unwrap();
        acc.scale(0.5);

        let expected = (a.biases[1][0] + b.biases[1][0]) / 2.0;
        assert!((acc.biases[1][0] - expected).abs() < 1e-15);
        assert!((acc.loss - (a.loss + b.loss) / 2.0).abs() < 1e-15);
    }

    #[test]
    fn accumulate_rejects_other_topology() {
        let small = Network::seeded(&[2, 1], 0).unwrap();
        let large = Network::seeded(&[2, 2, 1], 0).unwrap();
        let mut acc = Gradients::zeros_for(&small);
        assert!(acc.accumulate(&Gradients::zeros_for(&large)).is_err());
    }
}
