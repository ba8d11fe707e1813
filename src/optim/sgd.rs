use crate::{
    error::{NetworkError, Result},
    network::{gradients::Gradients, network::Network},
};

/// Plain gradient descent with a fixed learning rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Result<Sgd> {
        if !learning_rate.is_finite() {
            return Err(NetworkError::InvalidConfiguration(format!(
                "learning rate must be finite, got {learning_rate}"
            )));
        }
        Ok(Sgd { learning_rate })
    }

    /// Applies one update to every layer of `network` from gradients computed
    /// against its current parameters.
    pub fn step(&self, network: &mut Network, grads: &Gradients) -> Result<()> {
        network.apply_gradients(grads, self.learning_rate)
    }
}
