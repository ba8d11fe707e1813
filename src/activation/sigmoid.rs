/// Logistic sigmoid, the only non-linearity the network uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sigmoid;

impl Sigmoid {
    pub fn function(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    /// Derivative expressed through the activation itself: for a = σ(z),
    /// σ'(z) = a(1 - a). Backprop only keeps activations, never z.
    pub fn derivative_from_output(a: f64) -> f64 {
        a * (1.0 - a)
    }

    pub fn apply(z: &[f64]) -> Vec<f64> {
        z.iter().map(|&x| Sigmoid::function(x)).collect()
    }

    pub fn derivatives(a: &[f64]) -> Vec<f64> {
        a.iter().map(|&x| Sigmoid::derivative_from_output(x)).collect()
    }
}
