use crate::error::Result;
use crate::math::vector;

/// Quadratic error summed over the output components.
///
/// There is no division by the output width; averaging happens only across
/// examples (see `Network::overall_loss`).
pub struct QuadraticLoss;

impl QuadraticLoss {
    /// Scalar loss: Σ (predicted - expected)²
    pub fn loss(predicted: &[f64], expected: &[f64]) -> Result<f64> {
        let diff = vector::sub(predicted, expected)?;
        Ok(diff.iter().map(|d| d * d).sum())
    }

    /// Per-output gradient ∂loss/∂a: 2 (predicted - expected)
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Result<Vec<f64>> {
        let diff = vector::sub(predicted, expected)?;
        Ok(diff.into_iter().map(|d| 2.0 * d).collect())
    }
}
