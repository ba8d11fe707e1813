use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};

/// A labeled training example: an input vector and its expected output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

impl Example {
    pub fn new(input: Vec<f64>, target: Vec<f64>) -> Example {
        Example { input, target }
    }

    /// Builds an example whose target is the one-hot encoding of `label`
    /// over `n_classes` classes. Fails with `InvalidData` if the label is
    /// out of range.
    pub fn one_hot(input: Vec<f64>, label: usize, n_classes: usize) -> Result<Example> {
        if label >= n_classes {
            return Err(NetworkError::InvalidData(format!(
                "class {label} out of range for {n_classes} classes"
            )));
        }
        let mut target = vec![0.0; n_classes];
        target[label] = 1.0;
        Ok(Example { input, target })
    }

    /// Class index encoded by the target (argmax of the one-hot vector).
    pub fn label(&self) -> Option<usize> {
        crate::math::vector::argmax(&self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hot_places_single_one() {
        let ex = Example::one_hot(vec![0.5], 3, 10).unwrap();
        assert_eq!(ex.target.len(), 10);
        assert_eq!(ex.target.iter().sum::<f64>(), 1.0);
        assert_eq!(ex.target[3], 1.0);
        assert_eq!(ex.label(), Some(3));
    }

    #[test]
    fn one_hot_rejects_out_of_range_label() {
        let err = Example::one_hot(vec![0.5], 10, 10).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidData(_)));
    }
}
