use serde::Serialize;

use crate::data::Example;
use crate::error::{NetworkError, Result};
use crate::math::vector::argmax;
use crate::network::network::Network;

/// An example the network classified correctly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectPrediction {
    pub input: Vec<f64>,
    pub label: usize,
}

/// An example the network got wrong, with the raw output it produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Misclassification {
    pub input: Vec<f64>,
    pub label: usize,
    pub output: Vec<f64>,
}

impl Misclassification {
    pub fn predicted(&self) -> usize {
        argmax(&self.output).unwrap_or(0)
    }
}

/// Dataset partitioned by classification outcome, order preserved.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Classification {
    pub correct: Vec<CorrectPrediction>,
    pub incorrect: Vec<Misclassification>,
}

impl Classification {
    pub fn len(&self) -> usize {
        self.correct.len() + self.incorrect.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fraction of correct predictions; 0 for an empty partition.
    pub fn accuracy(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.correct.len() as f64 / self.len() as f64
    }
}

fn class_of(v: &[f64], context: &'static str) -> Result<usize> {
    argmax(v).ok_or_else(|| NetworkError::shape(context, "a non-empty vector", 0))
}

impl Network {
    /// Predicted class: index of the largest output activation.
    pub fn predict(&self, input: &[f64]) -> Result<usize> {
        class_of(&self.evaluate(input)?, "Network::predict")
    }

    /// Fraction of examples whose predicted class equals the target's
    /// one-hot class.
    pub fn validation_accuracy(&self, data: &[Example]) -> Result<f64> {
        if data.is_empty() {
            return Err(NetworkError::EmptyDataset("validation accuracy"));
        }
        let mut correct = 0usize;
        for example in data {
            self.check_example(example)?;
            if self.predict(&example.input)? == class_of(&example.target, "example target")? {
                correct += 1;
            }
        }
        Ok(correct as f64 / data.len() as f64)
    }

    pub fn test_classification(&self, data: &[Example]) -> Result<Classification> {
        let mut result = Classification::default();
        for example in data {
            self.check_example(example)?;
            let output = self.evaluate(&example.input)?;
            let label = class_of(&example.target, "example target")?;
            if class_of(&output, "Network::test_classification")? == label {
                result.correct.push(CorrectPrediction { input: example.input.clone(), label });
            } else {
                result.incorrect.push(Misclassification {
                    input: example.input.clone(),
                    label,
                    output,
                });
            }
        }
        Ok(result)
    }
}
