use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};

/// How a training epoch turns per-example gradients into updates.
///
/// - `Vanilla`   : full batch: average over the whole dataset, one update per epoch.
/// - `Stochastic`: one update per example.
/// - `Minibatch` : one update per contiguous chunk of `size` examples; the
///   summed gradient is divided by `size` even for a shorter final chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Schedule {
    Vanilla,
    Stochastic,
    Minibatch { size: usize },
}

impl Schedule {
    pub fn validate(&self) -> Result<()> {
        match self {
            Schedule::Minibatch { size: 0 } => Err(NetworkError::InvalidConfiguration(
                "minibatch size must be at least 1".to_owned(),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schedule::Vanilla => write!(f, "vanilla"),
            Schedule::Stochastic => write!(f, "stochastic"),
            Schedule::Minibatch { size } => write!(f, "minibatch({size})"),
        }
    }
}
