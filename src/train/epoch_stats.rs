use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};

/// Per-epoch training statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the training
/// loop sends one `EpochStats` value at the end of every completed epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean training loss over all samples in this epoch.
    pub train_loss: f64,
    /// Validation accuracy in [0, 1], if a validation set was provided.
    pub val_accuracy: Option<f64>,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

/// Metric sequences of a whole training run, one entry per completed epoch.
/// `accuracies` stays empty when no validation data was supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub losses: Vec<f64>,
    pub accuracies: Vec<f64>,
}

impl TrainingHistory {
    pub fn record(&mut self, stats: &EpochStats) {
        self.losses.push(stats.train_loss);
        if let Some(acc) = stats.val_accuracy {
            self.accuracies.push(acc);
        }
    }

    pub fn epochs(&self) -> usize {
        self.losses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.losses.is_empty()
    }

    pub fn final_loss(&self) -> Option<f64> {
        self.losses.last().copied()
    }

    /// Writes the history as pretty-printed JSON for external plotting.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|e| NetworkError::Io(e.into()))?;
        writer.flush()?;
        Ok(())
    }
}
