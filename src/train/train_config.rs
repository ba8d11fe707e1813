use std::sync::mpsc;
use std::sync::{atomic::AtomicBool, Arc};

use crate::train::epoch_stats::EpochStats;
use crate::train::schedule::Schedule;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`       : total number of full passes over the training data
/// - `learning_rate`: fixed gradient-descent step size
/// - `schedule`     : vanilla, stochastic or minibatch updates
/// - `seed`         : seeds the per-epoch shuffle; `None` draws from entropy
/// - `progress_tx`  : optional channel sender; one `EpochStats` is sent per
///                     completed epoch.  If the receiver is dropped the loop
///                     terminates early.
/// - `stop_flag`    : optional atomic flag; when set to `true` from another
///                     thread the loop terminates after the current epoch.
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub schedule: Schedule,
    pub seed: Option<u64>,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a minimal unseeded `TrainConfig` with no progress channel and
    /// no stop flag.
    pub fn new(epochs: usize, learning_rate: f64, schedule: Schedule) -> Self {
        TrainConfig {
            epochs,
            learning_rate,
            schedule,
            seed: None,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }
}
