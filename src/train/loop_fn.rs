use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::data::Example;
use crate::error::{NetworkError, Result};
use crate::network::{gradients::Gradients, network::Network};
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::{EpochStats, TrainingHistory};
use crate::train::schedule::Schedule;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs and returns the per-epoch
/// training loss and (when `validation` is given) validation accuracy.
///
/// # Arguments
/// - `network`   : mutable reference to the network; modified in place
/// - `training`  : training examples
/// - `validation`: optional examples scored after every epoch
/// - `config`    : schedule, learning rate, seed, progress channel, stop flag
///
/// # Errors
/// Configuration is validated first (`InvalidConfiguration`). With
/// `epochs == 0` nothing else happens. Otherwise an empty training set is
/// `EmptyDataset`, and every example is shape-checked before the first
/// update, so a bad example never leaves the network half-trained.
///
/// # Early termination
/// The loop breaks between epochs if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
pub fn train_loop(
    network: &mut Network,
    training: &[Example],
    validation: Option<&[Example]>,
    config: &TrainConfig,
) -> Result<TrainingHistory> {
    config.schedule.validate()?;
    let optimizer = Sgd::new(config.learning_rate)?;

    let mut history = TrainingHistory::default();
    if config.epochs == 0 {
        return Ok(history);
    }

    if training.is_empty() {
        return Err(NetworkError::EmptyDataset("training loss"));
    }
    if validation.is_some_and(|v| v.is_empty()) {
        return Err(NetworkError::EmptyDataset("validation accuracy"));
    }
    for example in training.iter().chain(validation.unwrap_or_default()) {
        network.check_example(example)?;
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        schedule = %config.schedule,
        epochs = config.epochs,
        learning_rate = config.learning_rate,
        examples = training.len(),
        layers = ?network.layer_sizes(),
        "starting training"
    );

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            warn!(epoch, "stop flag set, ending training early");
            break;
        }

        let t_start = Instant::now();

        // Fresh permutation every epoch.
        let mut order: Vec<usize> = (0..training.len()).collect();
        order.shuffle(&mut rng);

        let train_loss = match config.schedule {
            Schedule::Vanilla => {
                run_batched_epoch(network, training, &order, training.len(), &optimizer)?
            }
            Schedule::Stochastic => run_stochastic_epoch(network, training, &order, &optimizer)?,
            Schedule::Minibatch { size } => {
                run_batched_epoch(network, training, &order, size, &optimizer)?
            }
        };

        let val_accuracy = validation
            .map(|v| network.validation_accuracy(v))
            .transpose()?;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            val_accuracy,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        debug!(epoch, train_loss, ?val_accuracy, elapsed_ms = stats.elapsed_ms, "epoch complete");
        history.record(&stats);

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                warn!(epoch, "progress receiver dropped, ending training early");
                break;
            }
        }
    }

    info!(epochs = history.epochs(), final_loss = ?history.final_loss(), "training finished");
    Ok(history)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}

/// One epoch of per-example updates. Returns the mean loss over all samples,
/// each measured before its own update.
fn run_stochastic_epoch(
    network: &mut Network,
    data: &[Example],
    order: &[usize],
    optimizer: &Sgd,
) -> Result<f64> {
    let mut total_loss = 0.0;
    for &idx in order {
        let grads = network.gradients(&data[idx])?;
        total_loss += grads.loss;
        optimizer.step(network, &grads)?;
    }
    Ok(total_loss / data.len() as f64)
}

/// One epoch of chunked updates over `order`.
///
/// Gradients are summed per chunk and divided by `batch_size`, including
/// for a shorter final chunk. A `batch_size` of at least the dataset size is
/// a single full-batch chunk averaged over the dataset. Returns the mean
/// per-sample loss over the epoch.
fn run_batched_epoch(
    network: &mut Network,
    data: &[Example],
    order: &[usize],
    batch_size: usize,
    optimizer: &Sgd,
) -> Result<f64> {
    let n = order.len();
    let inv_batch = 1.0 / batch_size.min(n) as f64;
    let mut total_loss = 0.0;

    for chunk in order.chunks(batch_size) {
        // All gradients of a chunk are taken against the same parameters.
        let mut acc = Gradients::zeros_for(network);
        for &idx in chunk {
            acc.accumulate(&network.gradients(&data[idx])?)?;
        }
        total_loss += acc.loss;

        acc.scale(inv_batch);
        optimizer.step(network, &acc)?;
    }

    Ok(total_loss / n as f64)
}
