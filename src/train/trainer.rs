use crate::{
    data::Example,
    error::Result,
    network::network::Network,
    train::{
        epoch_stats::TrainingHistory, loop_fn::train_loop, schedule::Schedule,
        train_config::TrainConfig,
    },
};

fn run(
    network: &mut Network,
    data: &[Example],
    schedule: Schedule,
    epochs: usize,
    learning_rate: f64,
    validation: Option<&[Example]>,
    seed: Option<u64>,
) -> Result<TrainingHistory> {
    let mut config = TrainConfig::new(epochs, learning_rate, schedule);
    config.seed = seed;
    train_loop(network, data, validation, &config)
}

/// Full-batch gradient descent: one averaged update per epoch.
pub fn vanilla_gradient_descent(
    network: &mut Network,
    data: &[Example],
    epochs: usize,
    learning_rate: f64,
    validation: Option<&[Example]>,
    seed: Option<u64>,
) -> Result<TrainingHistory> {
    run(network, data, Schedule::Vanilla, epochs, learning_rate, validation, seed)
}

/// Stochastic gradient descent: one update per example.
pub fn stochastic_gradient_descent(
    network: &mut Network,
    data: &[Example],
    epochs: usize,
    learning_rate: f64,
    validation: Option<&[Example]>,
    seed: Option<u64>,
) -> Result<TrainingHistory> {
    run(network, data, Schedule::Stochastic, epochs, learning_rate, validation, seed)
}

/// Minibatch gradient descent: one update per chunk of `minibatch_size`.
pub fn minibatch_gradient_descent(
    network: &mut Network,
    data: &[Example],
    minibatch_size: usize,
    epochs: usize,
    learning_rate: f64,
    validation: Option<&[Example]>,
    seed: Option<u64>,
) -> Result<TrainingHistory> {
    run(
        network,
        data,
        Schedule::Minibatch { size: minibatch_size },
        epochs,
        learning_rate,
        validation,
        seed,
    )
}
