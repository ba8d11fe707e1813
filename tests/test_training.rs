// Tests for the three gradient-descent schedules on the XOR problem, plus
// the configuration and early-termination behaviour of the training loop.

use std::sync::atomic::AtomicBool;
use std::sync::{mpsc, Arc};

use approx::assert_relative_eq;
use sigma_nn::{
    minibatch_gradient_descent, stochastic_gradient_descent, train_loop, vanilla_gradient_descent,
    Example, Network, NetworkError, Schedule, TrainConfig, TrainingHistory,
};

fn xor_data() -> Vec<Example> {
    vec![
        Example::new(vec![1.0, 1.0], vec![0.0]),
        Example::new(vec![0.0, 1.0], vec![1.0]),
        Example::new(vec![1.0, 0.0], vec![1.0]),
        Example::new(vec![0.0, 0.0], vec![0.0]),
    ]
}

fn solves_xor(network: &Network) -> bool {
    xor_data().iter().all(|example| {
        let out = network.evaluate(&example.input).unwrap()[0];
        out.round() == example.target[0]
    })
}

fn loss_decreased(losses: &[f64]) -> bool {
    let last = losses[losses.len() - 1];
    last < losses[0] && last < losses[losses.len() / 2]
}

/// Trains Glorot-initialized [2, 3, 1] networks from seeds `0..10` and
/// counts the runs that end with a falling loss and a solved XOR table.
fn converged_runs(train: impl Fn(&mut Network, u64) -> TrainingHistory) -> usize {
    (0..10)
        .filter(|&seed| {
            let mut net = Network::seeded(&[2, 3, 1], seed).unwrap();
            let history = train(&mut net, seed);
            loss_decreased(&history.losses) && solves_xor(&net)
        })
        .count()
}

#[test]
fn vanilla_descent_learns_xor() {
    let solved = converged_runs(|net, seed| {
        let history =
            vanilla_gradient_descent(net, &xor_data(), 2000, 3.0, None, Some(seed)).unwrap();
        assert_eq!(history.losses.len(), 2000);
        assert!(history.accuracies.is_empty());
        history
    });
    assert!(solved >= 9, "only {solved} of 10 seeds solved XOR");
}

#[test]
fn vanilla_descent_loss_rarely_increases() {
    let mut net = Network::seeded(&[2, 3, 1], 0).unwrap();
    let history = vanilla_gradient_descent(&mut net, &xor_data(), 2000, 3.0, None, None).unwrap();
    let increases = history.losses.windows(2).filter(|w| w[1] > w[0]).count();
    assert!(increases < 200, "loss increased in {increases} of 2000 epochs");
}

#[test]
fn stochastic_descent_learns_xor() {
    let solved = converged_runs(|net, seed| {
        stochastic_gradient_descent(net, &xor_data(), 1500, 3.0, None, Some(seed)).unwrap()
    });
    assert!(solved >= 9, "only {solved} of 10 seeds solved XOR");
}

#[test]
fn minibatch_descent_learns_xor() {
    let solved = converged_runs(|net, seed| {
        minibatch_gradient_descent(net, &xor_data(), 2, 1500, 3.0, None, Some(seed)).unwrap()
    });
    assert!(solved >= 9, "only {solved} of 10 seeds solved XOR");
}

#[test]
fn oversized_minibatch_matches_full_batch() {
    let data = xor_data();
    for size in [4, 5, 100] {
        let mut full = Network::seeded(&[2, 3, 1], 17).unwrap();
        let mut mini = full.clone();
        let a = vanilla_gradient_descent(&mut full, &data, 50, 3.0, None, Some(9)).unwrap();
        let b =
            minibatch_gradient_descent(&mut mini, &data, size, 50, 3.0, None, Some(9)).unwrap();
        for (x, y) in a.losses.iter().zip(&b.losses) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12);
        }
        for (wa, wb) in full.weights().zip(mini.weights()) {
            for (x, y) in wa.as_slice().iter().zip(wb.as_slice()) {
                assert_relative_eq!(*x, *y, epsilon = 1e-12);
            }
        }
    }
}

/// Six deterministic examples sized for `layer_sizes`, with 0/1 targets.
fn examples_for(layer_sizes: &[usize]) -> Vec<Example> {
    let (n_in, n_out) = (layer_sizes[0], layer_sizes[layer_sizes.len() - 1]);
    (0..6)
        .map(|i| {
            let input = (0..n_in).map(|j| ((7 * i + 3 * j) % 5) as f64 / 4.0).collect();
            let target = (0..n_out).map(|k| ((i + k) % 2) as f64).collect();
            Example::new(input, target)
        })
        .collect()
}

#[test]
fn every_schedule_changes_every_parameter_in_one_epoch() {
    let topologies: &[&[usize]] = &[
        &[2, 1],
        &[1, 6, 1],
        &[3, 4, 2],
        &[2, 4, 3, 1],
        &[5, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 2],
    ];
    for (seed, &sizes) in topologies.iter().enumerate() {
        let data = examples_for(sizes);
        for schedule in [Schedule::Vanilla, Schedule::Stochastic, Schedule::Minibatch { size: 4 }] {
            let mut net = Network::seeded(sizes, seed as u64).unwrap();
            let before = net.clone();
            let config = TrainConfig::new(1, 3.0, schedule).with_seed(seed as u64);
            train_loop(&mut net, &data, None, &config).unwrap();
            for (w1, w2) in before.weights().zip(net.weights()) {
                assert_ne!(w1, w2, "{schedule} on {sizes:?}: weights unchanged");
            }
            for (b1, b2) in before.biases().zip(net.biases()) {
                assert_ne!(b1, b2, "{schedule} on {sizes:?}: biases unchanged");
            }
        }
    }
}

#[test]
fn zero_epochs_is_a_no_op() {
    let mut net = Network::seeded(&[2, 3, 1], 1).unwrap();
    let before = net.clone();
    let data = xor_data();
    let history =
        stochastic_gradient_descent(&mut net, &data, 0, 3.0, Some(data.as_slice()), None).unwrap();
    assert!(history.is_empty());
    assert!(history.accuracies.is_empty());
    assert_eq!(net, before);
}

#[test]
fn zero_minibatch_size_is_rejected() {
    let mut net = Network::seeded(&[2, 3, 1], 1).unwrap();
    for epochs in [0, 3] {
        let err = minibatch_gradient_descent(&mut net, &xor_data(), 0, epochs, 3.0, None, None)
            .unwrap_err();
        assert!(matches!(err, NetworkError::InvalidConfiguration(_)));
    }
}

#[test]
fn non_finite_learning_rate_is_rejected() {
    let mut net = Network::seeded(&[2, 3, 1], 1).unwrap();
    let err = vanilla_gradient_descent(&mut net, &xor_data(), 1, f64::NAN, None, None).unwrap_err();
    assert!(matches!(err, NetworkError::InvalidConfiguration(_)));
}

#[test]
fn empty_training_set_is_rejected() {
    let mut net = Network::seeded(&[2, 3, 1], 1).unwrap();
    let err = vanilla_gradient_descent(&mut net, &[], 1, 3.0, None, None).unwrap_err();
    assert!(matches!(err, NetworkError::EmptyDataset(_)));
}

#[test]
fn malformed_example_fails_before_any_update() {
    let mut data = xor_data();
    data.push(Example::new(vec![1.0, 0.0, 1.0], vec![1.0]));
    let mut net = Network::seeded(&[2, 3, 1], 1).unwrap();
    let before = net.clone();
    let err = stochastic_gradient_descent(&mut net, &data, 5, 3.0, None, Some(0)).unwrap_err();
    assert!(matches!(err, NetworkError::ShapeMismatch { .. }));
    assert_eq!(net, before);

    let bad_validation = vec![Example::new(vec![1.0, 0.0], vec![1.0, 0.0])];
    let validation = Some(bad_validation.as_slice());
    let err =
        vanilla_gradient_descent(&mut net, &xor_data(), 5, 3.0, validation, None).unwrap_err();
    assert!(matches!(err, NetworkError::ShapeMismatch { .. }));
    assert_eq!(net, before);
}

#[test]
fn validation_accuracy_is_recorded_per_epoch() {
    let mut net = Network::seeded(&[2, 3, 1], 4).unwrap();
    let data = xor_data();
    let validation = Some(data.as_slice());
    let history = vanilla_gradient_descent(&mut net, &data, 300, 3.0, validation, Some(4)).unwrap();
    assert_eq!(history.accuracies.len(), 300);
    // A single output always predicts class 0, which every one-element target also encodes.
    assert!(history.accuracies.iter().all(|&a| a == 1.0));

    let mut net = Network::seeded(&[3, 4, 2], 4).unwrap();
    let data = examples_for(&[3, 4, 2]);
    let history =
        minibatch_gradient_descent(&mut net, &data, 2, 300, 3.0, Some(data.as_slice()), Some(4))
            .unwrap();
    assert_eq!(history.accuracies.len(), 300);
    assert!(history.accuracies.iter().all(|a| (0.0..=1.0).contains(a)));
}

#[test]
fn seeded_runs_are_reproducible() {
    let data = xor_data();
    let mut a = Network::seeded(&[2, 3, 1], 8).unwrap();
    let mut b = a.clone();
    let ha = stochastic_gradient_descent(&mut a, &data, 20, 3.0, None, Some(77)).unwrap();
    let hb = stochastic_gradient_descent(&mut b, &data, 20, 3.0, None, Some(77)).unwrap();
    assert_eq!(ha, hb);
    assert_eq!(a, b);
}

#[test]
fn progress_channel_receives_each_epoch() {
    let (tx, rx) = mpsc::channel();
    let mut net = Network::seeded(&[2, 3, 1], 8).unwrap();
    let data = xor_data();
    let config = TrainConfig::new(5, 3.0, Schedule::Vanilla).with_progress(tx);
    let history = train_loop(&mut net, &data, Some(data.as_slice()), &config).unwrap();
    drop(config);

    let stats: Vec<_> = rx.iter().collect();
    assert_eq!(stats.len(), 5);
    assert_eq!(stats[0].epoch, 1);
    assert_eq!(stats[4].total_epochs, 5);
    assert_eq!(stats[2].train_loss, history.losses[2]);
    assert!(stats.iter().all(|s| s.val_accuracy.is_some()));
}

#[test]
fn dropped_receiver_stops_training() {
    let (tx, rx) = mpsc::channel();
    drop(rx);
    let mut net = Network::seeded(&[2, 3, 1], 8).unwrap();
    let config = TrainConfig::new(10, 3.0, Schedule::Stochastic).with_progress(tx);
    let history = train_loop(&mut net, &xor_data(), None, &config).unwrap();
    assert_eq!(history.epochs(), 1);
}

#[test]
fn stop_flag_halts_before_the_first_epoch() {
    let flag = Arc::new(AtomicBool::new(true));
    let mut net = Network::seeded(&[2, 3, 1], 8).unwrap();
    let before = net.clone();
    let config = TrainConfig::new(10, 3.0, Schedule::Vanilla).with_stop_flag(flag);
    let history = train_loop(&mut net, &xor_data(), None, &config).unwrap();
    assert!(history.is_empty());
    assert_eq!(net, before);
}
