// Tests for accuracy and classification helpers.

use sigma_nn::{Example, Layer, Matrix, Network, NetworkError};

/// 2 -> 2 network that predicts class 0 when x0 > x1 and class 1 otherwise.
fn comparator() -> Network {
    let layer = Layer::from_parameters(
        Matrix::from_rows(vec![vec![4.0, -4.0], vec![-4.0, 4.0]]).unwrap(),
        vec![0.0, 0.0],
    )
    .unwrap();
    Network::from_layers(vec![layer]).unwrap()
}

fn labeled(points: &[([f64; 2], usize)]) -> Vec<Example> {
    points
        .iter()
        .map(|(x, label)| Example::one_hot(x.to_vec(), *label, 2).unwrap())
        .collect()
}

#[test]
fn accuracy_counts_argmax_matches() {
    let net = comparator();
    let data = labeled(&[([1.0, 0.0], 0), ([0.0, 1.0], 1), ([0.9, 0.1], 1), ([0.2, 0.8], 0)]);
    assert_eq!(net.validation_accuracy(&data).unwrap(), 0.5);
    assert_eq!(net.predict(&[0.7, 0.1]).unwrap(), 0);
}

#[test]
fn accuracy_is_a_fraction_for_random_networks() {
    let data = labeled(&[([1.0, 0.0], 0), ([0.0, 1.0], 1), ([0.3, 0.3], 1)]);
    for seed in 0..20 {
        let net = Network::seeded(&[2, 5, 2], seed).unwrap();
        let acc = net.validation_accuracy(&data).unwrap();
        assert!((0.0..=1.0).contains(&acc));
    }
}

#[test]
fn accuracy_over_empty_dataset_is_an_error() {
    let net = comparator();
    assert!(matches!(net.validation_accuracy(&[]), Err(NetworkError::EmptyDataset(_))));
}

#[test]
fn classification_partitions_preserve_order() {
    let net = comparator();
    let data = labeled(&[
        ([1.0, 0.0], 0),
        ([0.9, 0.1], 1),
        ([0.0, 1.0], 1),
        ([0.8, 0.3], 1),
        ([0.2, 0.6], 1),
    ]);
    let result = net.test_classification(&data).unwrap();

    assert_eq!(result.correct.len() + result.incorrect.len(), data.len());
    assert_eq!(result.correct.iter().map(|c| c.input[0]).collect::<Vec<_>>(), vec![1.0, 0.0, 0.2]);
    assert_eq!(result.incorrect.iter().map(|m| m.input[0]).collect::<Vec<_>>(), vec![0.9, 0.8]);

    let miss = &result.incorrect[0];
    assert_eq!(miss.label, 1);
    assert_eq!(miss.predicted(), 0);
    assert_eq!(miss.output, net.evaluate(&[0.9, 0.1]).unwrap());
    assert_eq!(result.accuracy(), 0.6);
}

#[test]
fn classification_of_empty_dataset_is_empty() {
    let result = comparator().test_classification(&[]).unwrap();
    assert!(result.is_empty());
}

#[test]
fn classification_rejects_mismatched_targets() {
    let net = comparator();
    let data = vec![Example::one_hot(vec![1.0, 0.0], 2, 10).unwrap()];
    assert!(matches!(net.test_classification(&data), Err(NetworkError::ShapeMismatch { .. })));
}
