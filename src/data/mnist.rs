use std::fs;
use std::path::Path;

use tracing::info;

use crate::data::{example::Example, idx::parse_idx_pair};
use crate::error::{NetworkError, Result};

pub const MNIST_CLASSES: usize = 10;

/// Number of the 60 000 MNIST training images kept for training; the rest
/// becomes the validation set.
pub const TRAINING_SPLIT: usize = 50_000;

const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

/// Training, validation and testing examples with one-hot targets.
#[derive(Debug, Clone, Default)]
pub struct MnistData {
    pub training: Vec<Example>,
    pub validation: Vec<Example>,
    pub testing: Vec<Example>,
}

fn read(dir: &Path, name: &str) -> Result<Vec<u8>> {
    let path = dir.join(name);
    fs::read(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            NetworkError::InvalidData(format!("missing MNIST file '{}'", path.display()))
        }
        _ => NetworkError::Io(e),
    })
}

fn load_pair(dir: &Path, images: &str, labels: &str) -> Result<Vec<Example>> {
    parse_idx_pair(&read(dir, images)?, &read(dir, labels)?, MNIST_CLASSES)
}

/// Loads the four MNIST IDX files from `dir`.
///
/// The training file is split into the first `TRAINING_SPLIT` examples for
/// training and the remainder for validation; the t10k files are the test
/// set.
pub fn load_mnist(dir: impl AsRef<Path>) -> Result<MnistData> {
    let dir = dir.as_ref();
    let mut training = load_pair(dir, TRAIN_IMAGES, TRAIN_LABELS)?;
    let testing = load_pair(dir, TEST_IMAGES, TEST_LABELS)?;

    let validation = training.split_off(TRAINING_SPLIT.min(training.len()));
    info!(
        dir = %dir.display(),
        training = training.len(),
        validation = validation.len(),
        testing = testing.len(),
        "loaded MNIST"
    );
    Ok(MnistData { training, validation, testing })
}

/// First `limit` examples whose class is in `classes`, in dataset order.
/// Small two-class subsets make fast smoke tests for the schedulers.
pub fn class_subset(data: &[Example], classes: &[usize], limit: usize) -> Vec<Example> {
    data.iter()
        .filter(|ex| ex.label().is_some_and(|c| classes.contains(&c)))
        .take(limit)
        .cloned()
        .collect()
}
