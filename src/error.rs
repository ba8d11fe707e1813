use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NetworkError>;

#[derive(Error, Debug)]
pub enum NetworkError {
    /// A vector or matrix does not have the width the operation requires.
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: String,
        actual: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("cannot compute {0} over an empty dataset")]
    EmptyDataset(&'static str),

    /// No saved network or spec exists at the path. Callers usually fall
    /// back to a freshly constructed network.
    #[error("nothing saved at '{}'", .0.display())]
    PersistenceNotFound(PathBuf),

    #[error("saved network is corrupt: {0}")]
    PersistenceCorrupt(String),

    #[error("invalid dataset: {0}")]
    InvalidData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NetworkError {
    pub(crate) fn shape(
        context: &'static str,
        expected: impl ToString,
        actual: impl ToString,
    ) -> NetworkError {
        NetworkError::ShapeMismatch {
            context,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, NetworkError::PersistenceNotFound(_))
    }
}
