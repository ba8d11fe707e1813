use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};
use crate::network::network::Network;

/// Serializable description of a network topology.
///
/// `layer_sizes[0]` is the input width and the last entry the output width.
/// A `NetworkSpec` can be stored as JSON on its own, before any weights
/// exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub layer_sizes: Vec<usize>,
}

impl NetworkSpec {
    pub fn new(layer_sizes: Vec<usize>) -> Result<NetworkSpec> {
        NetworkSpec::validate_sizes(&layer_sizes)?;
        Ok(NetworkSpec { layer_sizes })
    }

    /// At least two layers, every width positive.
    pub fn validate_sizes(layer_sizes: &[usize]) -> Result<()> {
        if layer_sizes.len() < 2 {
            return Err(NetworkError::InvalidConfiguration(format!(
                "layer spec needs at least 2 entries, got {}",
                layer_sizes.len()
            )));
        }
        if let Some(i) = layer_sizes.iter().position(|&n| n == 0) {
            return Err(NetworkError::InvalidConfiguration(format!(
                "layer {i} has width 0; every layer needs at least one neuron"
            )));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        NetworkSpec::validate_sizes(&self.layer_sizes)
    }

    /// Constructs a freshly initialized network with this topology.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        Network::with_rng(&self.layer_sizes, rng)
    }

    /// Serializes the spec to a pretty-printed JSON file, creating missing
    /// parent directories.
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

    /// Deserializes and validates a `NetworkSpec` from a JSON file.
    ///
    /// A missing file is `PersistenceNotFound`; a file that does not decode
    /// or describes an invalid topology is `InvalidConfiguration`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<NetworkSpec> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => NetworkError::PersistenceNotFound(path.to_path_buf()),
            _ => NetworkError::Io(e),
        })?;
        let spec: NetworkSpec = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            NetworkError::InvalidConfiguration(format!("{}: {e}", path.display()))
        })?;
        spec.validate()?;
        Ok(spec)
    }
}

impl std::str::FromStr for NetworkSpec {
    type Err = NetworkError;

    /// Parses a comma-separated width list such as `784,30,10`.
    fn from_str(s: &str) -> Result<NetworkSpec> {
        let layer_sizes = s
            .split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<usize>().map_err(|_| {
                    NetworkError::InvalidConfiguration(format!("'{part}' is not a layer width"))
                })
            })
            .collect::<Result<Vec<usize>>>()?;
        NetworkSpec::new(layer_sizes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_and_zero_width_specs() {
        assert!(NetworkSpec::new(vec![3]).is_err());
        assert!(NetworkSpec::new(vec![]).is_err());
        assert!(NetworkSpec::new(vec![3, 0, 1]).is_err());
        assert!(NetworkSpec::new(vec![3, 1]).is_ok());
    }

    #[test]
    fn parses_comma_separated_widths() {
        let spec: NetworkSpec = "784, 30,10".parse().unwrap();
        assert_eq!(spec.layer_sizes, vec![784, 30, 10]);
        assert!("784,x,10".parse::<NetworkSpec>().is_err());
        assert!("5".parse::<NetworkSpec>().is_err());
    }
}
