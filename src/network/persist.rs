use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{NetworkError, Result};
use crate::layers::dense::Layer;
use crate::network::network::Network;

/// On-disk form of a network. Decoded separately so the layer invariants can
/// be rechecked by `Network::from_layers` before a `Network` exists.
#[derive(Deserialize)]
struct SavedNetwork {
    layers: Vec<Layer>,
}

impl Network {
    /// Writes every weight matrix and bias vector as JSON. Floats are written
    /// in shortest round-trip form, so `load_json` restores them bit for bit.
    /// Missing parent directories are created.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self).map_err(|e| NetworkError::Io(e.into()))?;
        writer.flush()?;
        info!(path = %path.display(), layers = ?self.layer_sizes(), "saved network");
        Ok(())
    }

    /// Reads a network written by `save_json`.
    ///
    /// Returns `PersistenceNotFound` if nothing was saved at `path` and
    /// `PersistenceCorrupt` if the file does not decode to a consistent
    /// parameter set.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(NetworkError::PersistenceNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        let saved: SavedNetwork = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            if e.is_io() {
                NetworkError::Io(e.into())
            } else {
                NetworkError::PersistenceCorrupt(format!("{}: {e}", path.display()))
            }
        })?;
        let network = Network::from_layers(saved.layers)
            .map_err(|e| NetworkError::PersistenceCorrupt(format!("{}: {e}", path.display())))?;
        info!(path = %path.display(), layers = ?network.layer_sizes(), "loaded network");
        Ok(network)
    }

    /// Loads the network at `path`, or builds a fresh one from `layer_sizes`
    /// if nothing has been saved there yet.
    pub fn load_or_new(path: impl AsRef<Path>, layer_sizes: &[usize]) -> Result<Network> {
        match Network::load_json(path) {
            Err(e) if e.is_not_found() => {
                info!("no saved network, starting from a fresh one");
                Network::new(layer_sizes)
            }
            other => other,
        }
    }
}
