use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::network::network::NetworkParameters;
use crate::train::train_config::TrainingParameters;

/// A fully serializable description of a run: network architecture plus the
/// training configuration to pair with it.
///
/// `NetworkSpec` can be saved to / loaded from JSON independently of any
/// trained weights, making it possible to store configurations before
/// training starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name of the configuration.
    pub name: String,
    pub network: NetworkParameters,
    #[serde(default)]
    pub training: TrainingParameters,
}

impl NetworkSpec {
    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
