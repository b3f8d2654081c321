use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::CoreError;
use crate::model::Credits;

/// Name of the optional config file inside the data directory.
pub const CONFIG_FILE: &str = "tessera.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TesseraConfig {
    /// Account the ledger is opened for.
    pub agent_id: String,
    /// Credits the ledger starts with on every process start.
    pub starting_balance: Credits,
    /// Directory of the local content-addressed store, relative to the data directory.
    pub store_dir: PathBuf,
}

impl Default for TesseraConfig {
    fn default() -> Self {
        Self {
            agent_id: "agent-demo-001".to_string(),
            starting_balance: 100,
            store_dir: PathBuf::from("store"),
        }
    }
}

impl TesseraConfig {
    /// Read `tessera.toml` from the data directory. A missing file yields the
    /// defaults; keys absent from the file keep their default values.
    pub fn load(data_dir: &Path) -> Result<Self, CoreError> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|source| CoreError::Read {
            path: path.clone(),
            source,
        })?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| CoreError::Config(format!("{}: {e}", path.display())))?;
        if config.starting_balance < 0 {
            return Err(CoreError::Config(format!(
                "starting_balance must not be negative, got {}",
                config.starting_balance
            )));
        }
        Ok(config)
    }

    /// Store directory resolved against the data directory.
    pub fn store_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.store_dir)
    }
}
