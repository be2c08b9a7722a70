use crate::artifacts::core::error::{Result, StorageContext};
use crate::artifacts::core::write_atomically;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Repository configuration stored as JSON in `.bitlet/config`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub core: CoreConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// A bare repository has no working copy to stage from or check out into
    #[serde(default)]
    pub bare: bool,
}

impl Config {
    /// Load the configuration; a missing file means the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).at_path(path)?;

        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;

        write_atomically(path, content.as_bytes())
    }

    pub fn is_bare(&self) -> bool {
        self.core.bare
    }
}
