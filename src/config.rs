use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::infinite::WalkConfig;

/// Runtime options for class enumeration. Every field has a default, so a
/// JSON file only needs the keys it changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassConfig {
    /// Record, per member and direction, which member a mutation leads to.
    pub track_links: bool,
    /// Random mutation walks run before exact enumeration by the finiteness
    /// utilities.
    pub walk: WalkConfig,
}

impl ClassConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("deserialize class configuration")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("open config file {:?}", path))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("deserialize config file {:?}", path))
    }
}
