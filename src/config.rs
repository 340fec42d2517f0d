//! Analysis configuration.
//!
//! Only the schema and merge logic live here; discovering and reading
//! config files is the caller's concern.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::thresholds::{ThresholdOverrides, Thresholds};

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Partial threshold overrides; absent fields keep the defaults.
    pub thresholds: ThresholdOverrides,
}

impl Config {
    /// Parse a YAML configuration document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("invalid configuration document")
    }

    /// The default thresholds with this config's overrides applied.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::default().with_overrides(&self.thresholds)
    }
}
