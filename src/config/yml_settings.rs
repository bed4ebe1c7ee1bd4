use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::domain::template::MergePolicy;
use crate::validation::Mode;

pub const DEFAULT_CONFIG_FILE: &str = "uri-params.yml";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Defaults read from a YAML settings file. Command-line flags take precedence.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct YmlSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge: Option<MergePolicy>,
}

impl YmlSettings {
    pub fn from_yaml(yml: &str) -> Result<Self> {
        if yml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yml).context("Invalid yaml configuration")
    }

    /// Load settings from `path`, or from DEFAULT_CONFIG_FILE when no path is given.
    ///
    /// A missing default file yields default settings; a missing explicit file is an error.
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::load_with_default(path, Path::new(DEFAULT_CONFIG_FILE))
    }

    fn load_with_default(path: Option<&str>, default_path: &Path) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (Path::new(path), true),
            None => (default_path, false),
        };

        if !explicit && !path.exists() {
            debug!("no settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let yml = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read settings file {}", path.display()))?;
        let settings = Self::from_yaml(&yml)
            .with_context(|| format!("In settings file {}", path.display()))?;
        debug!("loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }
}
