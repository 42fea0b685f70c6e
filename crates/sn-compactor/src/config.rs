//! Digest configuration loaded from `.specnut.yaml` or JSON.

use serde::{Deserialize, Serialize};
use sn_classifier::ClassifierConfig;
use sn_core::{Result, SnError, TokenScheme};
use std::path::{Path, PathBuf};

use crate::policy::OptimizerConfig;

/// File names searched, in order, when no config path is given.
pub const CONFIG_FILE_NAMES: [&str; 2] = [".specnut.yaml", ".specnut.yml"];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub scheme: TokenScheme,
    pub classifier: ClassifierConfig,
    pub optimizer: OptimizerConfig,
}

impl DigestConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(text).map_err(|e| SnError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| SnError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load by extension: `.json` is JSON, anything else YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// First config file found in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.is_file())
    }

    pub fn validate(&self) -> Result<()> {
        if self.classifier.critical_section_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(SnError::InvalidConfig(
                "classifier.critical_section_keywords must not be empty".into(),
            ));
        }
        self.optimizer.validate()
    }
}
