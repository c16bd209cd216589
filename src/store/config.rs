//! Warehouse configuration documents.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::layout::{Corner, LayoutParameters, LoadingAreaConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WarehouseConfig {
    pub layout: LayoutParameters,
    pub loading_areas: Vec<LoadingAreaConfig>,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            layout: LayoutParameters::default(),
            loading_areas: vec![
                LoadingAreaConfig::receiving(Corner::FrontLeft),
                LoadingAreaConfig::shipping(Corner::FrontRight),
            ],
        }
    }
}

impl WarehouseConfig {
    /// Parses and validates a JSON document. Missing fields take their
    /// defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::info!("loading warehouse config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        Ok(())
    }
}
