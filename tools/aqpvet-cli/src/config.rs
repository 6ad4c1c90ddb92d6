//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use aqpvet_commerce::config::CartConfig;
use serde::{Deserialize, Serialize};

/// File names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["aqpvet.toml", ".aqpvet.toml", "aqpvet.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Cart configuration.
    #[serde(default)]
    pub cart: CartConfig,

    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Where the cart snapshot is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the file store, relative to the config file.
    #[serde(default = "default_storage_dir")]
    pub dir: String,
}

fn default_storage_dir() -> String {
    ".aqpvet/storage".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

/// Generate a default aqpvet.toml config file.
pub fn generate_default_config(namespace: &str) -> String {
    format!(
        r#"# AqpVet cart configuration

[cart]
namespace = "{namespace}"
currency = "PEN"
max_quantity_per_item = 9999

[cart.pricing]
tax_rate_percent = 18.0
shipping_flat = "0.00"

[storage]
dir = ".aqpvet/storage"
"#,
        namespace = namespace
    )
}
