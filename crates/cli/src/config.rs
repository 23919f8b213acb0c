use anyhow::{Context, Result};
use crypto_return_core::errors::CoreError;
use crypto_return_core::models::settings::Settings;
use crypto_return_core::models::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Where series files are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    Dir(PathBuf),
    Url(String),
}

/// Optional JSON config file. Every field has a default, and command-line
/// flags override whatever the file says.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Directory holding `btc.json`, `ether.json`, ...
    pub data_dir: PathBuf,

    /// Base URL serving the same files. Takes precedence over `data_dir`.
    pub base_url: Option<String>,

    /// Current USD price per symbol.
    pub current_prices: BTreeMap<String, f64>,

    pub settings: Settings,
}

impl Default for CliConfig {
    fn default() -> Self {
        let current_prices = [("BTC", 69000.0), ("BNB", 595.0), ("SOL", 175.0), ("ETHER", 2523.0)]
            .into_iter()
            .map(|(s, p)| (s.to_string(), p))
            .collect();
        Self {
            data_dir: PathBuf::from("data"),
            base_url: None,
            current_prices,
            settings: Settings::default(),
        }
    }
}

impl CliConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn data_location(&self) -> DataLocation {
        match &self.base_url {
            Some(url) => DataLocation::Url(url.clone()),
            None => DataLocation::Dir(self.data_dir.clone()),
        }
    }

    /// Current prices keyed by parsed symbol. Unknown keys are an error.
    pub fn current_prices(&self) -> Result<Vec<(Symbol, f64)>, CoreError> {
        self.current_prices
            .iter()
            .map(|(s, p)| Ok((s.parse::<Symbol>()?, *p)))
            .collect()
    }
}
