// Configuration management for the exchange simulator

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Delimited order record file replayed by the session.
    pub csv_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Identity of the simulated participant.
    pub participant: String,
    /// Asset grants applied to the ledger before the first time step.
    pub opening_balances: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub log_trades: bool,
    pub log_rejections: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        let mut opening_balances = BTreeMap::new();
        opening_balances.insert("BTC".to_string(), 10.0);

        Self {
            data: DataConfig {
                csv_path: "orders.csv".to_string(),
            },
            session: SessionConfig {
                participant: "local".to_string(),
                opening_balances,
            },
            logging: LoggingConfig {
                log_trades: true,
                log_rejections: true,
            },
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, content)
            .map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }

    /// Load configuration from file, or create default if file doesn't exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            let config = Self::default();
            config.to_file(&path)?;
            println!("Created default config file: {}", path.as_ref().display());
            Ok(config)
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.data.csv_path.is_empty() {
            return Err(ConfigError::Validation(
                "csv_path must not be empty".to_string(),
            ));
        }

        if self.session.participant.is_empty() {
            return Err(ConfigError::Validation(
                "participant must not be empty".to_string(),
            ));
        }

        for (asset, balance) in &self.session.opening_balances {
            if asset.is_empty() {
                return Err(ConfigError::Validation(
                    "opening balance asset must not be empty".to_string(),
                ));
            }
            if *balance < 0.0 || !balance.is_finite() {
                return Err(ConfigError::Validation(format!(
                    "opening balance for {} must be a non-negative number",
                    asset
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(String),

    #[error("Failed to write config file: {0}")]
    FileWrite(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}
