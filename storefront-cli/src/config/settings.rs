//! Configuration settings for storefront-cli

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use storefront::{CheckoutConfig, PaginationConfig};

use super::defaults;
use crate::error::{CliError, Result};

/// Main configuration struct for the command line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// JSON file with an array of products, served from memory
    #[serde(default)]
    pub seed_file: Option<PathBuf>,

    /// MySQL connection URL; takes precedence over `seed_file`
    #[serde(default)]
    pub database_url: Option<String>,

    /// Table holding the products when `database_url` is set
    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default)]
    pub pagination: PaginationConfig,

    #[serde(default)]
    pub checkout: CheckoutConfig,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_table() -> String {
    defaults::TABLE.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed_file: None,
            database_url: None,
            table: default_table(),
            pagination: PaginationConfig::default(),
            checkout: CheckoutConfig::default(),
            log_level: None,
        }
    }
}

/// Where the catalog is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource<'a> {
    Seed(&'a Path),
    MySql { url: &'a str, table: &'a str },
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            CliError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            builder = builder.add_source(File::with_name(defaults::CONFIG_FILE).required(false));
        }

        // STOREFRONT_DATABASE_URL, STOREFRONT_PAGINATION__MAX_LIMIT, ...
        builder = builder.add_source(
            Environment::with_prefix(defaults::ENV_PREFIX)
                .prefix_separator("_")
                .separator(defaults::ENV_SEPARATOR),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// The configured catalog source
    pub fn source(&self) -> Result<CatalogSource<'_>> {
        if let Some(url) = self.database_url.as_deref() {
            return Ok(CatalogSource::MySql {
                url,
                table: &self.table,
            });
        }
        match &self.seed_file {
            Some(path) => Ok(CatalogSource::Seed(path)),
            None => Err(CliError::ValidationError(
                "either database_url or seed_file is required".into(),
            )),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.pagination.validate()?;
        self.checkout.validate()?;

        if let CatalogSource::Seed(path) = self.source()? {
            if !path.exists() {
                return Err(CliError::ValidationError(format!(
                    "Seed file not found: {}",
                    path.display()
                )));
            }
        }

        if self.table.trim().is_empty() {
            return Err(CliError::ValidationError("table is required".into()));
        }

        Ok(())
    }
}
