use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfigFile {
    pub store: StoreSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    pub project_id: String,
    pub database: Option<String>,
    // Optional environment variable name for customization
    pub env_api_key: Option<String>,
}

/// Connection settings for the cloud document database. The API key never
/// lives in the TOML file; it is pulled from an environment variable whose
/// name the file may override.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub project_id: String,
    pub database: Option<String>,
    // Loaded from the environment
    pub api_key: Option<String>,
    pub env_api_key: Option<String>,
}

impl StoreConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read store config file: {}", path))?;

        let config_file: StoreConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse store config file: {}", path))?;

        let mut config = Self::from_section(config_file.store);
        config.load_credentials()?;

        Ok(config)
    }

    fn from_section(section: StoreSection) -> Self {
        Self {
            project_id: section.project_id,
            database: section.database,
            api_key: None,
            env_api_key: section.env_api_key,
        }
    }

    pub fn load_credentials(&mut self) -> Result<()> {
        let api_key_var = self.env_api_key.as_deref().unwrap_or("CATALOG_STORE_API_KEY");

        self.api_key = env::var(api_key_var)
            .with_context(|| format!("Missing environment variable: {}", api_key_var))?
            .into();

        Ok(())
    }

    pub fn get_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Store API key not loaded"))
    }

    pub fn get_database(&self) -> &str {
        self.database.as_deref().unwrap_or("(default)")
    }

    pub fn validate(&self) -> Result<()> {
        if self.project_id.is_empty() {
            return Err(anyhow::anyhow!("Store project id cannot be empty"));
        }

        if self.api_key.is_none() {
            return Err(anyhow::anyhow!("Store API key not loaded"));
        }

        Ok(())
    }
}
