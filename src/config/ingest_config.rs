use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfigFile {
    pub ingest: IngestSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSection {
    pub collection: Option<String>,
    pub batch_size: Option<usize>,
    pub default_seller_id: Option<String>,
}

/// Ingestion settings: which collection the drafts land in, how large the
/// independent write batches are, and an optional seller id applied when the
/// CLI caller does not pass one.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub collection: String,
    pub batch_size: usize,
    pub default_seller_id: Option<String>,
}

impl IngestConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read ingest config file: {}", path))?;

        let config_file: IngestConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse ingest config file: {}", path))?;

        Ok(Self::from_section(config_file.ingest))
    }

    fn from_section(section: IngestSection) -> Self {
        let defaults = Self::default();
        Self {
            collection: section.collection.unwrap_or(defaults.collection),
            batch_size: section.batch_size.unwrap_or(defaults.batch_size),
            default_seller_id: section.default_seller_id,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.collection.is_empty() {
            return Err(anyhow::anyhow!("Ingest collection cannot be empty"));
        }

        if self.batch_size == 0 {
            return Err(anyhow::anyhow!("Ingest batch size must be at least 1"));
        }

        Ok(())
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            collection: "products".to_string(),
            batch_size: 400,
            default_seller_id: None,
        }
    }
}
