use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::consts::BYTES_PER_MB;
use crate::provider::{ProviderConfig, ProviderError, ProviderRegistry};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub default_provider: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub provider: Vec<ProviderEntry>,
}

/// One `[[provider]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub name: String,
    pub endpoint: String,
    pub file_field: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_limit_mb: Option<u64>,

    pub response_field: String,
    pub url_field: String,
}

impl ProviderEntry {
    pub fn to_provider_config(&self) -> Result<ProviderConfig, ProviderError> {
        let size_limit_bytes = match self.size_limit_mb {
            Some(mb) => Some(mb.checked_mul(BYTES_PER_MB).ok_or_else(|| {
                ProviderError::invalid(&self.name, format!("size limit of {mb} MB is too large"))
            })?),
            None => None,
        };

        Ok(ProviderConfig::new(
            self.endpoint.clone(),
            self.file_field.clone(),
            size_limit_bytes,
            self.response_field.clone(),
            self.url_field.clone(),
        ))
    }
}

impl Config {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Builds a registry from every `[[provider]]` in order. A later entry
    /// with an existing name replaces the earlier one in place.
    pub fn registry(&self) -> Result<ProviderRegistry, ProviderError> {
        let mut registry = ProviderRegistry::new();
        for entry in &self.provider {
            registry.add(entry.name.clone(), entry.to_provider_config()?)?;
        }
        Ok(registry)
    }
}
