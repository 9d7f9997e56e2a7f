use log::{debug, trace};
use std::collections::HashMap;
use url::Url;

mod error;

pub use error::ProviderError;

/// Upload settings for one file-hosting API.
///
/// Built once and never mutated; replacing a provider in the registry
/// swaps in a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// URL the multipart form is POSTed to.
    pub endpoint: String,
    /// Form field the file bytes are attached under.
    pub file_field: String,
    /// `None` means the provider accepts files of any size.
    pub size_limit_bytes: Option<u64>,
    /// Top-level key of the JSON response holding the upload metadata.
    pub response_field: String,
    /// Dotted path from the response field's value down to the URL string.
    pub url_field_path: String,
}

impl ProviderConfig {
    pub fn new(
        endpoint: impl Into<String>,
        file_field: impl Into<String>,
        size_limit_bytes: Option<u64>,
        response_field: impl Into<String>,
        url_field_path: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            file_field: file_field.into(),
            size_limit_bytes,
            response_field: response_field.into(),
            url_field_path: url_field_path.into(),
        }
    }

    pub fn validate(&self, name: &str) -> Result<(), ProviderError> {
        if self.endpoint.trim().is_empty() {
            return Err(ProviderError::invalid(name, "endpoint is empty"));
        }

        match Url::parse(&self.endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ProviderError::invalid(
                    name,
                    format!("unsupported endpoint scheme '{}'", url.scheme()),
                ))
            }
            Err(e) => {
                return Err(ProviderError::invalid(
                    name,
                    format!("endpoint is not a valid URL: {e}"),
                ))
            }
        }

        if self.file_field.is_empty() {
            return Err(ProviderError::invalid(name, "file field is empty"));
        }

        if self.size_limit_bytes == Some(0) {
            return Err(ProviderError::invalid(name, "size limit must be positive"));
        }

        if self.url_field_path.is_empty() {
            return Err(ProviderError::invalid(name, "url field path is empty"));
        }

        if self.url_field_path.split('.').any(str::is_empty) {
            return Err(ProviderError::invalid(
                name,
                format!("url field path '{}' has an empty segment", self.url_field_path),
            ));
        }

        Ok(())
    }
}

/// Named provider configurations, enumerated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    entries: Vec<(String, ProviderConfig)>,
    index: HashMap<String, usize>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Result<&ProviderConfig, ProviderError> {
        self.index
            .get(name)
            .map(|&i| &self.entries[i].1)
            .ok_or_else(|| ProviderError::UnknownProvider(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Inserts `config` under `name`, replacing any existing entry in place.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        config: ProviderConfig,
    ) -> Result<(), ProviderError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProviderError::invalid(&name, "provider name is empty"));
        }
        config.validate(&name)?;

        match self.index.get(&name) {
            Some(&i) => {
                debug!("Replacing provider '{}'", name);
                self.entries[i].1 = config;
            }
            None => {
                trace!("Registering provider '{}' -> {}", name, config.endpoint);
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, config));
            }
        }
        Ok(())
    }

    pub fn list_names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProviderConfig)> {
        self.entries.iter().map(|(name, config)| (name.as_str(), config))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
