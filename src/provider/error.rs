use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Invalid config for provider '{name}': {reason}")]
    InvalidConfig { name: String, reason: String },
}

impl ProviderError {
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        ProviderError::InvalidConfig {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
