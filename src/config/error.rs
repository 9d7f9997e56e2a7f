use thiserror::Error;

use crate::provider::ProviderError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Figment error: {0}")]
    Figment(#[from] figment::Error),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}
