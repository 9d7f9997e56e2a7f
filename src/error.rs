use thiserror::Error;

use crate::config::ConfigError;
use crate::provider::ProviderError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Provider(#[from] ProviderError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Upload task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No provider selected and no default_provider configured")]
    NoProvider,

    #[error("No files to upload")]
    NoFiles,

    #[error("{0} file(s) exceed the provider's size limit, nothing was uploaded")]
    Oversized(usize),

    #[error("{failed} of {total} upload(s) failed")]
    UploadsFailed { failed: usize, total: usize },
}
