pub mod cli;
pub mod config;
pub mod consts;
pub mod error;
pub mod provider;
pub mod upload;
pub mod utils;

pub use config::{Config, ConfigError, ConfigManager};
pub use error::Error;
pub use provider::{ProviderConfig, ProviderError, ProviderRegistry};
pub use upload::{extract_url, UploadOutcome, Uploader};
