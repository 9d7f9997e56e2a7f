use figment::providers::{Format, Toml};
use figment::Figment;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

mod error;
pub mod schema;

pub use error::ConfigError;
pub use schema::{Config, ProviderEntry};

use crate::consts::{APP_NAME, CONFIG_FILE_NAME};
use crate::provider::ProviderRegistry;

const BUNDLED_CONFIG: &str = include_str!("../../config/config.default.toml");

/// Loaded configuration plus the file it came from.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: Config,
    path: PathBuf,
    user_file_loaded: bool,
}

impl ConfigManager {
    /// Loads the bundled defaults merged with the user file. An explicit
    /// `path` must exist; the default location is optional.
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (get_config_path(), false),
        };

        if required && !path.exists() {
            return Err(ConfigError::IO(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("config file {} does not exist", path.display()),
            )));
        }

        let config = load_config_from_file(&path)?;
        Ok(Self {
            config,
            user_file_loaded: path.exists(),
            path,
        })
    }

    pub fn new_with_config(config: Config) -> Self {
        Self {
            config,
            path: get_config_path(),
            user_file_loaded: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.path
    }

    pub fn user_file_loaded(&self) -> bool {
        self.user_file_loaded
    }

    pub fn registry(&self) -> Result<ProviderRegistry, ConfigError> {
        let registry = self.config.registry()?;

        if !self.config.default_provider.is_empty()
            && !registry.contains(&self.config.default_provider)
        {
            warn!(
                "Default provider '{}' is not configured",
                self.config.default_provider
            );
        }

        Ok(registry)
    }

    /// Effective configuration rendered back to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&self.config)?)
    }
}

impl Config {
    /// Configuration shipped with the binary.
    pub fn bundled() -> Result<Self, ConfigError> {
        Ok(bundled_figment().extract()?)
    }
}

/// Registry holding only the bundled providers.
pub fn default_registry() -> Result<ProviderRegistry, ConfigError> {
    Ok(Config::bundled()?.registry()?)
}

pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(CONFIG_FILE_NAME)
}

fn bundled_figment() -> Figment {
    Figment::new().merge(Toml::string(BUNDLED_CONFIG))
}

fn load_config_from_file(path: &Path) -> Result<Config, ConfigError> {
    let mut figment = bundled_figment();

    if path.exists() {
        info!("Loading configuration from {}", path.display());
        // User providers are appended to the bundled list.
        figment = figment.admerge(Toml::file(path));
    } else {
        debug!(
            "No config file at {}, using bundled defaults",
            path.display()
        );
    }

    Ok(figment.extract()?)
}
