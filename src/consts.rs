pub const APP_NAME: &str = "multiup";
pub const USER_AGENT: &str = concat!("multiup/", env!("CARGO_PKG_VERSION"));

pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const BYTES_PER_MB: u64 = 1024 * 1024;

// Longest slice of a response body quoted back in errors and logs.
pub const BODY_EXCERPT_LEN: usize = 300;
