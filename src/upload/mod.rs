use log::{debug, info, trace, warn};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tokio::fs;

pub mod batch;
pub mod path;

use crate::consts::{BODY_EXCERPT_LEN, USER_AGENT};
use crate::provider::ProviderConfig;
use crate::utils::{display_name, format_size, truncate};
use path::UrlPath;

/// What happened to a single file. Failures are values, not errors: one
/// file going wrong never stops the next one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadOutcome {
    Success { url: String },
    /// The file is larger than the provider accepts; nothing was sent.
    SizeExceeded { limit_bytes: u64 },
    /// The JSON response has no top-level response field.
    MissingResponseField,
    /// The url path could not be followed; carries the parsed response.
    UrlNotFound { response: Value },
    TransportError { message: String },
    /// The local file could not be inspected or read.
    ReadError { message: String },
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            UploadOutcome::Success { url } => Some(url),
            _ => None,
        }
    }
}

impl fmt::Display for UploadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadOutcome::Success { url } => write!(f, "{url}"),
            UploadOutcome::SizeExceeded { limit_bytes } => {
                write!(f, "file exceeds the {} limit", format_size(*limit_bytes))
            }
            UploadOutcome::MissingResponseField => write!(f, "unexpected response format"),
            UploadOutcome::UrlNotFound { response } => {
                write!(f, "uploaded, but no URL found in response: {response}")
            }
            UploadOutcome::TransportError { message } => write!(f, "upload failed: {message}"),
            UploadOutcome::ReadError { message } => write!(f, "cannot read file: {message}"),
        }
    }
}

/// Interprets a parsed provider response: picks `response_field` from the
/// top-level object and follows `url_field_path` inside it.
pub fn extract_url(response: Value, response_field: &str, url_field_path: &str) -> UploadOutcome {
    let Some(payload) = response.as_object().and_then(|o| o.get(response_field)) else {
        warn!("Response lacks field '{}': {}", response_field, response);
        return UploadOutcome::MissingResponseField;
    };

    let path = UrlPath::new(url_field_path);
    match path.resolve_str(payload) {
        Some(url) => UploadOutcome::Success {
            url: url.to_string(),
        },
        None => {
            debug!("Path '{}' did not lead to a string in {}", path, payload);
            UploadOutcome::UrlNotFound { response }
        }
    }
}

/// Performs single-attempt multipart uploads.
#[derive(Debug, Clone)]
pub struct Uploader {
    client: Client,
}

impl Uploader {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(None)
    }

    /// `None` leaves the transport's own default in place.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn upload(&self, file: &Path, config: &ProviderConfig) -> UploadOutcome {
        if let Some(limit) = config.size_limit_bytes {
            let size = match fs::metadata(file).await {
                Ok(meta) => meta.len(),
                Err(e) => {
                    return UploadOutcome::ReadError {
                        message: format!("{}: {e}", file.display()),
                    }
                }
            };
            if size > limit {
                debug!(
                    "{} is {} bytes, over the {} byte limit",
                    file.display(),
                    size,
                    limit
                );
                return UploadOutcome::SizeExceeded { limit_bytes: limit };
            }
        }

        let form = match Self::build_form(file, &config.file_field).await {
            Ok(form) => form,
            Err(e) => {
                return UploadOutcome::ReadError {
                    message: format!("{}: {e}", file.display()),
                }
            }
        };

        let response = match self.send(&config.endpoint, form).await {
            Ok(value) => value,
            Err(message) => {
                debug!("Upload of {} failed: {}", file.display(), message);
                return UploadOutcome::TransportError { message };
            }
        };

        let outcome = extract_url(response, &config.response_field, &config.url_field_path);
        if let UploadOutcome::Success { url } = &outcome {
            info!("Uploaded {} to {}", file.display(), url);
        }
        outcome
    }

    /// The file bytes live only inside the returned form; the handle used to
    /// read them is closed before this returns.
    async fn build_form(file: &Path, field: &str) -> std::io::Result<Form> {
        let data = fs::read(file).await?;
        let mime = mime_guess::from_path(file).first_or_octet_stream();
        trace!(
            "Attaching {} ({} bytes, {}) as '{}'",
            file.display(),
            data.len(),
            mime,
            field
        );

        let part = Part::bytes(data)
            .file_name(display_name(file))
            .mime_str(mime.as_ref())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        // Names go out verbatim, as browsers send them.
        Ok(Form::new().percent_encode_noop().part(field.to_string(), part))
    }

    async fn send(&self, endpoint: &str, form: Form) -> Result<Value, String> {
        debug!("POST {}", endpoint);
        let response = self
            .client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        let body = response.text().await.map_err(|e| e.to_string())?;
        trace!("Response {} from {}: {}", status, endpoint, truncate(&body, BODY_EXCERPT_LEN));

        if !status.is_success() {
            return Err(format!("HTTP {}: {}", status, truncate(&body, BODY_EXCERPT_LEN)));
        }

        serde_json::from_str(&body).map_err(|e| format!("invalid JSON response: {e}"))
    }
}
