use log::{debug, info};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{UploadOutcome, Uploader};
use crate::provider::ProviderConfig;
use crate::utils::display_name;

const REPORT_BUFFER: usize = 16;

/// Files queued for one provider.
#[derive(Debug, Clone)]
pub struct UploadBatch {
    pub provider: String,
    pub config: ProviderConfig,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: UploadOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Oversized {
    pub path: PathBuf,
    pub size: u64,
    pub limit_bytes: u64,
}

/// Files in `files` larger than the provider allows. Unreadable files are
/// skipped here and surface later as [`UploadOutcome::ReadError`].
pub fn preflight(files: &[PathBuf], config: &ProviderConfig) -> Vec<Oversized> {
    let Some(limit) = config.size_limit_bytes else {
        return Vec::new();
    };

    files
        .iter()
        .filter_map(|path| {
            let size = std::fs::metadata(path).ok()?.len();
            (size > limit).then(|| Oversized {
                path: path.clone(),
                size,
                limit_bytes: limit,
            })
        })
        .collect()
}

/// Uploads the batch on a background task, one file at a time, and streams
/// a report per file back in submission order.
pub fn spawn(
    uploader: Uploader,
    batch: UploadBatch,
) -> (mpsc::Receiver<FileReport>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(REPORT_BUFFER);

    let handle = tokio::spawn(async move {
        info!(
            "Uploading {} file(s) to {}",
            batch.files.len(),
            batch.provider
        );
        for path in batch.files {
            let outcome = uploader.upload(&path, &batch.config).await;
            if tx.send(FileReport { path, outcome }).await.is_err() {
                debug!("Report receiver dropped, stopping batch");
                break;
            }
        }
    });

    (rx, handle)
}

/// URLs collected during one run. Lives only in memory.
#[derive(Debug, Default, Clone)]
pub struct UploadSession {
    uploaded: Vec<(PathBuf, String)>,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the URL of a successful report; other outcomes are ignored.
    pub fn record(&mut self, report: &FileReport) {
        if let Some(url) = report.outcome.url() {
            self.uploaded.push((report.path.clone(), url.to_string()));
        }
    }

    pub fn urls(&self) -> Vec<&str> {
        self.uploaded.iter().map(|(_, url)| url.as_str()).collect()
    }

    /// `"<file name> - <url>"` per upload.
    pub fn display_lines(&self) -> Vec<String> {
        self.uploaded
            .iter()
            .map(|(path, url)| format!("{} - {}", display_name(path), url))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.uploaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uploaded.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.uploaded.iter().any(|(p, _)| p == path)
    }
}
