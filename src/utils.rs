use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::consts::BYTES_PER_MB;

/// File name for display, falling back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn format_size(bytes: u64) -> String {
    if bytes >= BYTES_PER_MB && bytes % BYTES_PER_MB == 0 {
        format!("{} MB", bytes / BYTES_PER_MB)
    } else if bytes >= BYTES_PER_MB {
        format!("{:.1} MB", bytes as f64 / BYTES_PER_MB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Cuts `text` to at most `max` bytes on a char boundary.
pub fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Expands directories into the regular files they contain, sorted by path.
/// Plain paths are passed through untouched, even if they do not exist.
pub fn collect_files(paths: &[PathBuf], recursive: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", path.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();
        found.sort();
        files.extend(found);
    }

    files
}
