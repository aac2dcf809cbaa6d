//! Local directory listing.
//!
//! Produces the same raw records the listing server sends, so a directory
//! of PDFs can be browsed without running the server.

use crate::model::{FetchError, RawDocument};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// URL prefix under which the listing server exposes files.
pub const URL_PREFIX: &str = "/pdfs/";

/// Scans one directory (non-recursively) for `.pdf` files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    path: PathBuf,
}

impl DirectoryListing {
    /// Listing over `path`. Nothing is read until [`Self::fetch`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Scanned directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Local file behind a document url produced by [`Self::fetch`].
    pub fn file_for_url(&self, url: &str) -> PathBuf {
        let name = url.strip_prefix(URL_PREFIX).unwrap_or(url).trim_start_matches('/');
        self.path.join(name)
    }

    /// List regular files whose extension is exactly `pdf`, sorted by name.
    ///
    /// Entries whose name is not UTF-8 or whose metadata cannot be read are
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Directory` if the directory itself cannot be read.
    pub fn fetch(&self) -> Result<Vec<RawDocument>, FetchError> {
        let entries = fs::read_dir(&self.path).map_err(|e| FetchError::Directory {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let mut found: Vec<(String, fs::Metadata)> = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(dir = %self.path.display(), error = %err, "Skipping unreadable entry");
                    continue;
                }
            };

            let Ok(name) = entry.file_name().into_string() else {
                warn!(dir = %self.path.display(), "Skipping entry with non UTF-8 name");
                continue;
            };
            if !has_pdf_extension(&name) {
                continue;
            }

            // Follows symlinks, like the listing server does
            match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_dir() => continue,
                Ok(meta) => found.push((name, meta)),
                Err(err) => {
                    warn!(file = %name, error = %err, "Skipping entry without metadata");
                }
            }
        }

        found.sort_by(|a, b| a.0.cmp(&b.0));
        debug!(dir = %self.path.display(), count = found.len(), "Directory listed");

        Ok(found
            .into_iter()
            .map(|(name, meta)| raw_record(name, &meta))
            .collect())
    }
}

/// `true` when the text after the last `.` is exactly `pdf`.
fn has_pdf_extension(name: &str) -> bool {
    matches!(name.rsplit_once('.'), Some((_, "pdf")))
}

fn raw_record(name: String, meta: &fs::Metadata) -> RawDocument {
    let mod_time = meta.modified().ok().map(|t| {
        let t: DateTime<Utc> = t.into();
        Value::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    });

    RawDocument {
        url: Some(format!("{URL_PREFIX}{name}")),
        size: Some(Value::from(meta.len())),
        mod_time,
        name: Some(name),
    }
}
