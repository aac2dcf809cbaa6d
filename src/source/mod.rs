//! Listing sources.
//!
//! A listing is fetched fire-and-forget on a background thread that reports
//! back with a [`Command`]:
//! - HTTP listing endpoint (the listing server)
//! - Local directory of PDF files
//! - Unified [`ListingSource`] enum for both

use crate::config::ResolvedConfig;
use crate::model::{FetchError, RawDocument};
use crate::state::{resolve_preview_url, Command};
use serde_json::Value;
use std::io::Read;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

pub mod directory;
pub mod http;

pub use directory::DirectoryListing;
pub use http::{listing_url, HttpListing};

/// Where the document listing comes from.
///
/// Sum type enforces exactly one variant.
#[derive(Debug, Clone)]
pub enum ListingSource {
    /// `GET` against the listing endpoint.
    Http(HttpListing),
    /// Scan of a local directory.
    Directory(DirectoryListing),
}

impl ListingSource {
    /// Pick the source named by the resolved configuration.
    ///
    /// A configured directory wins over the HTTP endpoint.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        match &config.directory {
            Some(dir) => ListingSource::Directory(DirectoryListing::new(dir)),
            None => ListingSource::Http(HttpListing::new(
                &config.api_base,
                &config.listing_path,
                Duration::from_secs(config.request_timeout_secs),
            )),
        }
    }

    /// URL or path the listing is read from.
    pub fn origin(&self) -> String {
        match self {
            ListingSource::Http(h) => h.url().to_string(),
            ListingSource::Directory(d) => d.path().display().to_string(),
        }
    }

    /// Where the preview surface should load the document at `url` from.
    ///
    /// HTTP listings resolve against the API base; directory listings map
    /// back to the local file.
    pub fn preview_location(&self, url: &str) -> String {
        match self {
            ListingSource::Http(h) => resolve_preview_url(h.api_base(), url),
            ListingSource::Directory(d) => d.file_for_url(url).display().to_string(),
        }
    }

    /// Fetch the listing, blocking the calling thread.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` for any non-success response, transport failure,
    /// undecodable body or unreadable directory.
    pub fn fetch(&self) -> Result<Vec<RawDocument>, FetchError> {
        match self {
            ListingSource::Http(h) => h.fetch(),
            ListingSource::Directory(d) => d.fetch(),
        }
    }
}

/// Decode a listing body into raw records.
///
/// A `null` body is an empty listing. Elements that are not JSON objects are
/// skipped with a warning; the rest of the listing is kept.
///
/// # Errors
///
/// Returns `FetchError::Decode` when the body is neither an array nor `null`.
pub fn decode_listing<R: Read>(reader: R, origin: &str) -> Result<Vec<RawDocument>, FetchError> {
    let values: Option<Vec<Value>> =
        serde_json::from_reader(reader).map_err(|e| FetchError::Decode {
            origin: origin.to_string(),
            reason: e.to_string(),
        })?;

    let values = values.unwrap_or_default();
    let mut raws = Vec::with_capacity(values.len());
    for (index, value) in values.iter().enumerate() {
        match RawDocument::from_value(value) {
            Some(raw) => raws.push(raw),
            None => warn!(index, origin, "Skipping listing entry that is not an object"),
        }
    }
    Ok(raws)
}

/// Run `source.fetch()` on a background thread.
///
/// The outcome is sent as `Command::FetchCompleted` or `Command::FetchFailed`
/// converted into the event loop's event type. A closed receiver is not an
/// error: the result is simply dropped.
pub fn spawn_fetch<E>(source: ListingSource, tx: Sender<E>) -> JoinHandle<()>
where
    E: From<Command> + Send + 'static,
{
    thread::spawn(move || {
        let command = match source.fetch() {
            Ok(raws) => Command::FetchCompleted(raws),
            Err(err) => Command::FetchFailed(err),
        };
        if tx.send(E::from(command)).is_err() {
            debug!(origin = %source.origin(), "Listing receiver gone, dropping fetch result");
        }
    })
}
