//! Canonical document records and the listing normalizer.
//!
//! Raw listing entries arrive with loosely typed fields. `normalize` turns
//! each one into a [`Document`] without ever failing: defects are recorded
//! as [`RecordIssue`]s so a single bad timestamp never loses the rest of
//! the collection.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::fmt;
use tracing::warn;

// Listing keys, camelCase form. Exported-struct spellings (`Name`, `URL`, ...)
// are matched case-insensitively.
const KEY_NAME: &str = "name";
const KEY_SIZE: &str = "size";
const KEY_MOD_TIME: &str = "modTime";
const KEY_URL: &str = "url";

// ===== ModTime =====

/// Modification instant of a document.
///
/// `Invalid` stands in for any timestamp that could not be parsed. The
/// derived ordering places it below every valid instant, so it sorts as
/// the lowest possible time, and the date filter treats it as infinitely old.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModTime {
    /// Source timestamp was missing or unparseable.
    Invalid,
    /// A valid instant.
    At(DateTime<Utc>),
}

impl ModTime {
    /// The instant, if valid.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            ModTime::Invalid => None,
            ModTime::At(instant) => Some(*instant),
        }
    }

    /// True unless the source timestamp was missing or unparseable.
    pub fn is_valid(&self) -> bool {
        matches!(self, ModTime::At(_))
    }
}

impl From<DateTime<Utc>> for ModTime {
    fn from(instant: DateTime<Utc>) -> Self {
        ModTime::At(instant)
    }
}

impl fmt::Display for ModTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModTime::Invalid => write!(f, "unknown"),
            ModTime::At(instant) => write!(f, "{}", instant.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

// ===== Document =====

/// Canonical document record.
///
/// The constructor normalizes `url`, so every `Document` in existence
/// already has a slash-prefixed resource path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Document {
    name: String,
    url: String,
    size: u64,
    mod_time: ModTime,
}

impl Document {
    /// Smart constructor: prefixes `url` with `/` when missing.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        size: u64,
        mod_time: impl Into<ModTime>,
    ) -> Self {
        Self {
            name: name.into(),
            url: normalize_url(url.into()),
            size,
            mod_time: mod_time.into(),
        }
    }

    /// Display name, used for search and the name column.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical resource path, always starting with `/`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Last modification time.
    pub fn mod_time(&self) -> ModTime {
        self.mod_time
    }

    /// Re-apply normalization. Identity on any `Document`.
    pub fn normalized(self) -> Self {
        Self {
            url: normalize_url(self.url),
            ..self
        }
    }
}

/// Prefix a resource path with `/` unless it already has one.
pub fn normalize_url(url: String) -> String {
    if url.starts_with('/') {
        url
    } else {
        format!("/{url}")
    }
}

// ===== RawDocument =====

/// A listing entry before normalization.
///
/// Every field is optional; `size` and `mod_time` keep their raw JSON
/// value since listings send them as numbers or strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDocument {
    /// File name.
    pub name: Option<String>,
    /// Byte count, as a number or numeric string.
    pub size: Option<Value>,
    /// Timestamp text or epoch milliseconds.
    pub mod_time: Option<Value>,
    /// Resource path, with or without a leading slash.
    pub url: Option<String>,
}

impl RawDocument {
    /// Extract a raw record from one listing element.
    ///
    /// Returns `None` when the element is not a JSON object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            name: lookup(object, KEY_NAME).and_then(text_of),
            size: lookup(object, KEY_SIZE).filter(|v| !v.is_null()).cloned(),
            mod_time: lookup(object, KEY_MOD_TIME)
                .filter(|v| !v.is_null())
                .cloned(),
            url: lookup(object, KEY_URL).and_then(text_of),
        })
    }
}

impl From<&Document> for RawDocument {
    fn from(doc: &Document) -> Self {
        Self {
            name: Some(doc.name.clone()),
            size: Some(Value::from(doc.size)),
            mod_time: doc.mod_time.instant().map(timestamp_value),
            url: Some(doc.url.clone()),
        }
    }
}

/// RFC 3339 only covers four-digit years; anything outside came from epoch
/// millis and is written back as a whole-millisecond number.
fn timestamp_value(t: DateTime<Utc>) -> Value {
    if (0..=9999).contains(&t.year()) {
        Value::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    } else {
        Value::from(t.timestamp_millis())
    }
}

/// Exact key first, then a case-insensitive match (`URL`, `ModTime`, ...).
fn lookup<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).or_else(|| {
        object
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

fn text_of(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

// ===== Malformed records =====

/// A single defect found while normalizing a raw record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordIssue {
    /// No `name` field; the document gets an empty name.
    #[error("missing name")]
    MissingName,

    /// No `size` field.
    #[error("missing size, using 0")]
    MissingSize,

    /// Negative, non-finite or non-numeric `size`.
    #[error("invalid size '{raw}', using 0")]
    InvalidSize {
        /// The rejected value as it appeared in the listing.
        raw: String,
    },

    /// No `modTime` field.
    #[error("missing modTime, treating as unknown")]
    MissingModTime,

    /// `modTime` in none of the accepted forms.
    #[error("unparseable modTime '{raw}', treating as unknown")]
    InvalidModTime {
        /// The rejected value as it appeared in the listing.
        raw: String,
    },

    /// No `url` field.
    #[error("missing url, derived from name")]
    MissingUrl,
}

/// Report for a record that needed defensive normalization.
///
/// The record itself is never dropped; this only tells the caller what
/// was patched up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    index: usize,
    name: String,
    issues: Vec<RecordIssue>,
}

impl MalformedRecord {
    /// Position of the record in the raw listing (0-indexed).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Name of the normalized document, possibly empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Defects found, in field order.
    pub fn issues(&self) -> &[RecordIssue] {
        &self.issues
    }
}

/// Result of normalizing a whole listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedListing {
    /// One document per raw record, in listing order.
    pub documents: Vec<Document>,
    /// Records that needed patching, in listing order.
    pub malformed: Vec<MalformedRecord>,
}

// ===== Normalizer =====

/// Convert a raw record into a canonical document.
pub fn normalize(raw: &RawDocument) -> Document {
    normalize_with_issues(raw).0
}

/// Convert a raw record, also returning every defect that was patched.
pub fn normalize_with_issues(raw: &RawDocument) -> (Document, Vec<RecordIssue>) {
    let mut issues = Vec::new();

    let name = match &raw.name {
        Some(name) if !name.is_empty() => name.clone(),
        _ => {
            issues.push(RecordIssue::MissingName);
            String::new()
        }
    };

    let size = match &raw.size {
        None => {
            issues.push(RecordIssue::MissingSize);
            0
        }
        Some(value) => parse_size(value).unwrap_or_else(|| {
            issues.push(RecordIssue::InvalidSize {
                raw: raw_text(value),
            });
            0
        }),
    };

    let mod_time = match &raw.mod_time {
        None => {
            issues.push(RecordIssue::MissingModTime);
            ModTime::Invalid
        }
        Some(value) => {
            let parsed = parse_mod_time(value);
            if !parsed.is_valid() {
                issues.push(RecordIssue::InvalidModTime {
                    raw: raw_text(value),
                });
            }
            parsed
        }
    };

    let url = match &raw.url {
        Some(url) => url.clone(),
        None => {
            issues.push(RecordIssue::MissingUrl);
            name.clone()
        }
    };

    (Document::new(name, url, size, mod_time), issues)
}

/// Normalize every record of a listing, in order.
///
/// Malformed records are kept and reported, and each one is logged.
pub fn normalize_listing(raws: &[RawDocument]) -> NormalizedListing {
    let mut listing = NormalizedListing {
        documents: Vec::with_capacity(raws.len()),
        malformed: Vec::new(),
    };

    for (index, raw) in raws.iter().enumerate() {
        let (document, issues) = normalize_with_issues(raw);
        if !issues.is_empty() {
            warn!(
                index,
                name = document.name(),
                issues = ?issues,
                "Normalized malformed listing record"
            );
            listing.malformed.push(MalformedRecord {
                index,
                name: document.name().to_owned(),
                issues,
            });
        }
        listing.documents.push(document);
    }

    listing
}

/// Parse a byte count. Negative, non-finite and non-numeric values are rejected;
/// fractional values truncate. Numeric strings parse the same way as numbers.
fn parse_size(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            })
        }
        _ => None,
    }
}

/// Parse a listing timestamp.
///
/// Strings: RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD` (UTC), or
/// integer epoch milliseconds. Numbers are epoch milliseconds.
pub fn parse_mod_time(value: &Value) -> ModTime {
    let instant = match value {
        Value::String(s) => parse_timestamp_text(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    };
    instant.map_or(ModTime::Invalid, ModTime::At)
}

/// Offset-free date-times, all taken as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

fn parse_timestamp_text(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Some(t.and_utc());
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
    }
    s.parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
