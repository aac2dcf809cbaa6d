//! Filter/sort engine (pure).
//!
//! `visible = apply(documents, criteria, now)`. The result is a subset of
//! `documents`, ordered by a stable sort, and depends on nothing but the three
//! arguments. `now` is taken once per call so every document is aged against
//! the same instant.
//!
//! The engine recomputes from scratch on every call. That is fine for one
//! user's listing; very large collections would want incremental updates.

use crate::model::{DateClass, Document, FilterCriteria, ModTime, SizeClass, SortDir, SortKey};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Upper bound of `small`, inclusive (5000 KiB).
pub const SMALL_MAX_BYTES: u64 = 5_000 * 1024;

/// Upper bound of `medium`, inclusive (20000 KiB).
pub const MEDIUM_MAX_BYTES: u64 = 20_000 * 1024;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Filter and sort, returning references into `documents`.
pub fn apply<'a>(
    documents: &'a [Document],
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
) -> Vec<&'a Document> {
    visible_indices(documents, criteria, now)
        .into_iter()
        .map(|i| &documents[i])
        .collect()
}

/// Filter and sort, returning positions into `documents`.
pub fn visible_indices(
    documents: &[Document],
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
) -> Vec<usize> {
    let needle = criteria.search_term.to_lowercase();

    let mut indices: Vec<usize> = documents
        .iter()
        .enumerate()
        .filter(|(_, doc)| {
            matches_search(doc.name(), &needle)
                && size_admits(criteria.size_class, doc.size())
                && date_admits(criteria.date_class, doc.mod_time(), now)
        })
        .map(|(i, _)| i)
        .collect();

    // slice::sort_by is stable: ties keep input order in both directions
    indices.sort_by(|&a, &b| {
        let ordering = compare_by(criteria.sort_key, &documents[a], &documents[b]);
        match criteria.sort_dir {
            SortDir::Asc => ordering,
            SortDir::Desc => ordering.reverse(),
        }
    });

    indices
}

/// Case-insensitive substring match. `needle` must already be lowercase.
fn matches_search(name: &str, needle: &str) -> bool {
    needle.is_empty() || name.to_lowercase().contains(needle)
}

/// Size class membership. Boundaries belong to the lower class.
pub fn size_admits(class: SizeClass, size: u64) -> bool {
    match class {
        SizeClass::All => true,
        SizeClass::Small => size <= SMALL_MAX_BYTES,
        SizeClass::Medium => size > SMALL_MAX_BYTES && size <= MEDIUM_MAX_BYTES,
        SizeClass::Large => size > MEDIUM_MAX_BYTES,
    }
}

/// Date class membership for a document aged against `now`.
pub fn date_admits(class: DateClass, mod_time: ModTime, now: DateTime<Utc>) -> bool {
    if class == DateClass::All {
        return true;
    }
    let days = age_in_days(mod_time, now);
    match class {
        DateClass::All => true,
        DateClass::Last7 => days <= 7.0,
        DateClass::Last30 => days <= 30.0,
        DateClass::Older => days > 30.0,
    }
}

/// `(now - mod_time)` in fractional days, at millisecond resolution.
///
/// Negative for future-dated documents. An invalid instant is the lowest
/// possible time, hence infinitely old.
pub fn age_in_days(mod_time: ModTime, now: DateTime<Utc>) -> f64 {
    match mod_time {
        ModTime::Invalid => f64::INFINITY,
        ModTime::At(instant) => {
            now.signed_duration_since(instant).num_milliseconds() as f64 / MILLIS_PER_DAY
        }
    }
}

fn compare_by(key: SortKey, a: &Document, b: &Document) -> Ordering {
    match key {
        SortKey::Name => a
            .name()
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(b.name().chars().flat_map(char::to_lowercase)),
        SortKey::Size => a.size().cmp(&b.size()),
        SortKey::ModTime => a.mod_time().cmp(&b.mod_time()),
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
