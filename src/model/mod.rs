//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod criteria;
pub mod document;
pub mod error;

// Re-export for convenience
pub use criteria::{DateClass, FilterCriteria, SizeClass, SortDir, SortKey};
pub use document::{
    normalize, normalize_listing, normalize_with_issues, Document, MalformedRecord, ModTime,
    NormalizedListing, RawDocument, RecordIssue,
};
pub use error::{AppError, FetchError};
