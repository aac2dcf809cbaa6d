//! Commands applied to the workspace.

use crate::model::{DateClass, Document, FetchError, RawDocument, SizeClass, SortKey};
use crate::state::PreviewSignal;

/// A discrete event applied atomically by [`crate::state::Workspace::dispatch`].
///
/// User intent and external completions share one type so the event loop
/// processes them strictly one after another.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Listing lifecycle
    /// A listing fetch was started; clears any previous fetch error.
    BeginFetch,
    /// The listing fetch returned raw records, in fetch order.
    FetchCompleted(Vec<RawDocument>),
    /// The listing fetch failed. Documents already loaded are kept.
    FetchFailed(FetchError),

    // Criteria
    /// Replace the search term.
    SetSearchTerm(String),
    /// Replace the size class.
    SetSizeClass(SizeClass),
    /// Replace the date class.
    SetDateClass(DateClass),
    /// Select a sort key, or flip direction if it is already active.
    ToggleSort(SortKey),

    // Selection
    /// The user picked a document.
    SelectDocument(Document),

    // Preview surface
    /// The preview surface finished loading a resource.
    PreviewLoaded(PreviewSignal),
}
