//! Selection state machine.
//!
//! Selection is a sum type with two states:
//! - Empty: nothing selected
//! - Selected: exactly one document targeted for preview
//!
//! `reconcile` is the only transition function. There is no explicit
//! deselect; `Empty` is reached from an empty fetch or when the visible
//! set runs dry.

use crate::model::Document;

// ===== Selection =====

/// Current selection. Sum type enforces at most one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    /// Nothing selected.
    #[default]
    Empty,
    /// One document selected.
    Selected(Document),
}

impl Selection {
    /// The selected document, if any.
    pub fn document(&self) -> Option<&Document> {
        match self {
            Selection::Empty => None,
            Selection::Selected(doc) => Some(doc),
        }
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Empty)
    }
}

// ===== SelectionEvent =====

/// Inputs that can move the selection.
#[derive(Debug, Clone)]
pub enum SelectionEvent<'a> {
    /// A fetch finished; carries the unfiltered canonical collection in
    /// fetch order.
    FetchCompleted(&'a [Document]),
    /// The user picked a document from the visible list.
    UserPicked(Document),
    /// The filter/sort engine produced a new visible collection.
    VisibleSetChanged(&'a [&'a Document]),
}

// ===== Transitions =====

/// Apply one event to the selection.
///
/// - `FetchCompleted`: first document of the raw fetch order, or `Empty`.
/// - `UserPicked`: the picked document, re-normalized.
/// - `VisibleSetChanged`: keep the selection while any visible document
///   shares its url or its name; otherwise fall back to the first visible
///   document, or `Empty`.
pub fn reconcile(state: Selection, event: SelectionEvent<'_>) -> Selection {
    match event {
        SelectionEvent::FetchCompleted(documents) => documents
            .first()
            .cloned()
            .map_or(Selection::Empty, Selection::Selected),

        SelectionEvent::UserPicked(doc) => Selection::Selected(doc.normalized()),

        SelectionEvent::VisibleSetChanged(visible) => match state {
            Selection::Empty => Selection::Empty,
            Selection::Selected(current) => {
                if is_present(&current, visible) {
                    Selection::Selected(current)
                } else {
                    visible
                        .first()
                        .map(|doc| Selection::Selected((*doc).clone()))
                        .unwrap_or(Selection::Empty)
                }
            }
        },
    }
}

/// Url OR name match. Either key alone keeps the selection, which tolerates
/// url/name pairs drifting between fetches.
fn is_present(current: &Document, visible: &[&Document]) -> bool {
    visible
        .iter()
        .any(|doc| doc.url() == current.url() || doc.name() == current.name())
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod tests;
