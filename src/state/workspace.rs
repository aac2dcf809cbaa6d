//! Workspace state and transitions.
//!
//! `Workspace` is the root state type. It owns the canonical collection, the
//! criteria, the derived visible collection, the selection and the preview
//! tracker, and keeps them consistent after every command.
//!
//! # Recomputation chain
//!
//! Every command that touches documents or criteria re-runs the pipeline:
//!
//! ```text
//! canonical collection + criteria + now
//!     → filter::visible_indices      (visible collection)
//!     → selection::reconcile         (VisibleSetChanged, only if the view changed)
//!     → PreviewTracker::follow       (new session if the target changed)
//! ```
//!
//! Nothing is cached between runs besides the previous visible indices, which
//! are only used to tell whether the view changed.

use crate::filter;
use crate::model::{
    normalize_listing, DateClass, Document, FetchError, FilterCriteria, MalformedRecord,
    SizeClass, SortKey,
};
use crate::state::{
    reconcile, Command, PreviewSession, PreviewSignal, PreviewTracker, Selection,
    SelectionEvent, SignalOutcome,
};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

// ===== Clock =====

/// Source of "now" for date filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    /// Wall clock.
    #[default]
    System,
    /// A fixed instant, for deterministic views.
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Current instant per this clock.
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(instant) => *instant,
        }
    }
}

// ===== ListingState =====

/// Load state of the document listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListingState {
    /// No fetch attempted yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Loaded {
        /// Documents in the canonical collection.
        count: usize,
    },
    /// The last fetch failed. Persists until the next fetch begins.
    Failed(FetchError),
}

// ===== Workspace =====

/// Root state: canonical collection, criteria, visible view, selection and preview.
#[derive(Debug)]
pub struct Workspace {
    /// Canonical collection, replaced wholesale per fetch.
    documents: Vec<Document>,
    /// Records that needed defensive normalization in the last fetch.
    malformed: Vec<MalformedRecord>,
    criteria: FilterCriteria,
    /// Positions into `documents`, in display order.
    visible: Vec<usize>,
    selection: Selection,
    preview: PreviewTracker,
    listing: ListingState,
    clock: Clock,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(Clock::System)
    }
}

impl Workspace {
    /// Empty workspace with default criteria.
    pub fn new(clock: Clock) -> Self {
        Self {
            documents: Vec::new(),
            malformed: Vec::new(),
            criteria: FilterCriteria::default(),
            visible: Vec::new(),
            selection: Selection::Empty,
            preview: PreviewTracker::new(),
            listing: ListingState::Idle,
            clock,
        }
    }

    /// Start from non-default criteria (e.g. CLI flags).
    pub fn with_criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = criteria;
        self.recompute(true);
        self
    }

    // ===== Accessors =====

    /// Canonical collection in fetch order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Defect reports from the last fetch.
    pub fn malformed(&self) -> &[MalformedRecord] {
        &self.malformed
    }

    /// Active criteria.
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Visible collection, filtered and sorted.
    pub fn visible(&self) -> Vec<&Document> {
        self.visible.iter().map(|&i| &self.documents[i]).collect()
    }

    /// Number of visible documents.
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Current selection state.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected document, if any.
    pub fn selected(&self) -> Option<&Document> {
        self.selection.document()
    }

    /// Whether `doc` is the highlighted row. Rows are matched by name.
    pub fn is_selected(&self, doc: &Document) -> bool {
        self.selected().is_some_and(|s| s.name() == doc.name())
    }

    /// Preview session following the selection.
    pub fn preview(&self) -> Option<&PreviewSession> {
        self.preview.current()
    }

    /// Load state of the listing.
    pub fn listing(&self) -> &ListingState {
        &self.listing
    }

    // ===== User operations =====

    /// Replace the search term.
    pub fn set_search_term(&mut self, text: impl Into<String>) {
        self.dispatch(Command::SetSearchTerm(text.into()));
    }

    /// Replace the size class.
    pub fn set_size_class(&mut self, class: SizeClass) {
        self.dispatch(Command::SetSizeClass(class));
    }

    /// Replace the date class.
    pub fn set_date_class(&mut self, class: DateClass) {
        self.dispatch(Command::SetDateClass(class));
    }

    /// Toggle the sort column; see [`FilterCriteria::toggle_sort`].
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.dispatch(Command::ToggleSort(key));
    }

    /// Pick a document explicitly.
    pub fn select_document(&mut self, doc: Document) {
        self.dispatch(Command::SelectDocument(doc));
    }

    /// Apply a preview "content loaded" signal, reporting what it did.
    pub fn preview_loaded(&mut self, signal: &PreviewSignal) -> SignalOutcome {
        self.preview.content_loaded(signal)
    }

    // ===== Dispatch =====

    /// Apply one command and run the recomputation chain.
    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::BeginFetch => {
                info!("Listing fetch started");
                self.listing = ListingState::Loading;
            }

            Command::FetchCompleted(raws) => {
                let listing = normalize_listing(&raws);
                info!(
                    count = listing.documents.len(),
                    malformed = listing.malformed.len(),
                    "Listing fetch completed"
                );
                self.documents = listing.documents;
                self.malformed = listing.malformed;
                self.listing = ListingState::Loaded {
                    count: self.documents.len(),
                };
                // Initial pick uses fetch order, not the filtered view
                self.selection = reconcile(
                    std::mem::take(&mut self.selection),
                    SelectionEvent::FetchCompleted(&self.documents),
                );
                self.recompute(true);
            }

            Command::FetchFailed(err) => {
                error!(error = %err, "Listing fetch failed");
                self.listing = ListingState::Failed(err);
            }

            Command::SetSearchTerm(text) => {
                self.criteria.search_term = text;
                self.recompute(false);
            }

            Command::SetSizeClass(class) => {
                self.criteria.size_class = class;
                self.recompute(false);
            }

            Command::SetDateClass(class) => {
                self.criteria.date_class = class;
                self.recompute(false);
            }

            Command::ToggleSort(key) => {
                self.criteria.toggle_sort(key);
                self.recompute(false);
            }

            Command::SelectDocument(doc) => {
                self.selection = reconcile(
                    std::mem::take(&mut self.selection),
                    SelectionEvent::UserPicked(doc),
                );
                self.preview.follow(&self.selection);
            }

            Command::PreviewLoaded(signal) => {
                self.preview.content_loaded(&signal);
            }
        }
    }

    /// Re-derive the visible collection and reconcile selection and preview.
    ///
    /// The selection is reconciled only when the view actually changed, or
    /// unconditionally when `documents_replaced` is set.
    fn recompute(&mut self, documents_replaced: bool) {
        let visible = filter::visible_indices(&self.documents, &self.criteria, self.clock.now());
        let changed = documents_replaced || visible != self.visible;
        self.visible = visible;

        if changed {
            debug!(
                visible = self.visible.len(),
                total = self.documents.len(),
                "Visible set changed"
            );
            let view: Vec<&Document> = self.visible.iter().map(|&i| &self.documents[i]).collect();
            self.selection = reconcile(
                std::mem::take(&mut self.selection),
                SelectionEvent::VisibleSetChanged(&view),
            );
        }

        self.preview.follow(&self.selection);
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
