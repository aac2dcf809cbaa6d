//! Preview session tracking.
//!
//! Each selection of a new resource opens a [`PreviewSession`] in the pending
//! state. The preview surface reports back with a [`PreviewSignal`] once the
//! resource has loaded; signals from a superseded session are ignored.

use crate::state::Selection;
use std::fmt;
use tracing::debug;

/// Monotonic session identifier, unique per tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreviewSessionId(u64);

impl fmt::Display for PreviewSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "preview-{}", self.0)
    }
}

/// Load state of the preview for the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSession {
    id: PreviewSessionId,
    target_url: String,
    ready: bool,
}

impl PreviewSession {
    /// Session identifier.
    pub fn id(&self) -> PreviewSessionId {
        self.id
    }

    /// Resource url this session previews.
    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// True once the load signal for this session arrived.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The signal the preview surface fires once this session's resource loads.
    pub fn load_signal(&self) -> PreviewSignal {
        PreviewSignal {
            session: self.id,
            target_url: self.target_url.clone(),
        }
    }
}

/// "Content loaded" notification from the preview surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSignal {
    /// Session the surface was loading for.
    pub session: PreviewSessionId,
    /// Resource url the surface actually loaded.
    pub target_url: String,
}

/// What a signal did to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    /// Current session is now ready.
    Applied,
    /// Current session was already ready.
    AlreadyReady,
    /// Signal belongs to a superseded session.
    Stale,
    /// No session is open.
    NoSession,
}

/// Owns the current preview session and hands out session ids.
#[derive(Debug, Default)]
pub struct PreviewTracker {
    next_id: u64,
    current: Option<PreviewSession>,
}

impl PreviewTracker {
    /// Tracker with no open session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open session, if any.
    pub fn current(&self) -> Option<&PreviewSession> {
        self.current.as_ref()
    }

    /// Open a new pending session, discarding the current one.
    pub fn start(&mut self, target_url: impl Into<String>) -> PreviewSessionId {
        let id = PreviewSessionId(self.next_id);
        self.next_id += 1;
        let target_url = target_url.into();
        debug!(%id, target_url = %target_url, "Preview session started");
        self.current = Some(PreviewSession {
            id,
            target_url,
            ready: false,
        });
        id
    }

    /// Drop the current session, if any.
    pub fn clear(&mut self) {
        if let Some(session) = self.current.take() {
            debug!(id = %session.id, "Preview session discarded");
        }
    }

    /// Bring the tracker in line with the selection.
    ///
    /// A session is (re)started only when the selected url differs from the
    /// current target, so re-picking the document already on screen keeps its
    /// session. Returns `true` when a new session was started.
    pub fn follow(&mut self, selection: &Selection) -> bool {
        match selection.document() {
            None => {
                self.clear();
                false
            }
            Some(doc) => {
                let same_target = self
                    .current
                    .as_ref()
                    .is_some_and(|s| s.target_url == doc.url());
                if !same_target {
                    self.start(doc.url());
                }
                !same_target
            }
        }
    }

    /// Apply a "content loaded" signal.
    ///
    /// Only a signal whose session id and target url both match the current
    /// session has any effect.
    pub fn content_loaded(&mut self, signal: &PreviewSignal) -> SignalOutcome {
        let Some(session) = self.current.as_mut() else {
            debug!(session = %signal.session, "Preview signal with no open session ignored");
            return SignalOutcome::NoSession;
        };

        if session.id != signal.session || session.target_url != signal.target_url {
            debug!(
                session = %signal.session,
                current = %session.id,
                "Stale preview signal ignored"
            );
            return SignalOutcome::Stale;
        }

        if session.ready {
            SignalOutcome::AlreadyReady
        } else {
            session.ready = true;
            SignalOutcome::Applied
        }
    }
}

/// Absolute URL the preview surface should load for a document path.
pub fn resolve_preview_url(api_base: &str, url: &str) -> String {
    format!("{}{}", api_base.trim_end_matches('/'), url)
}
