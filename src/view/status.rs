//! Status lines shown under the listing.

use crate::state::{ListingState, Workspace};

/// Status lines for the listing load state, filter result and preview.
///
/// Returns one line per applicable condition, in display order.
pub fn render_status(ws: &Workspace) -> Vec<String> {
    let mut lines = Vec::new();

    match ws.listing() {
        ListingState::Idle => lines.push("No listing loaded.".to_string()),
        ListingState::Loading => lines.push("Loading listing...".to_string()),
        ListingState::Failed(err) => lines.push(format!("Error: {err}")),
        ListingState::Loaded { .. } => {}
    }

    if !ws.documents().is_empty() && ws.visible_len() == 0 {
        lines.push("No documents match the current filters.".to_string());
    } else if matches!(ws.listing(), ListingState::Loaded { count: 0 }) {
        lines.push("The listing is empty.".to_string());
    }

    if !ws.malformed().is_empty() {
        lines.push(format!(
            "{} malformed record(s) normalized, see log for details.",
            ws.malformed().len()
        ));
    }

    lines.push(match ws.preview() {
        None => "Preview: none".to_string(),
        Some(session) if session.is_ready() => format!("Preview: {} (ready)", session.target_url()),
        Some(session) => format!("Preview: {} (loading)", session.target_url()),
    });

    lines
}
