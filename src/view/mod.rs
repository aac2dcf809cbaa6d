//! Plain-text rendering of the workspace (pure).
//!
//! Everything here maps workspace state to strings; writing them is left to
//! the shell.

mod listing;
mod status;

pub use listing::{format_size_mb, render_listing, sort_header};
pub use status::render_status;

use crate::state::Workspace;

/// Listing table followed by its status lines.
pub fn render(ws: &Workspace) -> String {
    let mut out = render_listing(ws);
    for line in render_status(ws) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}
