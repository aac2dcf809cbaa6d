//! Plain-text listing table.

use crate::model::{Document, SortDir};
use crate::state::Workspace;
use std::fmt::Write;

/// Column header for the name column.
const NAME_HEADER: &str = "NAME";

/// Render the visible collection as a numbered table.
///
/// Row numbers are 1-based positions in the visible list, matching the
/// shell's `select <n>` command. The selected row is marked with `>`.
pub fn render_listing(ws: &Workspace) -> String {
    let rows = ws.visible();
    let criteria = ws.criteria();

    let name_width = rows
        .iter()
        .map(|d| d.name().chars().count())
        .max()
        .unwrap_or(0)
        .max(NAME_HEADER.len());
    let index_width = rows.len().to_string().len();

    let mut out = String::new();
    let _ = writeln!(out, "{}", sort_header(criteria.sort_key.as_str(), criteria.sort_dir));
    let _ = writeln!(
        out,
        "  {:>index_width$}  {:<name_width$}  {:>10}  {}",
        "#", NAME_HEADER, "SIZE (MB)", "MODIFIED (UTC)"
    );

    for (i, doc) in rows.iter().enumerate() {
        let marker = if ws.is_selected(doc) { '>' } else { ' ' };
        let _ = writeln!(out, "{marker} {}", row(i + 1, doc, index_width, name_width));
    }
    out
}

/// `Sort: size ↑`-style header showing the active key and direction.
pub fn sort_header(key: &str, dir: SortDir) -> String {
    let arrow = match dir {
        SortDir::Asc => '↑',
        SortDir::Desc => '↓',
    };
    format!("Sort: {key} {arrow}")
}

/// Bytes as megabytes with two decimals.
pub fn format_size_mb(size: u64) -> String {
    format!("{:.2}", size as f64 / (1024.0 * 1024.0))
}

fn row(position: usize, doc: &Document, index_width: usize, name_width: usize) -> String {
    format!(
        "{position:>index_width$}  {:<name_width$}  {:>10}  {}",
        doc.name(),
        format_size_mb(doc.size()),
        doc.mod_time()
    )
}

#[cfg(test)]
#[path = "listing_tests.rs"]
mod tests;
