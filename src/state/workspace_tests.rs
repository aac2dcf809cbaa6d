//! Tests for workspace dispatch and the recomputation chain.

use super::*;
use crate::model::{ModTime, RawDocument, SortDir};
use chrono::{Duration, TimeZone};
use serde_json::json;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
        .single()
        .expect("valid date")
}

fn raw(name: &str, size: u64, age_days: i64) -> RawDocument {
    RawDocument::from_value(&json!({
        "name": name,
        "size": size,
        "modTime": (now() - Duration::days(age_days)).to_rfc3339(),
        "url": format!("pdfs/{name}"),
    }))
    .expect("object")
}

/// Three documents in fetch order: a (new, small), b (mid, medium), c (old, large).
fn loaded() -> Workspace {
    let mut ws = Workspace::new(Clock::Fixed(now()));
    ws.dispatch(Command::BeginFetch);
    ws.dispatch(Command::FetchCompleted(vec![
        raw("a.pdf", 1024, 1),
        raw("b.pdf", 6_000 * 1024, 10),
        raw("c.pdf", 30_000 * 1024, 60),
    ]));
    ws
}

fn visible_names(ws: &Workspace) -> Vec<String> {
    ws.visible().iter().map(|d| d.name().to_string()).collect()
}

fn selected_name(ws: &Workspace) -> Option<String> {
    ws.selected().map(|d| d.name().to_string())
}

// ===== listing lifecycle =====

#[test]
fn new_workspace_is_idle_and_empty() {
    let ws = Workspace::new(Clock::Fixed(now()));
    assert_eq!(ws.listing(), &ListingState::Idle);
    assert!(ws.visible().is_empty());
    assert!(ws.selection().is_empty());
    assert!(ws.preview().is_none());
}

#[test]
fn begin_fetch_marks_loading() {
    let mut ws = Workspace::new(Clock::Fixed(now()));
    ws.dispatch(Command::BeginFetch);
    assert_eq!(ws.listing(), &ListingState::Loading);
}

#[test]
fn fetch_completion_normalizes_and_selects_first_raw_document() {
    let ws = loaded();
    assert_eq!(ws.listing(), &ListingState::Loaded { count: 3 });
    assert_eq!(ws.documents()[0].url(), "/pdfs/a.pdf");
    assert_eq!(selected_name(&ws), Some("a.pdf".to_string()));
    // default sort: newest first
    assert_eq!(visible_names(&ws), vec!["a.pdf", "b.pdf", "c.pdf"]);
}

#[test]
fn initial_selection_uses_fetch_order_not_view_order() {
    let mut ws = Workspace::new(Clock::Fixed(now()));
    ws.dispatch(Command::FetchCompleted(vec![
        raw("old.pdf", 1, 20),
        raw("new.pdf", 1, 1),
    ]));
    assert_eq!(visible_names(&ws), vec!["new.pdf", "old.pdf"]);
    assert_eq!(selected_name(&ws), Some("old.pdf".to_string()));
}

#[test]
fn initial_selection_hidden_by_active_filter_falls_back() {
    let criteria = FilterCriteria {
        date_class: DateClass::Last7,
        ..FilterCriteria::default()
    };
    let mut ws = Workspace::new(Clock::Fixed(now())).with_criteria(criteria);
    ws.dispatch(Command::FetchCompleted(vec![
        raw("old.pdf", 1, 20),
        raw("new.pdf", 1, 1),
    ]));
    assert_eq!(selected_name(&ws), Some("new.pdf".to_string()));
}

#[test]
fn empty_fetch_leaves_nothing_selected() {
    let mut ws = Workspace::new(Clock::Fixed(now()));
    ws.dispatch(Command::FetchCompleted(Vec::new()));
    assert_eq!(ws.listing(), &ListingState::Loaded { count: 0 });
    assert!(ws.selection().is_empty());
    assert!(ws.preview().is_none());
}

#[test]
fn fetch_failure_keeps_existing_documents() {
    let mut ws = loaded();
    let err = FetchError::Status {
        url: "http://localhost:8080/api/pdfs".to_string(),
        status: 503,
    };
    ws.dispatch(Command::BeginFetch);
    ws.dispatch(Command::FetchFailed(err.clone()));

    assert_eq!(ws.listing(), &ListingState::Failed(err));
    assert_eq!(ws.documents().len(), 3);
    assert_eq!(selected_name(&ws), Some("a.pdf".to_string()));
}

#[test]
fn failure_persists_until_next_fetch_begins() {
    let mut ws = Workspace::new(Clock::Fixed(now()));
    ws.dispatch(Command::FetchFailed(FetchError::Transport {
        url: "http://x".to_string(),
        reason: "refused".to_string(),
    }));
    ws.set_search_term("anything");
    assert!(matches!(ws.listing(), ListingState::Failed(_)));

    ws.dispatch(Command::BeginFetch);
    assert_eq!(ws.listing(), &ListingState::Loading);
}

#[test]
fn refetch_replaces_collection_wholesale() {
    let mut ws = loaded();
    ws.dispatch(Command::FetchCompleted(vec![raw("z.pdf", 1, 1)]));
    assert_eq!(ws.documents().len(), 1);
    assert_eq!(visible_names(&ws), vec!["z.pdf"]);
    assert_eq!(selected_name(&ws), Some("z.pdf".to_string()));
}

#[test]
fn malformed_records_are_kept_and_reported() {
    let mut ws = Workspace::new(Clock::Fixed(now()));
    let bad = RawDocument::from_value(&json!({
        "name": "bad.pdf", "size": 1, "modTime": "garbage", "url": "bad.pdf"
    }))
    .expect("object");
    ws.dispatch(Command::FetchCompleted(vec![raw("good.pdf", 1, 1), bad]));

    assert_eq!(ws.documents().len(), 2);
    assert_eq!(ws.malformed().len(), 1);
    assert_eq!(ws.documents()[1].mod_time(), ModTime::Invalid);
}

// ===== criteria operations =====

#[test]
fn set_size_class_filters_view() {
    let mut ws = loaded();
    ws.set_size_class(SizeClass::Medium);
    assert_eq!(visible_names(&ws), vec!["b.pdf"]);
    assert_eq!(ws.visible_len(), 1);
}

#[test]
fn set_date_class_filters_view() {
    let mut ws = loaded();
    ws.set_date_class(DateClass::Older);
    assert_eq!(visible_names(&ws), vec!["c.pdf"]);
}

#[test]
fn set_search_term_filters_view() {
    let mut ws = loaded();
    ws.set_search_term("B.P");
    assert_eq!(visible_names(&ws), vec!["b.pdf"]);
}

#[test]
fn toggle_sort_from_default_goes_ascending_then_descending() {
    let mut ws = loaded();
    ws.toggle_sort(SortKey::Size);
    assert_eq!(ws.criteria().sort_key, SortKey::Size);
    assert_eq!(ws.criteria().sort_dir, SortDir::Asc);
    assert_eq!(visible_names(&ws), vec!["a.pdf", "b.pdf", "c.pdf"]);

    ws.toggle_sort(SortKey::Size);
    assert_eq!(ws.criteria().sort_dir, SortDir::Desc);
    assert_eq!(visible_names(&ws), vec!["c.pdf", "b.pdf", "a.pdf"]);
}

// ===== selection synchronization =====

#[test]
fn reordering_keeps_selection() {
    let mut ws = loaded();
    let picked = ws.visible()[1].clone();
    ws.select_document(picked);
    assert_eq!(selected_name(&ws), Some("b.pdf".to_string()));

    ws.toggle_sort(SortKey::Name);
    ws.toggle_sort(SortKey::Name);
    assert_eq!(selected_name(&ws), Some("b.pdf".to_string()));
}

#[test]
fn filtering_out_selection_falls_back_to_first_visible() {
    let mut ws = loaded();
    let picked = ws.visible()[1].clone();
    ws.select_document(picked);
    ws.set_size_class(SizeClass::Large);
    assert_eq!(selected_name(&ws), Some("c.pdf".to_string()));
}

#[test]
fn filtering_everything_out_clears_selection() {
    let mut ws = loaded();
    ws.set_search_term("no such document");
    assert!(ws.selection().is_empty());
    assert!(ws.preview().is_none());
}

#[test]
fn selection_stays_empty_when_filter_is_relaxed() {
    let mut ws = loaded();
    ws.set_search_term("no such document");
    ws.set_search_term("");
    assert_eq!(ws.visible_len(), 3);
    assert!(ws.selection().is_empty());
}

#[test]
fn user_pick_is_not_reconciled_until_view_changes() {
    let mut ws = loaded();
    ws.set_size_class(SizeClass::Small);
    let hidden = ws.documents()[2].clone();
    ws.select_document(hidden);
    assert_eq!(selected_name(&ws), Some("c.pdf".to_string()));

    // Same criteria value, same view: nothing to reconcile
    ws.set_size_class(SizeClass::Small);
    assert_eq!(selected_name(&ws), Some("c.pdf".to_string()));

    ws.set_size_class(SizeClass::Medium);
    assert_eq!(selected_name(&ws), Some("b.pdf".to_string()));
}

#[test]
fn is_selected_matches_rows_by_name() {
    let ws = loaded();
    let rows = ws.visible();
    assert!(ws.is_selected(rows[0]));
    assert!(!ws.is_selected(rows[1]));
}

// ===== preview sessions =====

#[test]
fn selection_change_opens_pending_preview() {
    let mut ws = loaded();
    let first = ws.preview().expect("session").clone();
    assert_eq!(first.target_url(), "/pdfs/a.pdf");
    assert!(!first.is_ready());

    let picked = ws.visible()[2].clone();
    ws.select_document(picked);
    let second = ws.preview().expect("session");
    assert_eq!(second.target_url(), "/pdfs/c.pdf");
    assert_ne!(second.id(), first.id());
}

#[test]
fn load_signal_marks_preview_ready() {
    let mut ws = loaded();
    let signal = ws.preview().expect("session").load_signal();
    assert_eq!(ws.preview_loaded(&signal), SignalOutcome::Applied);
    assert!(ws.preview().expect("session").is_ready());
}

#[test]
fn stale_signal_does_not_mark_new_session_ready() {
    let mut ws = loaded();
    let s1 = ws.preview().expect("session").load_signal();
    let picked = ws.visible()[1].clone();
    ws.select_document(picked);

    ws.dispatch(Command::PreviewLoaded(s1));
    assert!(!ws.preview().expect("session").is_ready());
}

#[test]
fn repicking_previewed_document_keeps_ready_session() {
    let mut ws = loaded();
    let signal = ws.preview().expect("session").load_signal();
    ws.preview_loaded(&signal);

    let picked = ws.visible()[0].clone();
    ws.select_document(picked);
    let session = ws.preview().expect("session");
    assert_eq!(session.id(), signal.session);
    assert!(session.is_ready());
}

#[test]
fn fallback_selection_opens_new_preview() {
    let mut ws = loaded();
    let before = ws.preview().expect("session").id();
    ws.set_size_class(SizeClass::Large);
    let after = ws.preview().expect("session");
    assert_eq!(after.target_url(), "/pdfs/c.pdf");
    assert_ne!(after.id(), before);
}

#[test]
fn fixed_clock_reports_its_instant() {
    assert_eq!(Clock::Fixed(now()).now(), now());
}
