//! PDF workspace (pdfws)
//!
//! Browse a PDF listing with search, size and date filters, sortable
//! columns and a preview that follows the selection.
//!
//! The library follows a pure core / impure shell split: `model`, `filter`,
//! `state` and `view` are pure; `source`, `integration` and `logging` do I/O.

pub mod config;
pub mod filter;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod view;

// Re-export main loop integration
pub mod integration;
