//! Library crate for userlist-tui.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state, the Users screen and the update loop (`app`)
//! - Command-line options (`cli`)
//! - Error and result types (`error`)
//! - Search / sort / pagination pipeline (`search`)
//! - User records and the sources that fetch them (`source`)
//! - UI rendering (`ui`)
//!
//! It is used by the `userlist-tui` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod app;
pub mod cli;
pub mod error;
pub mod search;
pub mod source;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, FetchError, Result};
