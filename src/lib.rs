//! Weekly remote-job search pipeline
//!
//! Fetches listings from Remotive and We Work Remotely, filters them by
//! keyword, ranks them, and overwrites a Google Sheets worksheet with the top
//! results for the current week.

pub mod config;
pub mod errors;
pub mod filter;
pub mod sheets;
pub mod sorter;
pub mod sources;
pub mod types;

pub use types::*;
