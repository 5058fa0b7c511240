//! # CI Terminal UI Utilities (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//!
//! ## Overview
//!
//! Terminal feedback for long-running steps. Currently a single helper: a byte
//! progress bar (via `indicatif`) used while a database dump is streamed into
//! `mysql` by `ci db`.
//!
use indicatif::{ProgressBar, ProgressStyle};

const BYTES_TEMPLATE: &str =
    "{bytes}/{total_bytes} [{wide_bar}] {percent}% {binary_bytes_per_sec} {eta}";

/// A progress bar counting `total` bytes, drawn on stderr.
pub fn byte_progress(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    let style = ProgressStyle::with_template(BYTES_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    bar.set_style(style);
    bar
}
