//! # CI Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers shared by the commands:
//!
//! - **`copy`**: recursive copy of a directory's contents (`ci init`), via `fs_extra`.
//! - **`io`**: `StagedFile`, the write-then-rename output used by `ci nginx`.
//!
//! Import from the specific submodule, e.g. `crate::common::fs::io::StagedFile`.
//!

/// Recursive directory content copy.
pub mod copy;
/// Atomic file output.
pub mod io;
