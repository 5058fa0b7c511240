//! # CI Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared utilities used by the command handlers, kept apart from the
//! command-specific logic (`commands::`) and core infrastructure (`core::`).
//!
//! - **`docker`**: Docker connection, container queries and web container discovery (`bollard`).
//! - **`fs`**: Directory content copy and atomic file output.
//! - **`process`**: Running external tools (`git`, `mysql`, `fab`) and checking their exit status.
//! - **`ui`**: Terminal progress display.
//!

/// Docker daemon interaction and discovery.
pub mod docker;
/// Filesystem operations (copy, atomic output).
pub mod fs;
/// External process execution.
pub mod process;
/// Terminal user interface helpers.
pub mod ui;
