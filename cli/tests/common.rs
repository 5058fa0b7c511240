//! # CI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test files (`main_tests.rs`,
//! `project.rs`, `docker.rs`, `init.rs`). Each `.rs` file in `cli/tests/`
//! (other than this module) is compiled as a separate test crate that runs
//! the compiled `ci` binary.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables read by `ci` that must not leak in from the host.
const CI_ENV_VARS: &[&str] = &[
    "CI_PROJECT",
    "CI_DOCKER",
    "CI_DIR",
    "CI_SOURCE",
    "CI_DB_PASSWORD",
    "RUST_LOG",
];

/// # Get CI Command (`ci_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `ci` binary.
///
/// ## Panics
/// Panics if the `ci` binary cannot be found via `Command::cargo_bin`.
pub fn ci_cmd() -> Command {
    Command::cargo_bin("ci").expect("Failed to find ci binary for testing")
}

/// A `ci` command running in `dir` with the user config directory pointed
/// inside `dir` and host `CI_*` variables cleared.
pub fn ci_cmd_in(dir: &Path) -> Command {
    let mut cmd = ci_cmd();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"));
    for var in CI_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// A temporary root holding a checkout directory called `name`.
///
/// Returns the root (keep it alive for the test) and the checkout path.
pub fn checkout_dir(name: &str) -> (TempDir, PathBuf) {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let checkout = root.path().join(name);
    fs::create_dir_all(&checkout).expect("Failed to create checkout dir");
    (root, checkout)
}
