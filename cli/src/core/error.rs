//! # CI Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error taxonomy used throughout the `ci` tool.
//! Every failure is fatal to the running command: `main` prints it on stderr
//! and exits with status 1. Nothing is retried.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `CiError`: A custom error enum using `thiserror` for the failure kinds callers
//!   (and tests) need to tell apart.
//! - `Result<T>`: A type alias for `anyhow::Result<T>` so any layer can add context.
//!
//! The error kinds cover:
//! - Docker connection and API failures
//! - The "no web container" lookup failure
//! - Template parse/execute failures and output file creation
//! - External command (git, mysql, fab) failures
//! - Configuration and filesystem errors
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! return Err(anyhow!(CiError::NotFound { project: project.to_string() }));
//!
//! // Classify errors further up
//! let is_missing = err
//!     .downcast_ref::<CiError>()
//!     .is_some_and(|e| matches!(e, CiError::NotFound { .. }));
//! ```
//!
use thiserror::Error;

/// Custom error type for the `ci` application.
#[derive(Error, Debug)]
pub enum CiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Unable to connect to docker at '{endpoint}': {reason}")]
    Connection { endpoint: String, reason: String },

    #[error("Docker API interaction failed: {source}")]
    DockerApi {
        #[from]
        source: bollard::errors::Error,
    },

    #[error("Unable to find web container IP for project {project}")]
    NotFound { project: String },

    #[error("Failed to parse template '{path}': {reason}")]
    TemplateParse { path: String, reason: String },

    #[error("Failed to execute template: {reason}")]
    TemplateExec { reason: String },

    #[error("Output file open error for '{path}': {reason}")]
    OutputCreate { path: String, reason: String },

    #[error("External command failed: {cmd}, Status: {status}")]
    ExternalCommand { cmd: String, status: String },

    #[error("Database error: {0}")]
    Database(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

/// Returns the `CiError` carried by `err`, if any, looking through context layers.
pub fn ci_error(err: &anyhow::Error) -> Option<&CiError> {
    err.downcast_ref::<CiError>()
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn test_error_display() {
        let not_found = CiError::NotFound {
            project: "demo".into(),
        };
        assert_eq!(
            not_found.to_string(),
            "Unable to find web container IP for project demo"
        );

        let connection = CiError::Connection {
            endpoint: "unix:///var/run/docker.sock".into(),
            reason: "connection refused".into(),
        };
        assert_eq!(
            connection.to_string(),
            "Unable to connect to docker at 'unix:///var/run/docker.sock': connection refused"
        );

        let failed = CiError::ExternalCommand {
            cmd: "git fetch origin demo".into(),
            status: "exit status: 128".into(),
        };
        assert_eq!(
            failed.to_string(),
            "External command failed: git fetch origin demo, Status: exit status: 128"
        );
    }

    #[test]
    fn test_ci_error_survives_context() {
        let err: Result<()> = Err(anyhow!(CiError::NotFound {
            project: "demo".into()
        }))
        .context("Failed to render nginx config");
        let err = err.unwrap_err();
        assert!(matches!(ci_error(&err), Some(CiError::NotFound { project }) if project == "demo"));
    }

    #[test]
    fn test_ci_error_absent_for_plain_errors() {
        let err = anyhow!("something else");
        assert!(ci_error(&err).is_none());
    }
}
