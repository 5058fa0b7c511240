//! # CI Project Name Resolution
//!
//! File: cli/src/core/project.rs
//!
//! ## Overview
//!
//! Most commands operate on a "project": the docker-compose project name, which
//! also names the git branch and the per-project database. The name comes from
//! the global `--project` flag (or `CI_PROJECT`). When neither is set it is
//! derived from the working directory, whose name follows the
//! `<project>.<rest>` convention used for checked-out containers
//! (e.g. `feature-x.dev.tera-online.ru` → `feature-x`).
//!
//! Only the commands that act on a project resolve it (through
//! `commands::Invocation::project`).
//!
use crate::core::error::{CiError, Result};
use anyhow::anyhow;
use std::path::Path;
use tracing::debug;

/// Resolves the project name from an explicit value or the given directory.
///
/// An explicit value wins unless it is empty. Otherwise the base name of `cwd`
/// is used, truncated at its first `.`.
///
/// # Errors
///
/// Returns `CiError::Config` if no name can be derived (e.g. `cwd` is `/`).
pub fn resolve_project(explicit: Option<&str>, cwd: &Path) -> Result<String> {
    if let Some(name) = explicit.filter(|name| !name.is_empty()) {
        debug!("Using explicit project name '{}'", name);
        return Ok(name.to_string());
    }
    project_from_dir(cwd)
}

/// Derives a project name from a directory name: everything before the first `.`.
///
/// # Errors
///
/// `CiError::Config` if `dir` has no base name or the name starts with `.`.
pub fn project_from_dir(dir: &Path) -> Result<String> {
    let underivable = || {
        anyhow!(CiError::Config(format!(
            "Cannot derive a project name from '{}'. Pass --project.",
            dir.display()
        )))
    };
    let base = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(underivable)?;
    let project = base.split('.').next().unwrap_or_default().to_string();
    if project.is_empty() {
        return Err(underivable());
    }
    debug!(
        "Derived project name '{}' from directory '{}'",
        project,
        dir.display()
    );
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ci_error;
    use std::path::PathBuf;

    #[test]
    fn test_explicit_project_wins() {
        let cwd = PathBuf::from("/container/other.dev.tera-online.ru");
        let project = resolve_project(Some("demo"), &cwd).unwrap();
        assert_eq!(project, "demo");
    }

    #[test]
    fn test_empty_explicit_falls_back_to_directory() {
        let cwd = PathBuf::from("/container/feature-x.dev.tera-online.ru");
        let project = resolve_project(Some(""), &cwd).unwrap();
        assert_eq!(project, "feature-x");
    }

    #[test]
    fn test_directory_without_dot() {
        let cwd = PathBuf::from("/home/me/code/webapp");
        assert_eq!(resolve_project(None, &cwd).unwrap(), "webapp");
    }

    #[test]
    fn test_leading_dot_directory_is_an_error() {
        let cwd = PathBuf::from("/srv/.hidden");
        let err = project_from_dir(&cwd).unwrap_err();
        assert!(matches!(ci_error(&err), Some(CiError::Config(_))));
        assert!(err.to_string().contains("--project"));
    }

    #[test]
    fn test_explicit_project_needs_no_directory_name() {
        let project = resolve_project(Some("demo"), Path::new("/srv/.hidden")).unwrap();
        assert_eq!(project, "demo");
    }

    #[test]
    fn test_root_directory_is_an_error() {
        let result = resolve_project(None, Path::new("/"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("--project"));
    }
}
