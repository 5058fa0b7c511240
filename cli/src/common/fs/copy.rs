//! # CI Filesystem Copy Operations
//!
//! File: cli/src/common/fs/copy.rs
//!
//! ## Overview
//!
//! Copies the contents of a template checkout into a new project checkout for
//! `ci init`. The target directory must already exist; existing files in it are
//! overwritten and files not present in the source are left alone (same as
//! `cp -r SRC/. DST`).
//!
//! The copy itself is delegated to `fs_extra`, with `content_only` so the
//! source directory's entries land directly in the target.
//!
use crate::core::error::{CiError, Result};
use anyhow::anyhow;
use std::path::Path;
use tracing::info;

/// Recursively copies everything inside `source` into `target`.
///
/// # Errors
///
/// `CiError::FileSystem` if `source` is not a directory; otherwise any
/// `fs_extra` failure, with context naming both paths.
pub fn copy_directory_contents(source: &Path, target: &Path) -> Result<()> {
    if !source.is_dir() {
        return Err(anyhow!(CiError::FileSystem(format!(
            "Source directory not found: {}",
            source.display()
        ))));
    }
    info!(
        "Copying contents of {} into {}",
        source.display(),
        target.display()
    );

    let mut options = fs_extra::dir::CopyOptions::new();
    options.overwrite = true;
    options.content_only = true;

    let copied = fs_extra::dir::copy(source, target, &options).map_err(|e| {
        anyhow::anyhow!(e).context(format!(
            "Failed to copy {} into {}",
            source.display(),
            target.display()
        ))
    })?;

    info!("Copied {} bytes into {}", copied, target.display());
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_copies_nested_contents_and_dotfiles() {
        let source = tempdir().unwrap();
        let target = tempdir().unwrap();
        fs::create_dir_all(source.path().join("conf")).unwrap();
        fs::write(source.path().join("conf/site.conf"), "server {}").unwrap();
        fs::write(source.path().join(".env"), "A=1").unwrap();

        copy_directory_contents(source.path(), target.path()).unwrap();

        assert_eq!(
            fs::read_to_string(target.path().join("conf/site.conf")).unwrap(),
            "server {}"
        );
        assert!(target.path().join(".env").exists());
    }

    #[test]
    fn test_overwrites_and_keeps_extra_files() {
        let source = tempdir().unwrap();
        let target = tempdir().unwrap();
        fs::write(source.path().join("README"), "new").unwrap();
        fs::write(target.path().join("README"), "old").unwrap();
        fs::write(target.path().join("local.txt"), "mine").unwrap();

        copy_directory_contents(source.path(), target.path()).unwrap();

        assert_eq!(fs::read_to_string(target.path().join("README")).unwrap(), "new");
        assert!(target.path().join("local.txt").exists());
    }

    #[test]
    fn test_missing_source_is_error() {
        let target = tempdir().unwrap();
        let result = copy_directory_contents(&target.path().join("absent"), target.path());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Source directory not found"));
    }
}
