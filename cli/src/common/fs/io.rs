//! # CI Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Output files that other programs read live (the rendered nginx config) are
//! written through `StagedFile`: content goes to a temporary file in the
//! destination's directory and is renamed over the destination only once
//! complete. Readers see either the old file or the new one, never a partial
//! write, and a failure before `commit` leaves the destination as it was.
//!
//! ## Usage
//!
//! ```rust
//! let staged = StagedFile::create(Path::new("nginx.conf.d/site.conf"))?; // fails early if not writable
//! let text = build_text()?;                                               // may fail; nothing written
//! staged.commit(&text)?;                                                 // atomic replace
//! ```
//!
use crate::core::error::{CiError, Result};
use anyhow::anyhow;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// A pending replacement of `target`, removed automatically if dropped uncommitted.
pub struct StagedFile {
    target: PathBuf,
    temp: NamedTempFile,
}

impl StagedFile {
    /// Creates the staging file next to `target`.
    ///
    /// The target's directory is not created.
    ///
    /// # Errors
    ///
    /// `CiError::OutputCreate` if a file cannot be created in that directory.
    pub fn create(target: &Path) -> Result<Self> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir).map_err(|e| output_error(target, e))?;
        debug!(
            "Staging '{}' via '{}'",
            target.display(),
            temp.path().display()
        );
        Ok(Self {
            target: target.to_path_buf(),
            temp,
        })
    }

    /// Writes `content` and atomically replaces the target with it.
    ///
    /// An existing target keeps its permissions; a new one gets `0644`.
    pub fn commit(mut self, content: &str) -> Result<()> {
        let target = self.target;
        self.temp
            .write_all(content.as_bytes())
            .and_then(|_| self.temp.as_file().sync_all())
            .map_err(|e| output_error(&target, e))?;
        if let Some(permissions) = permissions_for(&target) {
            fs::set_permissions(self.temp.path(), permissions)
                .map_err(|e| output_error(&target, e))?;
        }
        self.temp
            .persist(&target)
            .map_err(|e| output_error(&target, e.error))?;
        debug!("Wrote '{}'", target.display());
        Ok(())
    }
}

fn output_error(target: &Path, err: std::io::Error) -> anyhow::Error {
    anyhow!(CiError::OutputCreate {
        path: target.display().to_string(),
        reason: err.to_string(),
    })
}

/// Permissions to give the replacement: the target's, or `0644` for a new file on unix.
fn permissions_for(target: &Path) -> Option<fs::Permissions> {
    match fs::metadata(target) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => new_file_permissions(),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ci_error;
    use tempfile::tempdir;

    #[test]
    fn test_commit_creates_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out.conf");

        StagedFile::create(&target).unwrap().commit("hello").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "hello");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_commit_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out.conf");
        fs::write(&target, "a much longer previous content").unwrap();

        StagedFile::create(&target).unwrap().commit("new").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn test_drop_without_commit_leaves_target_untouched() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out.conf");
        fs::write(&target, "keep").unwrap();

        drop(StagedFile::create(&target).unwrap());

        assert_eq!(fs::read_to_string(&target).unwrap(), "keep");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_directory_is_output_error() {
        let dir = tempdir().unwrap();
        let err = StagedFile::create(&dir.path().join("nope/out.conf"))
            .err()
            .unwrap();
        assert!(matches!(
            ci_error(&err),
            Some(CiError::OutputCreate { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let target = dir.path().join("out.conf");
        StagedFile::create(&target).unwrap().commit("x").unwrap();
        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
