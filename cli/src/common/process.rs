//! # CI Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Most `ci` commands are short scripts over external tools (`git`, `mysql`,
//! `mysqldump`, `fab`). This module runs them with `std::process::Command`,
//! synchronously and in order, and turns spawn failures and non-zero exits into
//! `CiError::ExternalCommand`.
//!
//! Three flavours are provided:
//! - **`run`**: inherit the terminal's stdin/stdout/stderr (interactive tools, progress output).
//! - **`run_capture`**: capture stdout as text, stderr still goes to the terminal.
//! - **`run_with_input`**: stream a reader into the child's stdin.
//!
//! Callers configure anything else (environment, redirected stdout) on the
//! `Command` before handing it over.
//!
use crate::core::error::{CiError, Result};
use anyhow::{anyhow, Context};
use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, info};

/// Builds a `Command` for `program` with `args`.
pub fn command(program: &str, args: &[&str]) -> Command {
    let mut command = Command::new(program);
    command.args(args);
    command
}

/// Renders a command as `program arg1 arg2 ...` for logs and errors.
pub fn describe(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs `command` with inherited stdio and waits for it.
///
/// Streams already redirected by the caller (e.g. stdout to a file) are kept.
pub fn run(mut command: Command) -> Result<()> {
    let description = describe(&command);
    info!("Running: {}", description);
    let status = command
        .status()
        .map_err(|e| spawn_error(&description, e))?;
    check_status(&description, status)
}

/// Runs `command` and returns its stdout; stderr is passed through.
pub fn run_capture(mut command: Command) -> Result<String> {
    let description = describe(&command);
    info!("Running (capturing output): {}", description);
    let output = command
        .stdin(Stdio::inherit())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| spawn_error(&description, e))?;
    check_status(&description, output.status)?;
    String::from_utf8(output.stdout)
        .with_context(|| format!("Output of '{}' is not valid UTF-8", description))
}

/// Runs `command`, copying `input` into its stdin until EOF.
///
/// The child's exit status is checked before any copy error is reported, so a
/// child that dies early is reported as such rather than as a broken pipe.
pub fn run_with_input<R: Read>(mut command: Command, input: &mut R) -> Result<()> {
    let description = describe(&command);
    info!("Running (streaming stdin): {}", description);
    let mut child = command
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| spawn_error(&description, e))?;

    let copied = match child.stdin.take() {
        Some(mut stdin) => io::copy(input, &mut stdin),
        None => Ok(0),
    };
    let status = child
        .wait()
        .with_context(|| format!("Failed to wait for '{}'", description))?;
    check_status(&description, status)?;
    let bytes = copied.with_context(|| format!("Failed to feed input to '{}'", description))?;
    debug!("Fed {} bytes to '{}'", bytes, description);
    Ok(())
}

fn spawn_error(description: &str, err: io::Error) -> anyhow::Error {
    anyhow!(CiError::ExternalCommand {
        cmd: description.to_string(),
        status: format!("failed to start: {}", err),
    })
}

fn check_status(description: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        debug!("'{}' finished successfully", description);
        Ok(())
    } else {
        Err(anyhow!(CiError::ExternalCommand {
            cmd: description.to_string(),
            status: status.to_string(),
        }))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::core::error::ci_error;

    #[test]
    fn test_describe_joins_program_and_args() {
        let cmd = command("git", &["fetch", "origin", "demo"]);
        assert_eq!(describe(&cmd), "git fetch origin demo");
    }

    #[test]
    fn test_run_success() {
        assert!(run(command("sh", &["-c", "exit 0"])).is_ok());
    }

    #[test]
    fn test_run_non_zero_exit_is_external_command_error() {
        let err = run(command("sh", &["-c", "exit 3"])).unwrap_err();
        match ci_error(&err) {
            Some(CiError::ExternalCommand { cmd, status }) => {
                assert_eq!(cmd, "sh -c exit 3");
                assert!(status.contains('3'));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_run_missing_program_is_external_command_error() {
        let err = run(command("ci-nonexistent-program-98765", &[])).unwrap_err();
        assert!(matches!(
            ci_error(&err),
            Some(CiError::ExternalCommand { status, .. }) if status.starts_with("failed to start")
        ));
    }

    #[test]
    fn test_run_capture_returns_stdout() {
        let out = run_capture(command("sh", &["-c", "echo feature-x"])).unwrap();
        assert_eq!(out, "feature-x\n");
    }

    #[test]
    fn test_run_with_input_feeds_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let sink = dir.path().join("sink.txt");
        let script = format!("cat > '{}'", sink.display());
        let mut input: &[u8] = b"CREATE TABLE t (id INT);\n";

        run_with_input(command("sh", &["-c", &script]), &mut input).unwrap();

        assert_eq!(
            std::fs::read_to_string(&sink).unwrap(),
            "CREATE TABLE t (id INT);\n"
        );
    }

    #[test]
    fn test_run_with_input_reports_child_failure() {
        let mut input: &[u8] = b"data";
        let err = run_with_input(command("sh", &["-c", "exit 1"]), &mut input).unwrap_err();
        assert!(matches!(
            ci_error(&err),
            Some(CiError::ExternalCommand { .. })
        ));
    }
}
