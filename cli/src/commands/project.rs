//! # CI Project Command
//!
//! File: cli/src/commands/project.rs
//!
//! `ci project` prints the resolved project name without a trailing newline,
//! so scripts can use `$(ci project)`. Running `ci` with no subcommand prints
//! it as a `project <name>` line instead.
//!
use super::Invocation;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::io::Write;
use tracing::info;

/// Arguments for `ci project` (none).
#[derive(Parser, Debug)]
#[command(about = "Get project name")]
pub struct ProjectArgs {}

/// Handles `ci project`.
pub async fn handle_project(_args: ProjectArgs, invocation: &Invocation) -> Result<()> {
    info!("Handling project command");
    let project = invocation.project()?;
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", project).context("Failed to write project name")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(())
}

/// Handles a bare `ci` invocation.
pub async fn handle_default(invocation: &Invocation) -> Result<()> {
    println!("project {}", invocation.project()?);
    Ok(())
}
