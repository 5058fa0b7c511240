//! # CI Deploy Command
//!
//! File: cli/src/commands/deploy.rs
//!
//! `ci deploy` deploys whatever branch is checked out in the current directory
//! through the team's Fabric tasks: `fab dev init:branch=<branch>`. The branch
//! comes from `git rev-parse --abbrev-ref HEAD`, not from the project name.
//!
use super::Invocation;
use crate::common::process;
use crate::core::error::Result;
use anyhow::bail;
use clap::Parser;
use tracing::info;

/// Arguments for `ci deploy` (none).
#[derive(Parser, Debug)]
#[command(about = "Deploy the checked-out branch with fab")]
pub struct DeployArgs {}

/// Handles `ci deploy`.
pub async fn handle_deploy(_args: DeployArgs, _invocation: &Invocation) -> Result<()> {
    let branch = current_branch()?;
    println!("deploying branch {}", branch);
    info!("Deploying branch '{}'", branch);
    process::run(process::command("fab", &["dev", &deploy_task(&branch)]))
}

fn current_branch() -> Result<String> {
    let output = process::run_capture(process::command(
        "git",
        &["rev-parse", "--abbrev-ref", "HEAD"],
    ))?;
    let branch = output.trim().to_string();
    if branch.is_empty() {
        bail!("git did not report a current branch");
    }
    Ok(branch)
}

/// The fab task argument deploying `branch`.
fn deploy_task(branch: &str) -> String {
    format!("init:branch={}", branch)
}
