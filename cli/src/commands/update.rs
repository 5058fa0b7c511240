//! # CI Update Command
//!
//! File: cli/src/commands/update.rs
//!
//! `ci update` brings the checkout in the current directory onto the project's
//! branch (the branch is named after the project):
//!
//! ```bash
//! git fetch origin <project>
//! git checkout <project>
//! git submodule update
//! ```
//!
//! The steps run in order with the terminal attached; the first failure stops
//! the command.
//!
use super::Invocation;
use crate::common::process;
use crate::core::error::Result;
use clap::Parser;
use std::process::Command;
use tracing::info;

/// Arguments for `ci update` (none).
#[derive(Parser, Debug)]
#[command(about = "Perform git checkout")]
pub struct UpdateArgs {}

/// Handles `ci update`.
pub async fn handle_update(_args: UpdateArgs, invocation: &Invocation) -> Result<()> {
    let project = invocation.project()?;
    info!("Updating checkout to branch '{}'", project);
    for step in update_steps(&project) {
        process::run(step)?;
    }
    Ok(())
}

fn update_steps(branch: &str) -> Vec<Command> {
    vec![
        process::command("git", &["fetch", "origin", branch]),
        process::command("git", &["checkout", branch]),
        process::command("git", &["submodule", "update"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_steps_target_project_branch() {
        let steps: Vec<String> = update_steps("feature-x")
            .iter()
            .map(process::describe)
            .collect();
        assert_eq!(
            steps,
            vec![
                "git fetch origin feature-x",
                "git checkout feature-x",
                "git submodule update",
            ]
        );
    }
}
