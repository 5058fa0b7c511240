//! # CI IP Command
//!
//! File: cli/src/commands/ip.rs
//!
//! `ci ip` connects to Docker, finds the project's running `web` container and
//! prints its IP address (an empty line if it has none yet).
//!
use super::Invocation;
use crate::common::docker::{Discovery, DockerRuntime};
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use tracing::info;

/// Arguments for `ci ip` (none).
#[derive(Parser, Debug)]
#[command(about = "Get container ip")]
pub struct IpArgs {}

/// Handles `ci ip`.
pub async fn handle_ip(_args: IpArgs, invocation: &Invocation) -> Result<()> {
    let project = invocation.project()?;
    info!("Handling ip command for project '{}'", project);
    let runtime = DockerRuntime::connect(&invocation.docker_endpoint()?).await?;
    let context = Discovery::new(runtime)
        .get_context(&project)
        .await
        .context("Unable to get context")?;
    println!("{}", context.web);
    Ok(())
}
