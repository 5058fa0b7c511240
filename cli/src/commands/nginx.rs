//! # CI Nginx Command
//!
//! File: cli/src/commands/nginx.rs
//!
//! ## Overview
//!
//! `ci nginx` renders the project's nginx config template with the project name
//! and the IP of its running `web` container:
//!
//! ```bash
//! ci nginx                                   # config defaults
//! ci -p demo nginx -i conf/site.tmpl -o /etc/nginx/conf.d/demo.conf
//! ```
//!
//! Paths default to the `[nginx]` section of the configuration
//! (`conf/container.dev.nginx.conf` → `nginx.conf.d/container.dev.nginx.conf`).
//! The destination is replaced atomically; on failure it is left as it was.
//!
use super::Invocation;
use crate::common::docker::{Discovery, DockerRuntime};
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Arguments for `ci nginx`.
#[derive(Parser, Debug)]
#[command(about = "Render nginx config")]
pub struct NginxArgs {
    /// Template to render [default: nginx.input from config]
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Destination file [default: nginx.output from config]
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl NginxArgs {
    /// Template and destination; the configuration is only loaded for a missing flag.
    fn paths(&self, invocation: &Invocation) -> Result<(PathBuf, PathBuf)> {
        let input = match &self.input {
            Some(input) => input.clone(),
            None => PathBuf::from(&invocation.config()?.nginx.input),
        };
        let output = match &self.output {
            Some(output) => output.clone(),
            None => PathBuf::from(&invocation.config()?.nginx.output),
        };
        Ok((input, output))
    }
}

/// Handles `ci nginx`.
pub async fn handle_nginx(args: NginxArgs, invocation: &Invocation) -> Result<()> {
    let project = invocation.project()?;
    let (input, output) = args.paths(invocation)?;
    info!(
        "Handling nginx command: project '{}', {} -> {}",
        project,
        input.display(),
        output.display()
    );

    let runtime = DockerRuntime::connect(&invocation.docker_endpoint()?).await?;
    Discovery::new(runtime)
        .render(&project, &input, &output)
        .await
        .context("Failed to render nginx config")?;

    println!("rendered nginx config for project {}", project);
    Ok(())
}
