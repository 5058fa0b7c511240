//! # CI Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! One module per `ci` subcommand. Each defines a Clap argument struct and an
//! async `handle_*` function that `main.rs` dispatches to.
//!
//! ## Command Groups
//!
//! - `db`: Copy the shared database into a per-project database
//! - `deploy`: Deploy the current git branch with `fab`
//! - `init`: Bootstrap a project checkout from the template checkout
//! - `ip`: Print the IP of the project's web container
//! - `nginx`: Render the nginx config from the running web container
//! - `project`: Print the resolved project name
//! - `update`: Fetch and check out the project's branch
//!
//! Handlers reach the global options through [`Invocation`]. The project name
//! and the configuration are resolved on first use, so a command that needs
//! neither (`init` needs no project, `project` needs no configuration) is not
//! failed by them.
//!
use crate::core::config::{self, Config};
use crate::core::error::Result;
use crate::core::project::resolve_project;
use anyhow::Context;
use std::cell::OnceCell;
use std::path::PathBuf;

/// Copies a database into `<db>_<project>`.
pub mod db;
/// Deploys the checked-out branch.
pub mod deploy;
/// Creates a project checkout from the template checkout.
pub mod init;
/// Prints the web container IP.
pub mod ip;
/// Renders the nginx config template.
pub mod nginx;
/// Prints the project name.
pub mod project;
/// Checks out the project branch.
pub mod update;

/// Global options shared by all handlers.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// `--project`/`CI_PROJECT`, if given.
    project: Option<String>,
    /// `--docker`/`CI_DOCKER`, if given.
    docker: Option<String>,
    /// Directory the project name and `.ci.toml` are derived from.
    cwd: PathBuf,
    config: OnceCell<Config>,
}

impl Invocation {
    pub fn new(project: Option<String>, docker: Option<String>, cwd: PathBuf) -> Self {
        Self {
            project,
            docker,
            cwd,
            config: OnceCell::new(),
        }
    }

    /// The project name: the explicit value, else the working directory name
    /// up to its first `.`.
    pub fn project(&self) -> Result<String> {
        resolve_project(self.project.as_deref(), &self.cwd)
    }

    /// The merged configuration, loaded on first call.
    pub fn config(&self) -> Result<&Config> {
        if let Some(config) = self.config.get() {
            return Ok(config);
        }
        let loaded =
            config::load_config_from(&self.cwd).context("Failed to load ci configuration")?;
        Ok(self.config.get_or_init(|| loaded))
    }

    /// The Docker endpoint: a non-empty `--docker`, else `docker.endpoint` from config.
    pub fn docker_endpoint(&self) -> Result<String> {
        match self.docker.as_deref().filter(|endpoint| !endpoint.is_empty()) {
            Some(endpoint) => Ok(endpoint.to_string()),
            None => Ok(self.config()?.docker.endpoint.clone()),
        }
    }
}

/// An invocation with default configuration and an unreachable Docker socket.
#[cfg(test)]
pub(crate) fn test_invocation(project: &str) -> Invocation {
    let invocation = Invocation::new(
        Some(project.to_string()),
        Some("unix:///nonexistent/ci-test/docker.sock".to_string()),
        PathBuf::from("/nonexistent/ci-test"),
    );
    let _ = invocation.config.set(Config::default());
    invocation
}
