//! # CI Web Container Discovery
//!
//! File: cli/src/common/docker/discovery.rs
//!
//! ## Overview
//!
//! Finds the running container playing the `web` role of a docker-compose
//! project and exposes its IP address, either directly (`ci ip`) or rendered
//! into a config template (`ci nginx`).
//!
//! ## Architecture
//!
//! 1. List running containers that carry the compose project label
//!    (server-side existence filter).
//! 2. Keep those whose project label equals the requested project and whose
//!    service label is `web`; select the last one in listing order.
//! 3. Inspect it for its IP address and build a `RenderContext`.
//!
//! `render` compiles the template and stages the destination file before the
//! lookup, renders into memory, then swaps the finished file into place. A
//! failed lookup or render leaves the destination untouched.
//!
use crate::common::fs::io::StagedFile;
use crate::common::docker::state::{ContainerDescriptor, ContainerRuntime};
use crate::core::error::{CiError, Result};
use crate::core::templating::ConfigTemplate;
use anyhow::anyhow;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Compose label naming a container's project.
pub const PROJECT_LABEL: &str = "com.docker.compose.project";
/// Compose label naming a container's service within its project.
pub const SERVICE_LABEL: &str = "com.docker.compose.service";
/// Service whose address is published.
pub const WEB_SERVICE: &str = "web";

/// Values substituted into a config template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderContext {
    #[serde(rename = "Project")]
    pub project: String,
    #[serde(rename = "Web")]
    pub web: String,
}

/// Looks up project containers through a `ContainerRuntime`.
pub struct Discovery<R> {
    runtime: R,
}

impl<R: ContainerRuntime> Discovery<R> {
    pub fn new(runtime: R) -> Self {
        Self { runtime }
    }

    /// Builds the render context for `project` from its web container.
    ///
    /// If several containers qualify, the last one listed wins. An empty IP
    /// (container without an address yet) is returned as-is.
    ///
    /// # Errors
    ///
    /// * `CiError::NotFound` - no running web container for `project`.
    /// * `CiError::DockerApi` - listing or inspecting failed.
    #[instrument(skip(self))]
    pub async fn get_context(&self, project: &str) -> Result<RenderContext> {
        let containers = self.runtime.list_labelled(PROJECT_LABEL).await?;
        let matches: Vec<&ContainerDescriptor> = containers
            .iter()
            .filter(|c| is_web_of(c, project))
            .collect();

        let Some(selected) = matches.last() else {
            return Err(anyhow!(CiError::NotFound {
                project: project.to_string()
            }));
        };
        if matches.len() > 1 {
            warn!(
                "{} web containers found for project '{}', using the last listed ({})",
                matches.len(),
                project,
                selected.id
            );
        }

        let web = self.runtime.container_ip(&selected.id).await?;
        debug!(
            "Web container {} of project '{}' has IP '{}'",
            selected.id, project, web
        );
        Ok(RenderContext {
            project: project.to_string(),
            web,
        })
    }

    /// Renders the template at `input` for `project` into `output`.
    ///
    /// # Errors
    ///
    /// * `CiError::TemplateParse` - `input` unreadable or malformed.
    /// * `CiError::OutputCreate` - `output` cannot be written.
    /// * `CiError::NotFound` - propagated from [`Discovery::get_context`].
    /// * `CiError::TemplateExec` - the template references an unknown field.
    #[instrument(skip(self))]
    pub async fn render(&self, project: &str, input: &Path, output: &Path) -> Result<()> {
        let template = ConfigTemplate::from_file(input)?;
        let staged = StagedFile::create(output)?;
        let context = self.get_context(project).await?;
        let rendered = template.render(&context)?;
        staged.commit(&rendered)?;
        info!(
            "Rendered '{}' to '{}' for project '{}'",
            input.display(),
            output.display(),
            project
        );
        Ok(())
    }
}

fn is_web_of(container: &ContainerDescriptor, project: &str) -> bool {
    container.label(PROJECT_LABEL) == Some(project)
        && container.label(SERVICE_LABEL) == Some(WEB_SERVICE)
}
