//! # CI Docker State Querying
//!
//! File: cli/src/common/docker/state.rs
//!
//! ## Overview
//!
//! This module provides the read-only view of the Docker daemon that discovery
//! needs: listing running containers by label and reading a container's IP
//! address. Nothing here changes daemon state.
//!
//! ## Architecture
//!
//! - **`ContainerRuntime`**: the trait discovery is written against. It keeps
//!   the lookup logic independent of `bollard` so it can be exercised with an
//!   in-memory runtime in tests.
//! - **`ContainerDescriptor`**: an immutable snapshot of one listed container
//!   (ID plus labels), taken fresh on every query.
//! - **`DockerRuntime`**: the `bollard`-backed implementation, holding the
//!   connection established by `connect::connect_docker`.
//!
use crate::core::error::{CiError, Result};
use anyhow::anyhow;
use bollard::{
    container::{InspectContainerOptions, ListContainersOptions},
    models::ContainerSummary,
    Docker,
};
use std::collections::HashMap;
use tracing::{debug, error, instrument};

use super::connect::connect_docker;

/// Snapshot of one running container as reported by the runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerDescriptor {
    pub id: String,
    pub labels: HashMap<String, String>,
}

impl ContainerDescriptor {
    /// Value of label `key`, if present.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

impl From<ContainerSummary> for ContainerDescriptor {
    fn from(summary: ContainerSummary) -> Self {
        Self {
            id: summary.id.unwrap_or_default(),
            labels: summary.labels.unwrap_or_default(),
        }
    }
}

/// Read-only container queries used by discovery.
#[allow(async_fn_in_trait)]
pub trait ContainerRuntime {
    /// Lists running containers that carry label `label_key` (any value).
    async fn list_labelled(&self, label_key: &str) -> Result<Vec<ContainerDescriptor>>;

    /// Returns the IP address assigned to container `id`; empty if none yet.
    async fn container_ip(&self, id: &str) -> Result<String>;
}

/// `ContainerRuntime` backed by a live Docker daemon.
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connects to `endpoint` and verifies the daemon is reachable.
    pub async fn connect(endpoint: &str) -> Result<Self> {
        let docker = connect_docker(endpoint).await?;
        Ok(Self { docker })
    }
}

impl ContainerRuntime for DockerRuntime {
    #[instrument(skip(self))]
    async fn list_labelled(&self, label_key: &str) -> Result<Vec<ContainerDescriptor>> {
        let mut filters = HashMap::new();
        filters.insert("label".to_string(), vec![label_key.to_string()]);
        let options = Some(ListContainersOptions {
            all: false,
            filters,
            ..Default::default()
        });

        let summaries = self.docker.list_containers(options).await.map_err(|e| {
            error!("Failed to list containers: {:?}", e);
            anyhow!(CiError::DockerApi { source: e }).context("Failed to list containers")
        })?;
        debug!(
            "Docker reported {} running container(s) labelled '{}'",
            summaries.len(),
            label_key
        );
        Ok(summaries.into_iter().map(ContainerDescriptor::from).collect())
    }

    #[instrument(skip(self))]
    async fn container_ip(&self, id: &str) -> Result<String> {
        let details = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await
            .map_err(|e| {
                error!("Failed to inspect container '{}': {:?}", id, e);
                anyhow!(CiError::DockerApi { source: e })
                    .context(format!("Failed to inspect container '{}'", id))
            })?;
        Ok(details
            .network_settings
            .and_then(|settings| settings.ip_address)
            .unwrap_or_default())
    }
}
