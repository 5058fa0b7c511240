//! # CI Docker Module Interface
//!
//! File: cli/src/common/docker/mod.rs
//!
//! ## Overview
//!
//! Everything `ci` asks of the Docker daemon goes through this module, on top
//! of the `bollard` crate. The only consumers are `ci ip` and `ci nginx`.
//!
//! ## Architecture
//!
//! - **`connect`**: Parses the endpoint address and establishes a pinged connection.
//! - **`state`**: The `ContainerRuntime` trait and its `bollard` implementation
//!   (list containers by label, read a container's IP).
//! - **`discovery`**: Locates a project's web container and renders config
//!   templates from it.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::docker::{Discovery, DockerRuntime};
//!
//! let runtime = DockerRuntime::connect("unix:///var/run/docker.sock").await?;
//! let context = Discovery::new(runtime).get_context("demo").await?;
//! println!("{}", context.web);
//! ```
//!

/// Endpoint parsing and connection establishment.
pub mod connect;
/// Web container lookup and template rendering.
pub mod discovery;
/// Read-only container queries.
pub mod state;

pub use discovery::Discovery;
pub use state::DockerRuntime;
