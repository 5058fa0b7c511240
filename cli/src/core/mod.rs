//! # CI Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces used by every command:
//! - `config`: Layered TOML configuration (project `.ci.toml`, user config, defaults)
//! - `error`: The `CiError` taxonomy and the `Result` alias
//! - `project`: Resolving the project name once at the command boundary
//! - `templating`: Compiling and rendering config templates
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{CiError, Result}; // For error handling
//! use crate::core::templating::ConfigTemplate; // For config rendering
//! ```
//!
pub mod config;
pub mod error;
pub mod project;
pub mod templating;
