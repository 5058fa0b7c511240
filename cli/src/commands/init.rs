//! # CI Init Command
//!
//! File: cli/src/commands/init.rs
//!
//! ## Overview
//!
//! `ci init <PROJECT>` bootstraps a checkout for a new project by copying the
//! template checkout that lives next to it. Checkout directories are named
//! after their host name, with the template being the `master` one:
//!
//! ```text
//! /container/master.dev.tera-online.ru      (template, --source)
//! /container/feature-x.dev.tera-online.ru   (created by `ci init feature-x`)
//! ```
//!
//! ## Architecture
//!
//! 1. Resolve `--dir` and `--source` (flag, `CI_DIR`/`CI_SOURCE`, then config).
//! 2. Target name = source name with every `master` replaced by the project.
//! 3. Create the target directory; an existing one is reused.
//! 4. Copy the template's contents into it, overwriting files of the same name.
//!
use super::Invocation;
use crate::common::fs::copy;
use crate::core::error::{CiError, Result};
use anyhow::{anyhow, Context};
use clap::Parser;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Arguments for `ci init`.
#[derive(Parser, Debug)]
#[command(about = "initialize code for container")]
pub struct InitArgs {
    /// Name of the project to create.
    #[arg(value_name = "PROJECT")]
    name: String,
    /// Directory holding the checkouts [default: init.dir from config]
    #[arg(long, env = "CI_DIR")]
    dir: Option<String>,
    /// Template checkout name inside DIR [default: init.source from config]
    #[arg(long, env = "CI_SOURCE")]
    source: Option<String>,
}

/// Source and target directories of one `ci init` run.
#[derive(Debug, Clone, PartialEq, Eq)]
struct InitPlan {
    source: PathBuf,
    target: PathBuf,
}

impl InitPlan {
    fn new(dir: &Path, source_name: &str, project: &str) -> Result<Self> {
        if project.is_empty() || project.contains(['/', '\\']) || project == ".." {
            return Err(anyhow!(CiError::Config(format!(
                "Invalid project name '{}'",
                project
            ))));
        }
        Ok(Self {
            source: dir.join(source_name),
            target: dir.join(source_name.replace("master", project)),
        })
    }
}

/// Handles `ci init`.
pub async fn handle_init(args: InitArgs, invocation: &Invocation) -> Result<()> {
    let dir = match args.dir {
        Some(dir) => dir,
        None => invocation.config()?.init.dir.clone(),
    };
    let source = match args.source {
        Some(source) => source,
        None => invocation.config()?.init.source.clone(),
    };
    let plan = InitPlan::new(Path::new(&dir), &source, &args.name)?;
    info!(
        "Initializing project '{}': {} -> {}",
        args.name,
        plan.source.display(),
        plan.target.display()
    );
    if plan.source == plan.target {
        return Err(anyhow!(CiError::Config(format!(
            "Source '{}' contains no 'master' to replace; refusing to copy onto itself",
            source
        ))));
    }
    if !plan.source.is_dir() {
        return Err(anyhow!(CiError::FileSystem(format!(
            "Source directory not found: {}",
            plan.source.display()
        ))));
    }

    print!(
        "initializing project {} in {}...",
        args.name,
        plan.target.display()
    );
    std::io::stdout().flush().context("Failed to flush stdout")?;

    create_target_dir(&plan.target)?;
    copy::copy_directory_contents(&plan.source, &plan.target)?;

    println!("OK");
    Ok(())
}

/// Creates `target` (not its parents); an existing directory is fine.
fn create_target_dir(target: &Path) -> Result<()> {
    match fs::create_dir(target) {
        Ok(()) => {
            debug!("Created {}", target.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists && target.is_dir() => {
            debug!("{} already exists, reusing it", target.display());
            Ok(())
        }
        Err(e) => Err(anyhow!(CiError::FileSystem(format!(
            "Failed to create {}: {}",
            target.display(),
            e
        )))),
    }
}
