//! # CI Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the `ci` CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Collecting the global options into an `Invocation` for the handlers
//! - Routing execution to the command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Print the project derived from the working directory
//! ci
//!
//! # Render the nginx config for an explicit project, with info logs
//! ci -v -p feature-x nginx
//!
//! # Look up the web container IP through a remote daemon
//! CI_DOCKER=tcp://10.1.35.1:2375 ci ip
//! ```
//!
//! Any error is printed as `Error: ...` on stderr and the process exits with status 1.
//!
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // One module per subcommand
mod common; // Shared utilities (docker, fs, process, ui)
mod core; // Core infrastructure (errors, config, project, templating)

use crate::commands::Invocation;
use crate::core::error::Result;

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "ci",
    about = "manage ci",
    long_about = "CI chores for docker-compose project checkouts: database copy, branch\n\
                  checkout, deploy, project bootstrap and nginx config rendering.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Project name [default: current directory name up to the first '.']
    #[arg(short, long, env = "CI_PROJECT", global = true)]
    project: Option<String>,
    /// Docker endpoint [default: docker.endpoint from config, unix:///var/run/docker.sock]
    #[arg(long, env = "CI_DOCKER", global = true)]
    docker: Option<String>,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    Db(commands::db::DbArgs),
    Update(commands::update::UpdateArgs),
    Deploy(commands::deploy::DeployArgs),
    Init(commands::init::InitArgs),
    Project(commands::project::ProjectArgs),
    Nginx(commands::nginx::NginxArgs),
    Ip(commands::ip::IpArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let invocation = Invocation::new(cli.project, cli.docker, cwd);
    tracing::debug!("Invocation: {:?}", invocation);

    match cli.command {
        None => commands::project::handle_default(&invocation).await,
        Some(Commands::Db(args)) => commands::db::handle_db(args, &invocation).await,
        Some(Commands::Update(args)) => commands::update::handle_update(args, &invocation).await,
        Some(Commands::Deploy(args)) => commands::deploy::handle_deploy(args, &invocation).await,
        Some(Commands::Init(args)) => commands::init::handle_init(args, &invocation).await,
        Some(Commands::Project(args)) => {
            commands::project::handle_project(args, &invocation).await
        }
        Some(Commands::Nginx(args)) => commands::nginx::handle_nginx(args, &invocation).await,
        Some(Commands::Ip(args)) => commands::ip::handle_ip(args, &invocation).await,
    }
}
