//! # CI Database Command
//!
//! File: cli/src/commands/db.rs
//!
//! ## Overview
//!
//! `ci db` gives a project its own copy of the shared database. The source
//! database `<db>` is copied into `<db>_<project>` on the same server.
//!
//! ## Architecture
//!
//! The command drives the MySQL client tools, in order:
//! 1. `mysql -e "CREATE DATABASE IF NOT EXISTS ..."` creates the project database.
//! 2. With `--dump`, `mysqldump <db>` writes a fresh dump to `<dump-dir>/<db>`.
//! 3. Unless `--load false` (or `0`, `no`, `off`), the dump is streamed into
//!    `mysql <db>_<project>` behind a byte progress bar.
//!
//! The password reaches the tools through `MYSQL_PWD` so it never shows up in
//! the process list. All options can be set through `CI_DB_*` variables.
//!
use super::Invocation;
use crate::common::{process, ui};
use crate::core::error::{CiError, Result};
use anyhow::{anyhow, Context};
use clap::builder::BoolishValueParser;
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Longest database name MySQL accepts.
const MAX_DATABASE_NAME_LEN: usize = 64;

/// Arguments for `ci db`.
#[derive(Parser, Debug)]
#[command(
    about = "Copy database",
    long_about = "Creates <db>_<project> on the database server and loads a dump of <db> into it.\n\
                  Use --dump to take a fresh dump first."
)]
pub struct DbArgs {
    /// Database password (passed to the client tools as MYSQL_PWD)
    #[arg(long, env = "CI_DB_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,
    /// Database user running the copy
    #[arg(long, env = "CI_DB_USER", default_value = "ci")]
    user: String,
    /// Database user the application connects as
    #[arg(long, env = "CI_DB_APP_USER", default_value = "tera")]
    app_user: String,
    /// Source database name
    #[arg(long, env = "CI_DB_NAME", default_value = "tera")]
    db: String,
    /// Database server host
    #[arg(long, env = "CI_DB_HOST", default_value = "10.1.35.1")]
    host: String,
    /// Database server port
    #[arg(long, env = "CI_DB_PORT", default_value_t = 3306)]
    port: u16,
    /// Directory holding dump files
    #[arg(long, env = "CI_DB_DUMP_DIR", default_value = "/container/dump/")]
    dump_dir: PathBuf,
    /// Take a fresh dump of the source database first
    #[arg(long, env = "CI_DB_DUMP_CREATE")]
    dump: bool,
    /// Load the dump into the project database (a bare `--load` means true)
    #[arg(
        long,
        env = "CI_DB_DUMP_LOAD",
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
        action = clap::ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        value_name = "BOOL"
    )]
    load: bool,
}

impl DbArgs {
    fn dump_file(&self) -> PathBuf {
        self.dump_dir.join(&self.db)
    }

    /// A client tool command with connection options and credentials set.
    fn client(&self, program: &str) -> Command {
        let mut command = Command::new(program);
        command
            .arg("-u")
            .arg(&self.user)
            .arg(format!("--port={}", self.port))
            .arg(format!("--host={}", self.host))
            .env("MYSQL_PWD", &self.password);
        command
    }
}

/// Handles `ci db`.
pub async fn handle_db(args: DbArgs, invocation: &Invocation) -> Result<()> {
    println!("connecting to db on {}:{}", args.host, args.port);
    let project_db = project_database(&args.db, &invocation.project()?)?;
    debug!(
        "Application user '{}' is not granted anything by this command",
        args.app_user
    );

    println!("creating db {}", project_db);
    create_database(&args, &project_db)
        .with_context(|| format!("Failed to create database {}", project_db))?;

    if args.dump {
        dump_database(&args).context("Unable to make dump")?;
    }

    if !args.load {
        info!("Skipping dump load for {}", project_db);
        return Ok(());
    }
    load_dump(&args, &project_db).context("Unable to load dump")
}

/// Name of the per-project database: `<db>_<project>`.
///
/// The name is spliced into SQL as a quoted identifier, so only
/// `[A-Za-z0-9_$-]` is accepted.
fn project_database(db: &str, project: &str) -> Result<String> {
    let name = format!("{}_{}", db, project);
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '-'));
    if db.is_empty() || project.is_empty() || !valid_chars || name.len() > MAX_DATABASE_NAME_LEN {
        return Err(anyhow!(CiError::Database(format!(
            "'{}' is not a valid database name (letters, digits, '_', '$' and '-', at most {} characters)",
            name, MAX_DATABASE_NAME_LEN
        ))));
    }
    Ok(name)
}

fn create_database_sql(name: &str) -> String {
    format!("CREATE DATABASE IF NOT EXISTS `{}`", name)
}

fn create_database(args: &DbArgs, name: &str) -> Result<()> {
    let mut command = args.client("mysql");
    command.arg("-e").arg(create_database_sql(name));
    process::run(command)
}

fn dump_database(args: &DbArgs) -> Result<()> {
    let dump_file = args.dump_file();
    let mut command = args.client("mysqldump");
    command.arg(&args.db);
    println!("performing dump {}", process::describe(&command));

    let file = File::create(&dump_file)
        .with_context(|| format!("Unable to create {}", dump_file.display()))?;
    command.stdout(Stdio::from(file));
    process::run(command)
}

fn load_dump(args: &DbArgs, project_db: &str) -> Result<()> {
    let dump_file = args.dump_file();
    let mut command = args.client("mysql");
    command.arg(project_db);
    println!("loading dump {}", process::describe(&command));

    let (file, size) = open_dump(&dump_file)?;
    let bar = ui::byte_progress(size);
    let mut reader = bar.wrap_read(file);
    match process::run_with_input(command, &mut reader) {
        Ok(()) => {
            bar.finish();
            Ok(())
        }
        Err(e) => {
            bar.abandon();
            Err(e)
        }
    }
}

fn open_dump(path: &Path) -> Result<(File, u64)> {
    let file = File::open(path)
        .with_context(|| format!("Unable to open dump file {}", path.display()))?;
    let size = file
        .metadata()
        .with_context(|| format!("Unable to stat {}", path.display()))?
        .len();
    Ok((file, size))
}
