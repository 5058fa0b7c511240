//! # CI Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads the optional TOML configuration that supplies defaults for
//! the Docker endpoint, the nginx template paths and the `ci init` layout.
//! Command-line flags and `CI_*` environment variables always take precedence;
//! they are applied by the command handlers on top of the loaded `Config`.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.ci.toml` in the current directory or an ancestor
//!    (the search stops at the first directory containing `.git`)
//! 2. User-specific `config.toml` in the platform config directory
//!    (`~/.config/ci/config.toml` on Linux)
//! 3. Default values defined in the code
//!
//! After merging, `~` in paths is expanded and the result is validated.
//!
//! ## Examples
//!
//! ```toml
//! [docker]
//! endpoint = "tcp://10.1.35.1:2375"
//!
//! [nginx]
//! input = "conf/container.dev.nginx.conf"
//! output = "nginx.conf.d/container.dev.nginx.conf"
//!
//! [init]
//! dir = "/container"
//! source = "master.dev.tera-online.ru"
//! ```
//!
use crate::common::docker::connect::parse_endpoint;
use crate::core::error::{CiError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub docker: DockerConfig,
    #[serde(default)]
    pub nginx: NginxConfig,
    #[serde(default)]
    pub init: InitConfig,
}

/// Docker daemon connection settings.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DockerConfig {
    /// Endpoint address: `unix://PATH`, `tcp://HOST:PORT` or `http://HOST:PORT`.
    #[serde(default = "default_docker_endpoint")]
    pub endpoint: String,
}

/// Default template and destination for `ci nginx`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NginxConfig {
    #[serde(default = "default_nginx_input")]
    pub input: String,
    #[serde(default = "default_nginx_output")]
    pub output: String,
}

/// Layout used by `ci init` to bootstrap a project directory.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct InitConfig {
    /// Directory holding all project checkouts.
    #[serde(default = "default_init_dir")]
    pub dir: String,
    /// Name of the template checkout; `master` in it is replaced by the new project name.
    #[serde(default = "default_init_source")]
    pub source: String,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_docker_endpoint(),
        }
    }
}

impl Default for NginxConfig {
    fn default() -> Self {
        Self {
            input: default_nginx_input(),
            output: default_nginx_output(),
        }
    }
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            dir: default_init_dir(),
            source: default_init_source(),
        }
    }
}

fn default_docker_endpoint() -> String {
    "unix:///var/run/docker.sock".to_string()
}
fn default_nginx_input() -> String {
    "conf/container.dev.nginx.conf".to_string()
}
fn default_nginx_output() -> String {
    "nginx.conf.d/container.dev.nginx.conf".to_string()
}
fn default_init_dir() -> String {
    "/container".to_string()
}
fn default_init_source() -> String {
    "master.dev.tera-online.ru".to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".ci.toml";

/// Loads, merges, expands and validates configuration, searching for
/// `.ci.toml` upwards from `start`.
pub fn load_config_from(start: &Path) -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = match find_project_config_path(start) {
        Some(path) => {
            info!("Loading project configuration from: {}", path.display());
            Some(load_config_from_path(&path)?)
        }
        None => {
            debug!("No project configuration file (.ci.toml) found.");
            None
        }
    };
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "ci") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Field-wise merge: a project value wins whenever it differs from the default.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let Some(project_cfg) = project else {
        return user;
    };
    fn pick(project: String, user: String, default: String) -> String {
        if project != default {
            project
        } else {
            user
        }
    }
    Config {
        docker: DockerConfig {
            endpoint: pick(
                project_cfg.docker.endpoint,
                user.docker.endpoint,
                default_docker_endpoint(),
            ),
        },
        nginx: NginxConfig {
            input: pick(
                project_cfg.nginx.input,
                user.nginx.input,
                default_nginx_input(),
            ),
            output: pick(
                project_cfg.nginx.output,
                user.nginx.output,
                default_nginx_output(),
            ),
        },
        init: InitConfig {
            dir: pick(project_cfg.init.dir, user.init.dir, default_init_dir()),
            source: pick(
                project_cfg.init.source,
                user.init.source,
                default_init_source(),
            ),
        },
    }
}

fn expand_config_paths(config: &mut Config) {
    config.nginx.input = shellexpand::tilde(&config.nginx.input).into_owned();
    config.nginx.output = shellexpand::tilde(&config.nginx.output).into_owned();
    config.init.dir = shellexpand::tilde(&config.init.dir).into_owned();
    debug!(
        "Expanded paths: nginx.input={}, nginx.output={}, init.dir={}",
        config.nginx.input, config.nginx.output, config.init.dir
    );
}

fn validate_config(config: &Config) -> Result<()> {
    parse_endpoint(&config.docker.endpoint).map_err(|_| {
        anyhow!(CiError::Config(format!(
            "Unsupported docker endpoint '{}'. Expected unix://, tcp:// or http://.",
            config.docker.endpoint
        )))
    })?;
    if config.init.source.is_empty() {
        return Err(anyhow!(CiError::Config(
            "init.source cannot be empty.".to_string()
        )));
    }
    if config.nginx.input.is_empty() || config.nginx.output.is_empty() {
        return Err(anyhow!(CiError::Config(
            "nginx.input and nginx.output cannot be empty.".to_string()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [docker]
            endpoint = "tcp://10.1.35.1:2375"

            [init]
            source = "master.stage.example.org"
        "#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");

        assert_eq!(config.docker.endpoint, "tcp://10.1.35.1:2375");
        assert_eq!(config.init.source, "master.stage.example.org");
        assert_eq!(config.init.dir, default_init_dir());
        assert_eq!(config.nginx, NginxConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[docker]\nhost = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_prefers_non_default_project_values() {
        let user = Config {
            docker: DockerConfig {
                endpoint: "tcp://user-host:2375".into(),
            },
            init: InitConfig {
                dir: "/srv/checkouts".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let project = Config {
            nginx: NginxConfig {
                input: "deploy/nginx.conf.tmpl".into(),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = merge_configs(user, Some(project));

        assert_eq!(merged.docker.endpoint, "tcp://user-host:2375");
        assert_eq!(merged.init.dir, "/srv/checkouts");
        assert_eq!(merged.nginx.input, "deploy/nginx.conf.tmpl");
        assert_eq!(merged.nginx.output, default_nginx_output());
    }

    #[test]
    fn test_path_expansion() {
        let mut config = Config {
            init: InitConfig {
                dir: "~/containers".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        expand_config_paths(&mut config);

        let home_dir = dirs::home_dir().unwrap();
        assert_eq!(
            config.init.dir,
            home_dir.join("containers").to_string_lossy()
        );
        assert_eq!(config.nginx.input, default_nginx_input());
    }

    #[test]
    fn test_validate_rejects_unsupported_endpoint() {
        let config = Config {
            docker: DockerConfig {
                endpoint: "ftp://example.org".into(),
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unsupported docker endpoint"));
    }

    #[test]
    fn test_validate_rejects_empty_source() {
        let config = Config {
            init: InitConfig {
                source: String::new(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_project_config_found_in_ancestor() {
        let root = tempdir().unwrap();
        let nested = root.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            root.path().join(PROJECT_CONFIG_FILENAME),
            "[nginx]\noutput = \"out/site.conf\"\n",
        )
        .unwrap();

        let found = find_project_config_path(&nested).unwrap();
        assert_eq!(found, root.path().join(PROJECT_CONFIG_FILENAME));

        let config = load_config_from(&nested).unwrap();
        assert_eq!(config.nginx.output, "out/site.conf");
    }

    #[test]
    fn test_project_config_search_stops_at_git_dir() {
        let root = tempdir().unwrap();
        let repo = root.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();
        fs::write(
            root.path().join(PROJECT_CONFIG_FILENAME),
            "[init]\ndir = \"/elsewhere\"\n",
        )
        .unwrap();

        assert!(find_project_config_path(&repo).is_none());
    }

    #[test]
    fn test_invalid_project_config_reports_path() {
        let root = tempdir().unwrap();
        fs::write(root.path().join(PROJECT_CONFIG_FILENAME), "not = [valid").unwrap();
        let err = load_config_from(root.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }
}
