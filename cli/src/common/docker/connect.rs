//! # CI Docker Connection Helper
//!
//! File: cli/src/common/docker/connect.rs
//!
//! ## Overview
//!
//! This module establishes the single Docker connection a command uses. The
//! endpoint comes from `--docker` / `CI_DOCKER` / config and may be a unix
//! socket or a plain-HTTP TCP address. A connection only counts as established
//! once the daemon answers a `ping`; anything else is a `CiError::Connection`
//! and the command stops there.
//!
//! ## Architecture
//!
//! - `parse_endpoint` classifies the endpoint string (pure, tested directly).
//! - `connect_docker` builds a `bollard::Docker` client for it and pings.
//!
use crate::core::error::{CiError, Result};
use anyhow::anyhow;
use bollard::{Docker, API_DEFAULT_VERSION};
use tracing::{debug, info, instrument};

/// Request timeout, in seconds, applied to every Docker API call.
const DOCKER_TIMEOUT_SECS: u64 = 120;

/// A Docker endpoint address, classified by transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Path to a local unix socket.
    Unix(String),
    /// `HOST:PORT` of a daemon listening on plain HTTP.
    Http(String),
}

/// Classifies an endpoint string.
///
/// Accepts `unix://PATH`, a bare absolute socket path, `tcp://HOST:PORT` and
/// `http://HOST:PORT`.
///
/// # Errors
///
/// `CiError::Connection` for any other scheme or an empty address.
pub fn parse_endpoint(endpoint: &str) -> Result<Endpoint> {
    let parsed = if let Some(path) = endpoint.strip_prefix("unix://") {
        Endpoint::Unix(path.to_string())
    } else if endpoint.starts_with('/') {
        Endpoint::Unix(endpoint.to_string())
    } else if let Some(addr) = endpoint
        .strip_prefix("tcp://")
        .or_else(|| endpoint.strip_prefix("http://"))
    {
        Endpoint::Http(addr.trim_end_matches('/').to_string())
    } else {
        return Err(unsupported(endpoint));
    };
    match &parsed {
        Endpoint::Unix(path) | Endpoint::Http(path) if path.is_empty() => Err(unsupported(endpoint)),
        _ => Ok(parsed),
    }
}

fn unsupported(endpoint: &str) -> anyhow::Error {
    anyhow!(CiError::Connection {
        endpoint: endpoint.to_string(),
        reason: "unsupported endpoint address (expected unix://, tcp:// or http://)".to_string(),
    })
}

/// Opens a Docker client for `endpoint` and verifies it with a `ping`.
///
/// # Errors
///
/// `CiError::Connection` if the address is unsupported, the client cannot be
/// created, or the daemon does not answer the ping.
#[instrument]
pub async fn connect_docker(endpoint: &str) -> Result<Docker> {
    let connection_error = |reason: String| {
        anyhow!(CiError::Connection {
            endpoint: endpoint.to_string(),
            reason,
        })
    };

    let docker = match parse_endpoint(endpoint)? {
        Endpoint::Unix(path) => {
            debug!("Connecting to docker over unix socket {}", path);
            connect_unix(&path)
        }
        Endpoint::Http(addr) => {
            debug!("Connecting to docker over http at {}", addr);
            Docker::connect_with_http(&addr, DOCKER_TIMEOUT_SECS, API_DEFAULT_VERSION)
        }
    }
    .map_err(|e| connection_error(e.to_string()))?;

    docker
        .ping()
        .await
        .map_err(|e| connection_error(e.to_string()))?;
    info!("Connected to docker at {}", endpoint);
    Ok(docker)
}

#[cfg(unix)]
fn connect_unix(path: &str) -> std::result::Result<Docker, bollard::errors::Error> {
    Docker::connect_with_unix(path, DOCKER_TIMEOUT_SECS, API_DEFAULT_VERSION)
}

#[cfg(not(unix))]
fn connect_unix(path: &str) -> std::result::Result<Docker, bollard::errors::Error> {
    Err(bollard::errors::Error::UnsupportedURISchemeError {
        uri: format!("unix://{}", path),
    })
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ci_error;

    #[test]
    fn test_parse_unix_endpoints() {
        assert_eq!(
            parse_endpoint("unix:///var/run/docker.sock").unwrap(),
            Endpoint::Unix("/var/run/docker.sock".into())
        );
        assert_eq!(
            parse_endpoint("/run/user/1000/docker.sock").unwrap(),
            Endpoint::Unix("/run/user/1000/docker.sock".into())
        );
    }

    #[test]
    fn test_parse_tcp_endpoints() {
        assert_eq!(
            parse_endpoint("tcp://10.1.35.1:2375").unwrap(),
            Endpoint::Http("10.1.35.1:2375".into())
        );
        assert_eq!(
            parse_endpoint("http://localhost:2375/").unwrap(),
            Endpoint::Http("localhost:2375".into())
        );
    }

    #[test]
    fn test_parse_rejects_unknown_schemes() {
        for endpoint in ["ftp://host", "docker.sock", "", "unix://", "tcp://"] {
            let err = parse_endpoint(endpoint).unwrap_err();
            assert!(
                matches!(ci_error(&err), Some(CiError::Connection { .. })),
                "endpoint {:?} should be rejected",
                endpoint
            );
        }
    }

    /// A socket path that does not exist cannot answer the ping.
    #[cfg(unix)]
    #[tokio::test]
    async fn test_connect_to_missing_socket_fails() {
        let err = connect_docker("unix:///nonexistent/ci-test/docker.sock")
            .await
            .unwrap_err();
        assert!(matches!(
            ci_error(&err),
            Some(CiError::Connection { endpoint, .. }) if endpoint == "unix:///nonexistent/ci-test/docker.sock"
        ));
    }

    #[tokio::test]
    async fn test_connect_with_unsupported_scheme_fails() {
        let err = connect_docker("ssh://build-host").await.unwrap_err();
        assert!(matches!(ci_error(&err), Some(CiError::Connection { .. })));
    }

    /// Requires a running Docker daemon at the default socket.
    #[tokio::test]
    #[ignore]
    async fn test_connect_docker_success() {
        let result = connect_docker("unix:///var/run/docker.sock").await;
        assert!(result.is_ok(), "Should connect if Docker is running");
    }
}
