//! Common test utilities for exasol-client integration tests.
//!
//! # Integration Test Prerequisites
//!
//! These integration tests require a running Exasol database instance,
//! for example the Exasol Docker image:
//!
//! ```bash
//! docker run -d --name exasol-test \
//!   -p 8563:8563 \
//!   --privileged \
//!   exasol/docker-db:latest
//! ```
//!
//! # Configuration
//!
//! | Default Constant   | Environment Variable | Default Value |
//! |--------------------|----------------------|---------------|
//! | `DEFAULT_HOST`     | `EXASOL_HOST`        | "localhost"   |
//! | `DEFAULT_PORT`     | `EXASOL_PORT`        | 8563          |
//! | `DEFAULT_USER`     | `EXASOL_USER`        | "sys"         |
//! | `DEFAULT_PASSWORD` | `EXASOL_PASSWORD`    | "exasol"      |
//!
//! Tests skip themselves when nothing listens at the configured host and port.

#![allow(dead_code)]

use exasol_client::{Connection, ConnectionParams, ExasolError};
use std::env;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8563;
pub const DEFAULT_USER: &str = "sys";
pub const DEFAULT_PASSWORD: &str = "exasol";

const ENV_EXASOL_HOST: &str = "EXASOL_HOST";
const ENV_EXASOL_PORT: &str = "EXASOL_PORT";
const ENV_EXASOL_USER: &str = "EXASOL_USER";
const ENV_EXASOL_PASSWORD: &str = "EXASOL_PASSWORD";

/// Exasol host from `EXASOL_HOST`, or the default.
pub fn get_host() -> String {
    env::var(ENV_EXASOL_HOST).unwrap_or_else(|_| DEFAULT_HOST.to_string())
}

/// Exasol port from `EXASOL_PORT`, or the default when unset or invalid.
pub fn get_port() -> u16 {
    env::var(ENV_EXASOL_PORT)
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

pub fn get_user() -> String {
    env::var(ENV_EXASOL_USER).unwrap_or_else(|_| DEFAULT_USER.to_string())
}

pub fn get_password() -> String {
    env::var(ENV_EXASOL_PASSWORD).unwrap_or_else(|_| DEFAULT_PASSWORD.to_string())
}

/// Connection string for the configured server.
///
/// Certificate validation is off since Exasol Docker uses self-signed
/// certificates.
pub fn get_test_connection_string(autocommit: bool) -> String {
    format!(
        "exasol://{}:{}@{}:{}?tls=true&validateservercertificate=0&autocommit={}",
        urlencoding::encode(&get_user()),
        urlencoding::encode(&get_password()),
        get_host(),
        get_port(),
        autocommit
    )
}

/// Open a connection to the configured server.
pub async fn get_test_connection(autocommit: bool) -> Result<Connection, ExasolError> {
    let params: ConnectionParams = get_test_connection_string(autocommit).parse()?;
    Connection::connect(params).await
}

/// Check if anything listens at the configured host and port.
pub fn is_exasol_available() -> bool {
    let addr = format!("{}:{}", get_host(), get_port());

    let socket_addrs: Vec<_> = match addr.to_socket_addrs() {
        Ok(addrs) => addrs.collect(),
        Err(_) => return false,
    };

    socket_addrs
        .iter()
        .any(|socket_addr| TcpStream::connect_timeout(socket_addr, Duration::from_secs(2)).is_ok())
}

/// Return early from a test when no server is reachable.
#[macro_export]
macro_rules! skip_if_no_exasol {
    () => {
        if !$crate::common::is_exasol_available() {
            eprintln!(
                "Skipping test: Exasol not available at {}:{}",
                $crate::common::get_host(),
                $crate::common::get_port()
            );
            return;
        }
    };
}

/// Schema name unique to this test run.
pub fn generate_test_schema_name() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    format!("TEST_INTEGRATION_{}", timestamp)
}
