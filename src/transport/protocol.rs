//! Transport protocol abstraction trait.
//!
//! This module defines the `TransportProtocol` trait: a reliable, ordered,
//! frame-oriented duplex channel to one Exasol server. The driver writes one
//! serialized command and reads one serialized reply per exchange; everything
//! above the frame level lives in [`super::exchange`].

use crate::error::TransportError;
use async_trait::async_trait;

/// Dialing parameters for establishing a transport connection.
#[derive(Debug, Clone)]
pub struct TransportParams {
    /// Database host
    pub host: String,
    /// Database port
    pub port: u16,
    /// Use TLS/SSL
    pub use_tls: bool,
    /// Validate the server certificate when TLS is on
    pub validate_server_certificate: bool,
    /// Connection timeout in milliseconds
    pub timeout_ms: u64,
}

impl TransportParams {
    /// Create new transport parameters.
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            use_tls: true,
            validate_server_certificate: true,
            timeout_ms: 30_000, // 30 seconds default
        }
    }

    /// Set whether to use TLS.
    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    /// Set whether to validate the server certificate.
    pub fn with_validate_server_certificate(mut self, validate: bool) -> Self {
        self.validate_server_certificate = validate;
        self
    }

    /// Set connection timeout.
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Build the WebSocket URL from parameters.
    pub fn to_websocket_url(&self) -> String {
        let scheme = if self.use_tls { "wss" } else { "ws" };
        if self.host.contains(':') {
            format!("{}://[{}]:{}", scheme, self.host, self.port)
        } else {
            format!("{}://{}:{}", scheme, self.host, self.port)
        }
    }
}

/// Frame-level transport used by the command exchange.
///
/// Implementations carry opaque text frames. They do not interpret them and do
/// not pipeline: the caller always sends one frame and then waits for one.
#[async_trait]
pub trait TransportProtocol: Send + Sync {
    /// Write one frame.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the frame cannot be written.
    async fn send_frame(&mut self, frame: String) -> Result<(), TransportError>;

    /// Read the next frame.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the peer closed the channel or the read fails.
    async fn receive_frame(&mut self) -> Result<String, TransportError>;

    /// Release the underlying channel.
    ///
    /// Closing an already closed transport is a no-op.
    async fn close(&mut self) -> Result<(), TransportError>;

    /// Check if the channel is still open.
    fn is_connected(&self) -> bool;
}
