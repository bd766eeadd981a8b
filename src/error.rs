//! Error types for exasol-client.
//!
//! Errors are grouped by the layer that detects them. Every error can be
//! classified with [`ExasolError::kind`] into the categories callers act on:
//! local usage mistakes, server-reported failures, broken connections,
//! malformed responses and invalid configuration.

use std::fmt;
use thiserror::Error;

/// Top-level error type encompassing all possible errors.
#[derive(Error, Debug)]
pub enum ExasolError {
    /// Connection lifecycle, configuration and authentication errors
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Statement execution errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Transport errors
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors related to database connections.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Failed to establish connection to the database
    #[error("Failed to connect to {host}:{port}: {message}")]
    ConnectionFailed {
        host: String,
        port: u16,
        message: String,
    },

    /// Authentication failure reported by the server
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The server public key could not be used to encrypt the password
    #[error("Password encryption failed: {0}")]
    PasswordEncryption(String),

    /// Invalid connection parameters
    #[error("Invalid connection parameter '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Connection string parsing error
    #[error("Failed to parse connection string: {0}")]
    ParseError(String),

    /// Connection is closed or was never opened
    #[error("Connection already closed")]
    ConnectionClosed,

    /// A transaction was requested while the session runs in autocommit mode
    #[error("Autocommit is enabled, transactions are not available")]
    AutocommitEnabled,
}

/// Errors related to statement execution.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The server rejected the command
    #[error("Server error [{sql_code}]: {message}")]
    Server { sql_code: String, message: String },

    /// Bound values do not fill whole rows of the prepared statement
    #[error("Invalid number of values: {values} values cannot be split across {columns} columns")]
    InvalidValuesCount { values: usize, columns: usize },

    /// The server answered with data the driver cannot interpret
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A bound value cannot be encoded for the wire
    #[error("Invalid parameter at index {index}: {message}")]
    InvalidParameter { index: usize, message: String },

    /// Result set not available
    #[error("Result set not available: {0}")]
    NoResultSet(String),
}

/// Errors related to the transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// WebSocket connection error
    #[error("WebSocket error: {0}")]
    WebSocketError(String),

    /// Message serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Message deserialization error
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// Transport used before it was connected or after it was closed
    #[error("Not connected")]
    NotConnected,

    /// Network I/O error
    #[error("Network I/O error: {0}")]
    IoError(String),

    /// Message send error
    #[error("Failed to send message: {0}")]
    SendError(String),

    /// Message receive error
    #[error("Failed to receive message: {0}")]
    ReceiveError(String),

    /// TLS/SSL error
    #[error("TLS error: {0}")]
    TlsError(String),
}

/// Classification of errors by how callers are expected to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Misuse detected locally; nothing was sent to the server
    Usage,
    /// The server reported a failure; the connection stays usable
    Server,
    /// The transport failed; the connection must be discarded
    BadConnection,
    /// The server reply could not be interpreted
    MalformedResponse,
    /// Invalid connection parameters
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Usage => write!(f, "USAGE"),
            ErrorKind::Server => write!(f, "SERVER"),
            ErrorKind::BadConnection => write!(f, "BAD_CONNECTION"),
            ErrorKind::MalformedResponse => write!(f, "MALFORMED_RESPONSE"),
            ErrorKind::Configuration => write!(f, "CONFIGURATION"),
        }
    }
}

impl ExasolError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExasolError::Connection(e) => e.kind(),
            ExasolError::Query(e) => e.kind(),
            ExasolError::Transport(e) => e.kind(),
        }
    }

    /// Whether the connection that produced this error must be discarded.
    pub fn is_bad_connection(&self) -> bool {
        self.kind() == ErrorKind::BadConnection
    }
}

impl ConnectionError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConnectionError::InvalidParameter { .. } | ConnectionError::ParseError(_) => {
                ErrorKind::Configuration
            }
            ConnectionError::ConnectionClosed | ConnectionError::AutocommitEnabled => {
                ErrorKind::Usage
            }
            ConnectionError::AuthenticationFailed(_) => ErrorKind::Server,
            ConnectionError::PasswordEncryption(_) => ErrorKind::MalformedResponse,
            _ => ErrorKind::BadConnection,
        }
    }
}

impl QueryError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::Server { .. } => ErrorKind::Server,
            QueryError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            _ => ErrorKind::Usage,
        }
    }
}

impl TransportError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransportError::DeserializationError(_) => ErrorKind::MalformedResponse,
            TransportError::SerializationError(_) => ErrorKind::Usage,
            _ => ErrorKind::BadConnection,
        }
    }
}

// Conversions from external error types
impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::SerializationError(err.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for TransportError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        TransportError::WebSocketError(err.to_string())
    }
}
