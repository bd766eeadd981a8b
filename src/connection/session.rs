//! Session state for Exasol database connections.
//!
//! A connection moves through `Unopened -> Open -> Closed` exactly once. The
//! session descriptor only exists while the connection is open, so a failed
//! handshake or a closed connection cannot expose a stale session id.

use crate::transport::messages::AuthResponse;

/// Session descriptor returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    /// Server-assigned session id
    pub session_id: u64,
    /// Negotiated protocol version
    pub protocol_version: u8,
    /// Database release
    pub release_version: String,
    pub database_name: String,
    pub product_name: String,
    /// Largest message the server accepts, in bytes
    pub max_data_message_size: u64,
    pub max_identifier_length: u32,
    pub max_varchar_length: u64,
    pub identifier_quote_string: String,
    pub time_zone: String,
    pub time_zone_behavior: String,
}

impl From<AuthResponse> for SessionInfo {
    fn from(response: AuthResponse) -> Self {
        Self {
            session_id: response.session_id,
            protocol_version: response.protocol_version,
            release_version: response.release_version,
            database_name: response.database_name,
            product_name: response.product_name,
            max_data_message_size: response.max_data_message_size,
            max_identifier_length: response.max_identifier_length,
            max_varchar_length: response.max_varchar_length,
            identifier_quote_string: response.identifier_quote_string,
            time_zone: response.time_zone,
            time_zone_behavior: response.time_zone_behavior,
        }
    }
}

/// Lifecycle state of a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// Transport dialed, handshake not completed
    #[default]
    Unopened,
    /// Handshake completed
    Open(SessionInfo),
    /// Terminal
    Closed,
}

impl ConnectionState {
    /// Check if the session accepts commands.
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open(_))
    }

    /// Check if the connection reached its terminal state.
    pub fn is_closed(&self) -> bool {
        matches!(self, ConnectionState::Closed)
    }

    /// Session descriptor, only while open.
    pub fn session(&self) -> Option<&SessionInfo> {
        match self {
            ConnectionState::Open(session) => Some(session),
            _ => None,
        }
    }

    /// Enter `Open`. Only valid from `Unopened`; returns `false` otherwise.
    pub fn open(&mut self, session: SessionInfo) -> bool {
        if *self != ConnectionState::Unopened {
            return false;
        }
        tracing::debug!(session_id = session.session_id, "session opened");
        *self = ConnectionState::Open(session);
        true
    }

    /// Enter `Closed` and return the previous state.
    pub fn close(&mut self) -> ConnectionState {
        std::mem::replace(self, ConnectionState::Closed)
    }
}
