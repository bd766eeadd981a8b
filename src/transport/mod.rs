//! Transport layer for Exasol database communication.
//!
//! # Architecture
//!
//! The transport layer is organized into:
//! - `protocol` - frame transport trait and dialing parameters
//! - `websocket` - WebSocket implementation of the trait
//! - `messages` - command and reply envelopes
//! - `exchange` - one command out, one typed reply in
//! - `deserialize` - column-major result decoding
//!
//! # Example
//!
//! ```no_run
//! use exasol_client::transport::{
//!     CommandExchange, Command, SqlQueriesResponse, TransportParams, WebSocketTransport,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let params = TransportParams::new("localhost".to_string(), 8563);
//! let transport = WebSocketTransport::connect(&params).await?;
//! let mut exchange = CommandExchange::new(Box::new(transport));
//!
//! // A session has to be established before commands are accepted.
//! let reply: SqlQueriesResponse = exchange
//!     .send(&Command::Execute { sql_text: "SELECT 1".to_string(), attributes: None })
//!     .await?;
//! println!("results: {}", reply.num_results);
//! # Ok(())
//! # }
//! ```

pub mod deserialize;
pub mod exchange;
pub mod messages;
pub mod protocol;
pub mod websocket;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use exchange::CommandExchange;
pub use messages::{
    Attributes, ColumnInfo, Command, DataType, Request, SqlQueriesResponse, SqlResult,
};
pub use protocol::{TransportParams, TransportProtocol};
pub use websocket::WebSocketTransport;
