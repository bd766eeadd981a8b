//! WebSocket message types for the Exasol protocol.
//!
//! Every request is a JSON object whose `command` field names its kind; the
//! only exception is the credential message of the login handshake, which the
//! server expects right after `login` without a discriminator. Every reply is a
//! [`Response`] envelope carrying a status and either a payload or an exception.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::deserialize::to_row_major_option;

/// A message the driver can send.
pub trait Request: Serialize + Send + Sync {
    /// Name used in logs; never includes the payload.
    fn name(&self) -> &'static str;
}

/// Session attributes sent along with commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    /// Autocommit mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocommit: Option<bool>,
    /// Schema opened for the session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_schema: Option<String>,
}

impl Attributes {
    /// Attributes carrying only the autocommit flag.
    pub fn autocommit(autocommit: bool) -> Self {
        Self {
            autocommit: Some(autocommit),
            current_schema: None,
        }
    }
}

/// Tagged command envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    /// First step of the login handshake
    #[serde(rename_all = "camelCase")]
    Login {
        protocol_version: u8,
        attributes: Attributes,
    },
    /// Direct execution of SQL text
    #[serde(rename_all = "camelCase")]
    Execute {
        sql_text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        attributes: Option<Attributes>,
    },
    /// Create a server-side prepared statement
    #[serde(rename_all = "camelCase")]
    CreatePreparedStatement { sql_text: String },
    /// Execute a prepared statement with column-major data
    #[serde(rename_all = "camelCase")]
    ExecutePreparedStatement {
        statement_handle: i64,
        num_columns: usize,
        num_rows: usize,
        columns: Vec<ColumnInfo>,
        data: Vec<Vec<Value>>,
    },
    /// Release a prepared statement
    #[serde(rename_all = "camelCase")]
    ClosePreparedStatement { statement_handle: i64 },
    /// Fetch more rows of an open result set
    #[serde(rename_all = "camelCase")]
    Fetch {
        result_set_handle: i64,
        start_position: u64,
        num_bytes: u64,
    },
    /// Release open result sets
    #[serde(rename_all = "camelCase")]
    CloseResultSet { result_set_handles: Vec<i64> },
    /// End the session
    Disconnect,
}

impl Request for Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Login { .. } => "login",
            Command::Execute { .. } => "execute",
            Command::CreatePreparedStatement { .. } => "createPreparedStatement",
            Command::ExecutePreparedStatement { .. } => "executePreparedStatement",
            Command::ClosePreparedStatement { .. } => "closePreparedStatement",
            Command::Fetch { .. } => "fetch",
            Command::CloseResultSet { .. } => "closeResultSet",
            Command::Disconnect => "disconnect",
        }
    }
}

/// Second step of the login handshake.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    pub username: String,
    /// Base64 of the RSA-encrypted password
    pub password: String,
    pub use_compression: bool,
    pub client_name: String,
    pub driver_name: String,
    pub client_os: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_os_username: Option<String>,
    pub client_version: String,
    pub client_runtime: String,
    pub attributes: Attributes,
}

impl Request for AuthRequest {
    fn name(&self) -> &'static str {
        "authenticate"
    }
}

/// Reply envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    /// "ok" or "error"
    pub status: String,
    /// Command-specific payload
    pub response_data: Option<T>,
    /// Exception information if failed
    pub exception: Option<ExceptionInfo>,
}

/// Exception information from Exasol.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionInfo {
    /// SQL state code
    pub sql_code: Option<String>,
    /// Error message
    pub text: String,
}

/// Public key returned by `login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyResponse {
    /// Hex-encoded RSA modulus
    pub public_key_modulus: String,
    /// Hex-encoded RSA exponent
    pub public_key_exponent: String,
    /// PEM rendering of the same key
    pub public_key_pem: Option<String>,
}

/// Session descriptor returned by the credential message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub session_id: u64,
    pub protocol_version: u8,
    pub release_version: String,
    pub database_name: String,
    pub product_name: String,
    pub max_data_message_size: u64,
    #[serde(default)]
    pub max_identifier_length: u32,
    #[serde(default)]
    pub max_varchar_length: u64,
    #[serde(default)]
    pub identifier_quote_string: String,
    #[serde(default)]
    pub time_zone: String,
    #[serde(default)]
    pub time_zone_behavior: String,
}

/// Payload of `execute` and `executePreparedStatement`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlQueriesResponse {
    /// Number of logical results
    pub num_results: usize,
    /// The results, in statement order
    #[serde(default)]
    pub results: Vec<SqlResult>,
}

/// One logical result of an execution.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "resultType", rename_all = "camelCase")]
pub enum SqlResult {
    /// Row-returning result
    #[serde(rename_all = "camelCase")]
    ResultSet { result_set: ResultSetData },
    /// Update count
    #[serde(rename_all = "camelCase")]
    RowCount { row_count: i64 },
}

/// Rows and column descriptors of a row-returning result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSetData {
    /// Present when more rows remain on the server
    pub result_set_handle: Option<i64>,
    pub num_columns: usize,
    pub num_rows: u64,
    #[serde(default)]
    pub num_rows_in_message: u64,
    pub columns: Vec<ColumnInfo>,
    /// Row-major after decoding
    #[serde(default, deserialize_with = "to_row_major_option")]
    pub data: Option<Vec<Vec<Value>>>,
}

/// Payload of `fetch`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResponse {
    /// Number of rows in this message
    pub num_rows: u64,
    /// Row-major after decoding
    #[serde(default, deserialize_with = "to_row_major_option")]
    pub data: Option<Vec<Vec<Value>>>,
}

/// Payload of `createPreparedStatement`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePreparedStatementResponse {
    pub statement_handle: i64,
    pub parameter_data: Option<ParameterData>,
}

/// Bind parameter descriptors of a prepared statement.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterData {
    pub num_columns: usize,
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// Data type
    pub data_type: DataType,
}

/// Exasol data type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataType {
    /// Type name
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_set: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_local_time_zone: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraction: Option<i32>,
}

impl DataType {
    /// A type with only its name set.
    pub fn named(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            precision: None,
            scale: None,
            size: None,
            character_set: None,
            with_local_time_zone: None,
            fraction: None,
        }
    }
}
