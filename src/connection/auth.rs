//! Authentication handling for Exasol connections.
//!
//! Login is a two-step exchange: `login` announces the protocol version and
//! returns the server's RSA public key, then the credential message carries
//! the password encrypted with that key.

use crate::connection::params::ConnectionParams;
use crate::connection::session::SessionInfo;
use crate::error::{ConnectionError, ExasolError, QueryError};
use crate::transport::messages::{AuthRequest, AuthResponse, PublicKeyResponse};
use crate::transport::{Attributes, Command, CommandExchange};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rsa::{BigUint, Pkcs1v15Encrypt, RsaPublicKey};
use std::fmt;
use std::sync::Arc;

/// Secure credentials container.
///
/// This struct ensures credentials are never accidentally logged or displayed.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: Arc<SecureString>,
}

impl Credentials {
    /// Create new credentials.
    pub fn new(username: String, password: String) -> Self {
        Self {
            username,
            password: Arc::new(SecureString::new(password)),
        }
    }

    /// Get the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Get the password (for internal use only).
    pub(crate) fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credentials(username: {})", self.username)
    }
}

/// String that zeros its bytes on drop and never displays its contents.
struct SecureString {
    data: String,
}

impl SecureString {
    fn new(data: String) -> Self {
        Self { data }
    }

    fn as_str(&self) -> &str {
        &self.data
    }
}

impl Drop for SecureString {
    fn drop(&mut self) {
        let mut bytes = std::mem::take(&mut self.data).into_bytes();
        bytes.iter_mut().for_each(|byte| *byte = 0);
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureString(<redacted>)")
    }
}

/// Encrypt `password` with the key from the `login` reply.
///
/// The key arrives as a hex modulus and a hex exponent. The ciphertext uses
/// PKCS#1 v1.5 padding and is returned base64 encoded.
pub fn encrypt_password(
    password: &str,
    modulus_hex: &str,
    exponent_hex: &str,
) -> Result<String, ConnectionError> {
    let modulus = hex::decode(modulus_hex.trim())
        .map_err(|e| ConnectionError::PasswordEncryption(format!("invalid key modulus: {}", e)))?;
    let exponent = u64::from_str_radix(exponent_hex.trim(), 16)
        .map_err(|e| ConnectionError::PasswordEncryption(format!("invalid key exponent: {}", e)))?;

    let key = RsaPublicKey::new(BigUint::from_bytes_be(&modulus), BigUint::from(exponent))
        .map_err(|e| ConnectionError::PasswordEncryption(e.to_string()))?;

    let encrypted = key
        .encrypt(&mut rand::thread_rng(), Pkcs1v15Encrypt, password.as_bytes())
        .map_err(|e| ConnectionError::PasswordEncryption(e.to_string()))?;

    Ok(STANDARD.encode(encrypted))
}

/// Login name of the local OS user, when it can be resolved.
pub(crate) fn os_username() -> Option<String> {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|name| !name.is_empty())
}

/// Handler for the login handshake.
pub struct AuthenticationHandler {
    credentials: Credentials,
    protocol_version: u8,
    attributes: Attributes,
    client_name: String,
    client_version: String,
}

impl AuthenticationHandler {
    /// Create a new authentication handler.
    pub fn new(credentials: Credentials, client_name: String, client_version: String) -> Self {
        Self {
            credentials,
            protocol_version: 1,
            attributes: Attributes::autocommit(true),
            client_name,
            client_version,
        }
    }

    /// Handler configured from connection parameters.
    pub fn from_params(params: &ConnectionParams) -> Self {
        let credentials = Credentials::new(params.username.clone(), params.password().to_string());
        let mut handler = Self::new(
            credentials,
            params.client_name.clone(),
            params.client_version.clone(),
        );
        handler.protocol_version = params.protocol_version;
        handler.attributes = Attributes {
            autocommit: Some(params.autocommit),
            current_schema: params.schema.clone(),
        };
        handler
    }

    /// First message of the handshake.
    pub fn build_login_command(&self) -> Command {
        Command::Login {
            protocol_version: self.protocol_version,
            attributes: Attributes::autocommit(self.autocommit()),
        }
    }

    /// Credential message for the key returned by `login`.
    pub fn build_auth_request(
        &self,
        public_key: &PublicKeyResponse,
    ) -> Result<AuthRequest, ConnectionError> {
        let password = encrypt_password(
            self.credentials.password(),
            &public_key.public_key_modulus,
            &public_key.public_key_exponent,
        )?;

        Ok(AuthRequest {
            username: self.credentials.username().to_string(),
            password,
            use_compression: false,
            client_name: self.client_name.clone(),
            driver_name: format!("exasol-client {}", env!("CARGO_PKG_VERSION")),
            client_os: std::env::consts::OS.to_string(),
            client_os_username: os_username(),
            client_version: self.client_version.clone(),
            client_runtime: "Rust".to_string(),
            attributes: self.attributes.clone(),
        })
    }

    /// Run both handshake steps on `exchange`.
    ///
    /// A server rejection of the credential message is reported as
    /// `ConnectionError::AuthenticationFailed`; every other failure is
    /// returned as is.
    pub async fn authenticate(
        &self,
        exchange: &mut CommandExchange,
    ) -> Result<SessionInfo, ExasolError> {
        let public_key: PublicKeyResponse = exchange.send(&self.build_login_command()).await?;

        let request = self.build_auth_request(&public_key)?;
        let response: AuthResponse = match exchange.send(&request).await {
            Ok(response) => response,
            Err(ExasolError::Query(QueryError::Server { sql_code, message })) => {
                return Err(ConnectionError::AuthenticationFailed(format!(
                    "{} ({})",
                    message, sql_code
                ))
                .into())
            }
            Err(e) => return Err(e),
        };

        Ok(SessionInfo::from(response))
    }

    fn autocommit(&self) -> bool {
        self.attributes.autocommit.unwrap_or(true)
    }
}

impl fmt::Debug for AuthenticationHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationHandler")
            .field("credentials", &self.credentials)
            .field("protocol_version", &self.protocol_version)
            .field("attributes", &self.attributes)
            .field("client_name", &self.client_name)
            .field("client_version", &self.client_version)
            .finish()
    }
}
