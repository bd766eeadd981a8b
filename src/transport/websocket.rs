//! WebSocket transport implementation for Exasol.
//!
//! Each command and each reply travels as one WebSocket text frame.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{
    connect_async_tls_with_config, Connector, MaybeTlsStream, WebSocketStream,
};

use crate::error::TransportError;

use super::protocol::{TransportParams, TransportProtocol};

/// WebSocket transport implementation.
pub struct WebSocketTransport {
    /// WebSocket connection (None if not connected)
    ws_stream: Option<WebSocketStream<MaybeTlsStream<TcpStream>>>,
}

impl WebSocketTransport {
    /// Dial the server described by `params`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the TLS setup, the TCP connect or the
    /// WebSocket upgrade fails, or if it does not complete within
    /// `params.timeout_ms`.
    pub async fn connect(params: &TransportParams) -> Result<Self, TransportError> {
        let url = params.to_websocket_url();

        let connector = if params.use_tls {
            let tls = native_tls::TlsConnector::builder()
                .danger_accept_invalid_certs(!params.validate_server_certificate)
                .danger_accept_invalid_hostnames(!params.validate_server_certificate)
                .build()
                .map_err(|e| TransportError::TlsError(e.to_string()))?;
            Some(Connector::NativeTls(tls))
        } else {
            Some(Connector::Plain)
        };

        let connect_future = connect_async_tls_with_config(url.as_str(), None, false, connector);
        let (ws_stream, _) = tokio::time::timeout(
            tokio::time::Duration::from_millis(params.timeout_ms),
            connect_future,
        )
        .await
        .map_err(|_| {
            TransportError::IoError(format!("Connection timeout after {}ms", params.timeout_ms))
        })?
        .map_err(|e| TransportError::WebSocketError(e.to_string()))?;

        tracing::debug!(url = %url, "websocket connected");

        Ok(Self {
            ws_stream: Some(ws_stream),
        })
    }

    fn stream(
        &mut self,
    ) -> Result<&mut WebSocketStream<MaybeTlsStream<TcpStream>>, TransportError> {
        self.ws_stream.as_mut().ok_or(TransportError::NotConnected)
    }
}

#[async_trait]
impl TransportProtocol for WebSocketTransport {
    async fn send_frame(&mut self, frame: String) -> Result<(), TransportError> {
        self.stream()?
            .send(Message::Text(frame))
            .await
            .map_err(|e| TransportError::SendError(e.to_string()))
    }

    async fn receive_frame(&mut self) -> Result<String, TransportError> {
        let stream = self.stream()?;
        loop {
            let message = stream
                .next()
                .await
                .ok_or_else(|| TransportError::ReceiveError("Connection closed".to_string()))?
                .map_err(|e| TransportError::ReceiveError(e.to_string()))?;

            match message {
                Message::Text(text) => return Ok(text),
                Message::Binary(bytes) => {
                    return String::from_utf8(bytes).map_err(|e| {
                        TransportError::DeserializationError(format!(
                            "Invalid message format: {}",
                            e
                        ))
                    })
                }
                // tungstenite answers pings itself
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
                Message::Close(_) => {
                    return Err(TransportError::ReceiveError(
                        "Server closed the connection".to_string(),
                    ))
                }
            }
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        if let Some(mut ws_stream) = self.ws_stream.take() {
            ws_stream.close(None).await?;
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.ws_stream.is_some()
    }
}
