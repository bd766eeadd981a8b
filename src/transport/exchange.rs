//! Command/response exchange over a frame transport.
//!
//! One exchange is exactly one frame written followed by one frame read. The
//! protocol is strictly synchronous, so the reply read is always the answer to
//! the command just written.

use serde::de::{DeserializeOwned, IgnoredAny};

use crate::error::{ExasolError, QueryError, TransportError};

use super::messages::{ExceptionInfo, Request, Response};
use super::protocol::TransportProtocol;

/// Sends typed commands and decodes typed replies.
pub struct CommandExchange {
    transport: Box<dyn TransportProtocol>,
}

impl CommandExchange {
    /// Wrap a connected transport.
    pub fn new(transport: Box<dyn TransportProtocol>) -> Self {
        Self { transport }
    }

    /// Send `request` and decode the reply payload.
    ///
    /// # Errors
    ///
    /// - `TransportError` other than deserialization when the frame cannot be
    ///   written or read; the connection must be discarded
    /// - `TransportError::DeserializationError` when the reply is not valid
    /// - `QueryError::Server` when the server reports a failure status
    /// - `QueryError::MalformedResponse` when a successful reply has no payload
    pub async fn send<Q, R>(&mut self, request: &Q) -> Result<R, ExasolError>
    where
        Q: Request,
        R: DeserializeOwned,
    {
        self.round_trip::<Q, R>(request).await?.ok_or_else(|| {
            QueryError::MalformedResponse(format!("{} returned no response data", request.name()))
                .into()
        })
    }

    /// Send `request` when no payload is expected back.
    ///
    /// Any payload the server does send is skipped.
    pub async fn send_without_data<Q>(&mut self, request: &Q) -> Result<(), ExasolError>
    where
        Q: Request,
    {
        self.round_trip::<Q, IgnoredAny>(request).await.map(|_| ())
    }

    async fn round_trip<Q, R>(&mut self, request: &Q) -> Result<Option<R>, ExasolError>
    where
        Q: Request,
        R: DeserializeOwned,
    {
        let frame = serde_json::to_string(request).map_err(TransportError::from)?;

        tracing::debug!(command = request.name(), "sending command");
        self.transport.send_frame(frame).await?;
        let reply = self.transport.receive_frame().await?;

        let response: Response<R> = serde_json::from_str(&reply)
            .map_err(|e| TransportError::DeserializationError(e.to_string()))?;

        check_status(&response.status, response.exception)?;
        Ok(response.response_data)
    }

    /// Release the transport.
    pub async fn close(&mut self) -> Result<(), TransportError> {
        self.transport.close().await
    }

    /// Whether the underlying transport is still open.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }
}

impl std::fmt::Debug for CommandExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandExchange")
            .field("connected", &self.transport.is_connected())
            .finish()
    }
}

/// Turn a non-"ok" status into the server's error.
fn check_status(status: &str, exception: Option<ExceptionInfo>) -> Result<(), QueryError> {
    if status == "ok" {
        return Ok(());
    }
    Err(match exception {
        Some(e) => QueryError::Server {
            sql_code: e.sql_code.unwrap_or_else(|| "unknown".to_string()),
            message: e.text,
        },
        None => QueryError::Server {
            sql_code: "unknown".to_string(),
            message: format!("Command failed with status '{}'", status),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::transport::messages::{Command, SqlQueriesResponse};
    use crate::transport::testing::{MockTransport, ScriptedTransport};
    use serde_json::json;

    fn execute(sql: &str) -> Command {
        Command::Execute {
            sql_text: sql.to_string(),
            attributes: None,
        }
    }

    #[tokio::test]
    async fn test_send_decodes_payload() {
        let script = ScriptedTransport::new();
        script.ok(json!({"numResults": 1, "results": [{"resultType": "rowCount", "rowCount": 3}]}));
        let mut exchange = CommandExchange::new(Box::new(script.clone()));

        let response: SqlQueriesResponse = exchange.send(&execute("DELETE FROM t")).await.unwrap();
        assert_eq!(response.num_results, 1);

        let sent = script.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["command"], json!("execute"));
        assert_eq!(sent[0]["sqlText"], json!("DELETE FROM t"));
    }

    #[tokio::test]
    async fn test_server_error_carries_message() {
        let script = ScriptedTransport::new();
        script.error("42000", "object T not found");
        let mut exchange = CommandExchange::new(Box::new(script));

        let err = exchange
            .send::<_, SqlQueriesResponse>(&execute("SELECT * FROM t"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Server);
        match err {
            ExasolError::Query(QueryError::Server { sql_code, message }) => {
                assert_eq!(sql_code, "42000");
                assert!(message.contains("object T not found"));
            }
            other => panic!("Expected server error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_payload_is_malformed() {
        let script = ScriptedTransport::new();
        script.ok_empty();
        let mut exchange = CommandExchange::new(Box::new(script));

        let err = exchange
            .send::<_, SqlQueriesResponse>(&execute("SELECT 1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_undecodable_reply_is_malformed() {
        let script = ScriptedTransport::new();
        script.raw("this is not json");
        let mut exchange = CommandExchange::new(Box::new(script));

        let err = exchange.send_without_data(&Command::Disconnect).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_send_without_data_ignores_payload() {
        let script = ScriptedTransport::new();
        script.ok(json!({"anything": [1, 2, 3]}));
        let mut exchange = CommandExchange::new(Box::new(script));

        assert!(exchange.send_without_data(&Command::Disconnect).await.is_ok());
    }

    #[tokio::test]
    async fn test_send_failure_is_bad_connection() {
        let mut transport = MockTransport::new();
        transport
            .expect_send_frame()
            .times(1)
            .returning(|_| Err(TransportError::SendError("broken pipe".to_string())));
        let mut exchange = CommandExchange::new(Box::new(transport));

        let err = exchange.send_without_data(&Command::Disconnect).await.unwrap_err();
        assert!(err.is_bad_connection());
    }

    #[tokio::test]
    async fn test_one_write_then_one_read() {
        let mut seq = mockall::Sequence::new();
        let mut transport = MockTransport::new();
        transport
            .expect_send_frame()
            .withf(|frame| frame.contains("\"command\":\"disconnect\""))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        transport
            .expect_receive_frame()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(r#"{"status":"ok"}"#.to_string()));
        let mut exchange = CommandExchange::new(Box::new(transport));

        exchange.send_without_data(&Command::Disconnect).await.unwrap();
    }

    #[test]
    fn test_check_status() {
        assert!(check_status("ok", None).is_ok());

        let err = check_status(
            "error",
            Some(ExceptionInfo {
                sql_code: None,
                text: "boom".to_string(),
            }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown"));
        assert!(err.to_string().contains("boom"));

        let err = check_status("error", None).unwrap_err();
        assert!(err.to_string().contains("status 'error'"));
    }
}
