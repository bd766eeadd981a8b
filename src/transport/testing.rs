//! Transport doubles for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockall::mock;
use serde_json::{json, Value};

use crate::error::TransportError;

use super::protocol::TransportProtocol;

mock! {
    pub Transport {}

    #[async_trait]
    impl TransportProtocol for Transport {
        async fn send_frame(&mut self, frame: String) -> Result<(), TransportError>;
        async fn receive_frame(&mut self) -> Result<String, TransportError>;
        async fn close(&mut self) -> Result<(), TransportError>;
        fn is_connected(&self) -> bool;
    }
}

#[derive(Default)]
struct Script {
    replies: VecDeque<Result<String, TransportError>>,
    sent: Vec<Value>,
    closed: bool,
}

/// Replays canned replies and records every frame sent.
///
/// Clones share the same script, so a test can keep one handle while the
/// connection owns another.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, frame: &str) {
        self.push(Ok(frame.to_string()));
    }

    /// Queue `{"status":"ok","responseData":data}`.
    pub fn ok(&self, data: Value) {
        self.push(Ok(json!({"status": "ok", "responseData": data}).to_string()));
    }

    pub fn ok_empty(&self) {
        self.push(Ok(json!({"status": "ok"}).to_string()));
    }

    pub fn error(&self, sql_code: &str, text: &str) {
        self.push(Ok(json!({
            "status": "error",
            "exception": {"sqlCode": sql_code, "text": text}
        })
        .to_string()));
    }

    pub fn fail(&self, error: TransportError) {
        self.push(Err(error));
    }

    /// Frames sent so far, parsed.
    pub fn sent(&self) -> Vec<Value> {
        self.lock().sent.clone()
    }

    /// Command names sent so far; the credential message shows as "authenticate".
    pub fn commands(&self) -> Vec<String> {
        self.lock()
            .sent
            .iter()
            .map(|frame| {
                frame["command"]
                    .as_str()
                    .unwrap_or("authenticate")
                    .to_string()
            })
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn push(&self, reply: Result<String, TransportError>) {
        self.lock().replies.push_back(reply);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }
}

#[async_trait]
impl TransportProtocol for ScriptedTransport {
    async fn send_frame(&mut self, frame: String) -> Result<(), TransportError> {
        let mut script = self.lock();
        if script.closed {
            return Err(TransportError::NotConnected);
        }
        let value = serde_json::from_str(&frame).unwrap();
        script.sent.push(value);
        Ok(())
    }

    async fn receive_frame(&mut self) -> Result<String, TransportError> {
        self.lock()
            .replies
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::ReceiveError("script exhausted".to_string())))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.lock().closed = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        !self.lock().closed
    }
}
