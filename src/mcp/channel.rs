// ABOUTME: WebSocket request/response channel to an MCP control-plane service.
// ABOUTME: Tags each outgoing frame with a random id and waits for the reply carrying it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::config::McpConfig;
use crate::error::McpError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type PendingMap = Arc<Mutex<HashMap<String, oneshot::Sender<Value>>>>;

/// Field carrying the correlation id on both requests and replies.
pub const CORRELATION_FIELD: &str = "id";

/// One open WebSocket connection with id-correlated request/response.
///
/// Any number of [`McpChannel::send`] calls may be in flight; each owns its
/// own pending slot, released when its reply arrives or its deadline passes.
pub struct McpChannel {
    sink: tokio::sync::Mutex<SplitSink<WsStream, WsMessage>>,
    pending: PendingMap,
    reader: Mutex<Option<JoinHandle<()>>>,
    timeout: Duration,
}

impl McpChannel {
    /// Open a connection to `config.url`. Resolves once the handshake completes.
    pub async fn connect(config: &McpConfig) -> Result<Self, McpError> {
        if config.url.is_empty() {
            return Err(McpError::Connection("MCP server URL is not set".into()));
        }

        let (stream, _response) = connect_async(config.url.as_str()).await.map_err(|e| {
            tracing::error!(error = %e, url = %config.url, "MCP connection error");
            McpError::Connection(e.to_string())
        })?;
        tracing::info!(url = %config.url, "Connected to MCP server");

        let (sink, stream) = stream.split();
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let reader = tokio::spawn(read_loop(stream, pending.clone()));

        Ok(Self {
            sink: tokio::sync::Mutex::new(sink),
            pending,
            reader: Mutex::new(Some(reader)),
            timeout: config.timeout,
        })
    }

    /// Send `message` (a JSON object) tagged with a fresh correlation id and
    /// wait for the reply carrying the same id.
    pub async fn send(&self, message: Value) -> Result<Value, McpError> {
        let Value::Object(mut fields) = message else {
            return Err(McpError::Protocol("MCP message must be a JSON object".into()));
        };

        let id = correlation_id();
        fields.insert(CORRELATION_FIELD.to_string(), Value::String(id.clone()));
        let json = serde_json::to_string(&fields)?;

        let (tx, rx) = oneshot::channel();
        let _slot = PendingSlot::register(&self.pending, id.clone(), tx);

        self.sink.lock().await.send(WsMessage::Text(json)).await?;
        tracing::debug!(%id, "MCP request sent");

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_)) => Err(McpError::Protocol("connection closed before reply".into())),
            Err(_) => {
                tracing::warn!(%id, timeout = ?self.timeout, "MCP request timed out");
                Err(McpError::Timeout(self.timeout))
            }
        }
    }

    /// Requests still waiting for a reply.
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Close the connection and stop the reader task.
    pub async fn shutdown(&self) -> Result<(), McpError> {
        let closed = self.sink.lock().await.close().await;

        let reader = self.reader.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(mut handle) = reader {
            if tokio::time::timeout(Duration::from_millis(500), &mut handle)
                .await
                .is_err()
            {
                handle.abort();
            }
        }
        lock(&self.pending).clear();

        match closed {
            Ok(())
            | Err(WsError::ConnectionClosed)
            | Err(WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for McpChannel {
    fn drop(&mut self) {
        if let Some(handle) = self.reader.lock().unwrap_or_else(|e| e.into_inner()).take() {
            handle.abort();
        }
    }
}

/// A registered pending request. Dropping it deregisters the id, so the
/// slot is released on reply, timeout, send failure and cancellation alike.
struct PendingSlot<'a> {
    pending: &'a PendingMap,
    id: String,
}

impl<'a> PendingSlot<'a> {
    fn register(pending: &'a PendingMap, id: String, tx: oneshot::Sender<Value>) -> Self {
        lock(pending).insert(id.clone(), tx);
        Self { pending, id }
    }
}

impl Drop for PendingSlot<'_> {
    fn drop(&mut self) {
        lock(self.pending).remove(&self.id);
    }
}

fn lock(pending: &PendingMap) -> std::sync::MutexGuard<'_, HashMap<String, oneshot::Sender<Value>>> {
    pending.lock().unwrap_or_else(|e| e.into_inner())
}

/// Random alphanumeric id.
fn correlation_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

async fn read_loop(mut stream: SplitStream<WsStream>, pending: PendingMap) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => route_reply(&pending, text.as_bytes()),
            Ok(WsMessage::Binary(bytes)) => route_reply(&pending, &bytes),
            Ok(WsMessage::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "MCP connection error");
                break;
            }
        }
    }

    tracing::info!("MCP connection closed");
    // Dropping the senders fails every request still waiting.
    lock(&pending).clear();
}

fn route_reply(pending: &PendingMap, frame: &[u8]) {
    let reply: Value = match serde_json::from_slice(frame) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "skipping unparsable MCP frame");
            return;
        }
    };

    let Some(id) = reply.get(CORRELATION_FIELD).and_then(Value::as_str) else {
        tracing::debug!("skipping MCP frame without a correlation id");
        return;
    };

    let waiter = lock(pending).remove(id);
    match waiter {
        Some(tx) => {
            let _ = tx.send(reply);
        }
        None => tracing::debug!(%id, "no pending MCP request for reply, dropping"),
    }
}
