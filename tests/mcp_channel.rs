// ABOUTME: Integration tests for the MCP correlation channel.
// ABOUTME: Runs an in-process tokio-tungstenite server with scripted reply behavior.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use llm_testgen::prelude::*;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

type ServerStream = WebSocketStream<tokio::net::TcpStream>;

/// Accept one WebSocket connection and hand it to `handler`. Returns the ws:// URL.
async fn serve_one<F, Fut>(handler: F) -> String
where
    F: FnOnce(ServerStream) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        handler(ws).await;
    });

    format!("ws://{addr}")
}

async fn next_request(ws: &mut ServerStream) -> Option<Value> {
    while let Some(Ok(frame)) = ws.next().await {
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).ok();
        }
    }
    None
}

fn config(url: String, timeout_ms: u64) -> McpConfig {
    McpConfig::new(url).with_timeout(Duration::from_millis(timeout_ms))
}

#[tokio::test]
async fn test_reply_with_matching_id_resolves() {
    let url = serve_one(|mut ws| async move {
        while let Some(request) = next_request(&mut ws).await {
            let reply = json!({
                "id": request["id"],
                "result": {"echo": request["method"]}
            });
            ws.send(Message::Text(reply.to_string())).await.unwrap();
        }
    })
    .await;

    let channel = McpChannel::connect(&config(url, 2000)).await.unwrap();
    let reply = channel
        .send(json!({"method": "tools/list"}))
        .await
        .unwrap();

    assert_eq!(reply["result"]["echo"], "tools/list");
    assert!(reply["id"].as_str().is_some());
    assert_eq!(channel.pending_count(), 0);
    channel.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_outgoing_id_overrides_caller_id() {
    let url = serve_one(|mut ws| async move {
        if let Some(request) = next_request(&mut ws).await {
            let reply = json!({"id": request["id"], "seen": request["id"]});
            ws.send(Message::Text(reply.to_string())).await.unwrap();
        }
    })
    .await;

    let channel = McpChannel::connect(&config(url, 2000)).await.unwrap();
    let reply = channel
        .send(json!({"id": "caller", "method": "ping"}))
        .await
        .unwrap();

    let id = reply["seen"].as_str().unwrap();
    assert_ne!(id, "caller");
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[tokio::test]
async fn test_unmatched_replies_time_out() {
    let url = serve_one(|mut ws| async move {
        if next_request(&mut ws).await.is_some() {
            ws.send(Message::Text(json!({"id": "someone-else"}).to_string()))
                .await
                .unwrap();
            ws.send(Message::Text("this is not json".into())).await.unwrap();
            ws.send(Message::Text(json!({"result": "no id"}).to_string()))
                .await
                .unwrap();
            // Keep the socket open past the client deadline.
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
    })
    .await;

    let channel = McpChannel::connect(&config(url, 200)).await.unwrap();
    let err = channel.send(json!({"method": "slow"})).await.unwrap_err();

    assert!(matches!(err, McpError::Timeout(d) if d == Duration::from_millis(200)));
    assert_eq!(channel.pending_count(), 0);
}

#[tokio::test]
async fn test_late_reply_is_dropped() {
    let url = serve_one(|mut ws| async move {
        let first = next_request(&mut ws).await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        ws.send(Message::Text(json!({"id": first["id"], "n": 1}).to_string()))
            .await
            .unwrap();

        let second = next_request(&mut ws).await.unwrap();
        ws.send(Message::Text(json!({"id": second["id"], "n": 2}).to_string()))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
    })
    .await;

    let channel = McpChannel::connect(&config(url, 100)).await.unwrap();
    assert!(matches!(
        channel.send(json!({"method": "first"})).await,
        Err(McpError::Timeout(_))
    ));

    // Give the late reply time to arrive and be discarded.
    tokio::time::sleep(Duration::from_millis(400)).await;
    let reply = channel.send(json!({"method": "second"})).await.unwrap();
    assert_eq!(reply["n"], 2);
}

#[tokio::test]
async fn test_concurrent_requests_resolve_independently() {
    let url = serve_one(|mut ws| async move {
        let a = next_request(&mut ws).await.unwrap();
        let b = next_request(&mut ws).await.unwrap();
        // Answer in reverse order.
        for request in [b, a] {
            let reply = json!({"id": request["id"], "method": request["method"]});
            ws.send(Message::Text(reply.to_string())).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    })
    .await;

    let channel = McpChannel::connect(&config(url, 2000)).await.unwrap();
    let (a, b) = tokio::join!(
        channel.send(json!({"method": "a"})),
        channel.send(json!({"method": "b"}))
    );

    assert_eq!(a.unwrap()["method"], "a");
    assert_eq!(b.unwrap()["method"], "b");
    assert_eq!(channel.pending_count(), 0);
}

#[tokio::test]
async fn test_server_close_fails_pending_request() {
    let url = serve_one(|mut ws| async move {
        let _ = next_request(&mut ws).await;
        let _ = ws.close(None).await;
    })
    .await;

    let channel = McpChannel::connect(&config(url, 5000)).await.unwrap();
    let err = channel.send(json!({"method": "x"})).await.unwrap_err();

    assert!(matches!(err, McpError::Protocol(_)));
    assert_eq!(channel.pending_count(), 0);
}

#[tokio::test]
async fn test_non_object_message_is_rejected() {
    let url = serve_one(|mut ws| async move {
        let _ = next_request(&mut ws).await;
    })
    .await;

    let channel = McpChannel::connect(&config(url, 1000)).await.unwrap();
    let err = channel.send(json!(["not", "an", "object"])).await.unwrap_err();
    assert!(matches!(err, McpError::Protocol(_)));
}
