//! Real TCP servers for WebSocket tests.

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use wlm_display::models::AppConfig;
use wlm_display::server::{build_router, create_app_state, AppState};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// The display server listening on an ephemeral port
pub struct LiveServer {
    pub addr: SocketAddr,
    pub state: AppState,
}

impl LiveServer {
    pub async fn start(config: AppConfig) -> Self {
        let state = create_app_state(config).expect("Failed to create app state");
        let router = build_router(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { addr, state }
    }

    pub async fn connect(&self, path: &str) -> Client {
        let url = format!("ws://{}{}", self.addr, path);
        let (client, _) = connect_async(url).await.expect("WebSocket connect failed");
        client
    }
}

/// Next JSON text message, failing the test after a few seconds
pub async fn next_json(client: &mut Client) -> serde_json::Value {
    let message = tokio::time::timeout(Duration::from_secs(5), client.next())
        .await
        .expect("Timed out waiting for message")
        .expect("Stream ended")
        .expect("WebSocket error");
    match message {
        Message::Text(text) => serde_json::from_str(&text).expect("Invalid JSON"),
        other => panic!("Unexpected message: {other:?}"),
    }
}

/// Read messages until one satisfies the predicate
pub async fn wait_for(
    client: &mut Client,
    mut predicate: impl FnMut(&serde_json::Value) -> bool,
) -> serde_json::Value {
    for _ in 0..50 {
        let value = next_json(client).await;
        if predicate(&value) {
            return value;
        }
    }
    panic!("No matching message after 50 messages");
}

/// Fake wavemeter: sends the given messages to every connection, then closes
pub struct FakeUpstream {
    pub addr: SocketAddr,
    pub connections: Arc<AtomicUsize>,
}

impl FakeUpstream {
    pub async fn start(messages: Vec<String>, hold_open: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().unwrap();
        let connections = Arc::new(AtomicUsize::new(0));
        let counter = connections.clone();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let messages = messages.clone();
                tokio::spawn(async move {
                    let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
                        return;
                    };
                    for text in messages {
                        if ws.send(Message::Text(text)).await.is_err() {
                            return;
                        }
                    }
                    if hold_open {
                        while let Some(Ok(_)) = ws.next().await {}
                    } else {
                        let _ = ws.close(None).await;
                    }
                });
            }
        });

        Self { addr, connections }
    }

    pub fn url(&self) -> String {
        format!("ws://{}/", self.addr)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}
