//! Live WebSocket endpoints.
//!
//! `/ws/` pushes rendered channel views to the display page. `/ws/raw/`
//! relays the upstream reading array unchanged, for clients that expect the
//! wavemeter's own message format.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use serde::Serialize;
use std::sync::Arc;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tokio_stream::StreamExt;

use crate::models::{ChannelView, DisplaySnapshot};
use crate::services::{DisplayHub, HubEvent};

/// Message sent to display clients
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewMessage {
    /// Full state, sent on connect and after falling behind
    Snapshot(DisplaySnapshot),
    Update { channels: Vec<ChannelView> },
    Status { connected: bool },
}

/// Upgrade to the display view stream
pub async fn handle_ws(ws: WebSocketUpgrade, State(hub): State<Arc<DisplayHub>>) -> Response {
    ws.on_upgrade(move |socket| stream_views(socket, hub))
}

/// Upgrade to the raw reading relay
pub async fn handle_raw_ws(ws: WebSocketUpgrade, State(hub): State<Arc<DisplayHub>>) -> Response {
    ws.on_upgrade(move |socket| stream_raw(socket, hub))
}

async fn send_json<T: Serialize>(socket: &mut WebSocket, message: &T) -> bool {
    match serde_json::to_string(message) {
        Ok(text) => socket.send(Message::Text(text)).await.is_ok(),
        Err(e) => {
            tracing::warn!(%e, "Failed to serialize message");
            true
        }
    }
}

/// True when the client closed or the socket failed
fn client_gone(incoming: Option<Result<Message, axum::Error>>) -> bool {
    matches!(incoming, None | Some(Err(_)) | Some(Ok(Message::Close(_))))
}

async fn stream_views(mut socket: WebSocket, hub: Arc<DisplayHub>) {
    // subscribe first so nothing between snapshot and stream is lost
    let mut events = BroadcastStream::new(hub.subscribe());
    tracing::debug!(clients = hub.subscriber_count(), "Display client connected");

    if !send_json(&mut socket, &ViewMessage::Snapshot(hub.snapshot().await)).await {
        return;
    }

    loop {
        tokio::select! {
            event = events.next() => {
                let message = match event {
                    Some(Ok(HubEvent::Update { channels, .. })) => ViewMessage::Update { channels },
                    Some(Ok(HubEvent::Status { connected })) => ViewMessage::Status { connected },
                    Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                        tracing::debug!(skipped, "Display client lagged, resending snapshot");
                        ViewMessage::Snapshot(hub.snapshot().await)
                    }
                    None => break,
                };
                if !send_json(&mut socket, &message).await {
                    break;
                }
            }
            incoming = socket.recv() => {
                if client_gone(incoming) {
                    break;
                }
            }
        }
    }

    tracing::debug!("Display client disconnected");
}

async fn stream_raw(mut socket: WebSocket, hub: Arc<DisplayHub>) {
    let mut events = BroadcastStream::new(hub.subscribe());

    if let Some(frame) = hub.last_frame().await {
        if socket.send(Message::Text(frame.to_json())).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            event = events.next() => {
                match event {
                    Some(Ok(HubEvent::Update { frame, .. })) => {
                        if socket.send(Message::Text(frame.to_json())).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(HubEvent::Status { .. })) => {}
                    Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                        tracing::debug!(skipped, "Raw client lagged");
                    }
                    None => break,
                }
            }
            incoming = socket.recv() => {
                if client_gone(incoming) {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChannelReading;

    #[test]
    fn test_view_message_tags() {
        let status = serde_json::to_value(ViewMessage::Status { connected: true }).unwrap();
        assert_eq!(status["type"], "status");
        assert_eq!(status["connected"], true);

        let snapshot = serde_json::to_value(ViewMessage::Snapshot(DisplaySnapshot {
            connected: false,
            precision: 3,
            channels: vec![],
            updated_at: None,
        }))
        .unwrap();
        assert_eq!(snapshot["type"], "snapshot");
        assert_eq!(snapshot["precision"], 3);
    }

    #[test]
    fn test_update_carries_reading_kind() {
        let view = ChannelView {
            index: 1,
            label: "Ch 2".to_string(),
            text: "Overexposed".to_string(),
            power: None,
            background: None,
            color: None,
            reading: ChannelReading::Overexposed,
        };
        let value = serde_json::to_value(ViewMessage::Update {
            channels: vec![view],
        })
        .unwrap();
        assert_eq!(value["type"], "update");
        assert_eq!(value["channels"][0]["reading"]["kind"], "overexposed");
        assert!(value["channels"][0]["power"].is_null());
    }
}
