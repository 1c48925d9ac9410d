//! WebSocket client for the wavemeter's reading stream.

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use crate::models::Frame;
use crate::services::feed::{FeedError, FrameSource};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Frames read from an upstream WebSocket publishing the reading array
pub struct UpstreamSource {
    url: String,
    stream: Option<WsStream>,
}

impl UpstreamSource {
    pub fn new(url: &str) -> Self {
        Self {
            url: normalize_url(url),
            stream: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Accept page URLs as well: `http(s)://` becomes `ws(s)://`.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if let Some(rest) = url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        url.to_string()
    }
}

#[async_trait]
impl FrameSource for UpstreamSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn connect(&mut self) -> Result<(), FeedError> {
        let (stream, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| FeedError::Connect(e.to_string()))?;
        self.stream = Some(stream);
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Option<Frame>, FeedError> {
        let stream = self.stream.as_mut().ok_or(FeedError::NotConnected)?;

        loop {
            let text = match stream.next().await {
                Some(Ok(Message::Text(text))) => text,
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(%e, "Dropping non-UTF-8 upstream message");
                        continue;
                    }
                },
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!(?frame, "Upstream closed the connection");
                    self.stream = None;
                    return Ok(None);
                }
                // pings are answered by tungstenite itself
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    self.stream = None;
                    return Err(FeedError::Stream(e.to_string()));
                }
                None => {
                    self.stream = None;
                    return Ok(None);
                }
            };

            match Frame::parse(&text) {
                Ok(frame) => return Ok(Some(frame)),
                Err(e) => {
                    tracing::warn!(%e, "Dropping malformed upstream message");
                }
            }
        }
    }
}
