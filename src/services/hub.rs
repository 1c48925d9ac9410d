//! Fan-out of display updates to connected browsers.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{broadcast, RwLock};

use crate::models::{AppConfig, ChannelView, DisplaySnapshot, Frame};
use crate::services::DisplayState;

const EVENT_BUFFER: usize = 64;

/// Event sent to every subscriber
#[derive(Debug, Clone)]
pub enum HubEvent {
    /// A frame was applied
    Update {
        channels: Vec<ChannelView>,
        frame: Frame,
    },
    /// The upstream feed connected or went away
    Status { connected: bool },
}

/// Shared display state plus a broadcast channel of changes
pub struct DisplayHub {
    state: RwLock<DisplayState>,
    last_frame: RwLock<Option<Frame>>,
    connected: AtomicBool,
    sender: broadcast::Sender<HubEvent>,
}

impl DisplayHub {
    pub fn new(config: &AppConfig) -> Self {
        let (sender, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            state: RwLock::new(DisplayState::new(config)),
            last_frame: RwLock::new(None),
            connected: AtomicBool::new(false),
            sender,
        }
    }

    /// Apply a frame and notify subscribers
    pub async fn publish(&self, frame: Frame) {
        let channels = self.state.write().await.apply(&frame);
        *self.last_frame.write().await = Some(frame.clone());

        // no receivers is fine, nobody is watching yet
        let _ = self.sender.send(HubEvent::Update { channels, frame });
    }

    /// Record the feed status, notifying only on change
    pub fn set_connected(&self, connected: bool) {
        if self.connected.swap(connected, Ordering::SeqCst) != connected {
            tracing::debug!(connected, "Feed status changed");
            let _ = self.sender.send(HubEvent::Status { connected });
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> DisplaySnapshot {
        self.state.read().await.snapshot(self.is_connected())
    }

    /// Most recent frame, for raw relay clients joining late
    pub async fn last_frame(&self) -> Option<Frame> {
        self.last_frame.read().await.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HubEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
