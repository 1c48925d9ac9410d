//! Feed supervision: connect a frame source, pump frames into the hub,
//! and reconnect on a fixed interval when the source goes away.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::{FeedConfig, Frame};
use crate::services::DisplayHub;

/// Error type for frame sources
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Not connected")]
    NotConnected,

    #[error("Gave up after {0} failed attempts")]
    GaveUp(u32),
}

/// A stream of frames that can be (re)connected
#[async_trait]
pub trait FrameSource: Send {
    /// Human-readable origin for logs
    fn describe(&self) -> String;

    /// Open the stream
    async fn connect(&mut self) -> Result<(), FeedError>;

    /// Next frame, or `None` once the stream closed
    async fn next_frame(&mut self) -> Result<Option<Frame>, FeedError>;
}

/// Fixed-interval retry, unbounded unless `max_attempts` is set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub interval: Duration,
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
        }
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self {
            interval: config.reconnect_interval(),
            max_attempts: config.max_attempts,
        }
    }

    /// Whether another attempt is allowed after `failures` consecutive failures
    pub fn allows(&self, failures: u32) -> bool {
        self.max_attempts.map_or(true, |max| failures < max)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(Duration::from_secs(1))
    }
}

/// Runs a frame source against a hub until the retry policy gives up
pub struct FeedSupervisor<S: FrameSource> {
    source: S,
    hub: Arc<DisplayHub>,
    policy: RetryPolicy,
}

impl<S: FrameSource> FeedSupervisor<S> {
    pub fn new(source: S, hub: Arc<DisplayHub>, policy: RetryPolicy) -> Self {
        Self {
            source,
            hub,
            policy,
        }
    }

    /// Connect, pump, reconnect. Only returns when retries are exhausted.
    pub async fn run(mut self) -> Result<(), FeedError> {
        let origin = self.source.describe();
        let mut failures = 0u32;

        loop {
            match self.source.connect().await {
                Ok(()) => {
                    tracing::info!(source = %origin, "Feed connected");
                    failures = 0;
                    self.hub.set_connected(true);
                    let frames = self.pump().await;
                    self.hub.set_connected(false);
                    tracing::warn!(source = %origin, frames, "Feed disconnected");
                }
                Err(e) => {
                    failures += 1;
                    tracing::warn!(source = %origin, attempt = failures, %e, "Feed connection failed");
                    if !self.policy.allows(failures) {
                        return Err(FeedError::GaveUp(failures));
                    }
                }
            }

            tokio::time::sleep(self.policy.interval).await;
        }
    }

    /// Forward frames until the source closes or errors; returns the count
    async fn pump(&mut self) -> u64 {
        let mut frames = 0;
        loop {
            match self.source.next_frame().await {
                Ok(Some(frame)) => {
                    frames += 1;
                    self.hub.publish(frame).await;
                }
                Ok(None) => return frames,
                Err(e) => {
                    tracing::warn!(%e, "Feed stream failed");
                    return frames;
                }
            }
        }
    }
}

/// Spawn a supervisor on the runtime
pub fn spawn<S: FrameSource + 'static>(
    source: S,
    hub: Arc<DisplayHub>,
    policy: RetryPolicy,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = FeedSupervisor::new(source, hub, policy).run().await {
            tracing::error!(%e, "Feed stopped");
        }
    })
}
