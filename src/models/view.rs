use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::frame::ChannelReading;

/// Everything the browser needs to draw one channel tile
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChannelView {
    /// Zero-based channel index
    pub index: usize,
    /// Tile caption
    pub label: String,
    /// Main readout (frequency or status text)
    pub text: String,
    /// Power line, absent for non-measurements
    pub power: Option<String>,
    /// CSS background, `None` means transparent
    pub background: Option<String>,
    /// Spectral color as `#rrggbb`, when the background is derived from it
    pub color: Option<String>,
    /// Classified reading behind the text
    pub reading: ChannelReading,
}

/// Full display state for a newly connected client
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DisplaySnapshot {
    /// Whether the upstream feed is currently connected
    pub connected: bool,
    /// Decimal places used for readouts
    pub precision: usize,
    /// One view per channel, ordered by index
    pub channels: Vec<ChannelView>,
    /// When the frame behind these views arrived
    #[schema(value_type = Option<String>, format = DateTime)]
    pub updated_at: Option<DateTime<Utc>>,
}
