use crate::assets::AssetLoader;
use crate::models::frame::CHANNEL_COUNT;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Largest number of decimals the readouts may show.
pub const MAX_PRECISION: usize = 12;

/// Error type for semantic config validation
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Channel index {0} out of range (0..{max})", max = CHANNEL_COUNT)]
    ChannelOutOfRange(usize),

    #[error("Channel {0} configured more than once")]
    DuplicateChannel(usize),

    #[error("Precision {0} exceeds maximum of {max}", max = MAX_PRECISION)]
    PrecisionTooLarge(usize),

    #[error("Recolor threshold must be a finite non-negative number, got {0}")]
    InvalidThreshold(f64),

    #[error("Interval must be positive: {0}")]
    ZeroInterval(&'static str),
}

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Page title
    #[serde(default = "default_title")]
    pub title: String,

    /// Decimal places for readouts
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// Minimum change (GHz) before a tile is recolored
    #[serde(default = "default_recolor_threshold")]
    pub recolor_threshold: f64,

    /// Per-channel display settings
    #[serde(default = "default_channels")]
    pub channels: Vec<ChannelConfig>,

    /// Upstream feed settings
    #[serde(default)]
    pub feed: FeedConfig,
}

fn default_title() -> String {
    "Wavemeter".to_string()
}

fn default_precision() -> usize {
    3
}

fn default_recolor_threshold() -> f64 {
    1.0
}

fn default_channels() -> Vec<ChannelConfig> {
    (0..CHANNEL_COUNT).map(ChannelConfig::numbered).collect()
}

/// Display settings for one wavemeter channel
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChannelConfig {
    /// Zero-based position in the reading array
    pub index: usize,

    /// Caption shown on the tile
    #[serde(default)]
    pub label: Option<String>,

    /// Fixed CSS background replacing the spectral color
    #[serde(default)]
    pub background: Option<String>,

    /// Centre frequency (GHz) for the simulated feed
    #[serde(default)]
    pub centre: Option<f64>,
}

impl ChannelConfig {
    /// Channel with default settings and a "Ch N" caption
    pub fn numbered(index: usize) -> Self {
        Self {
            index,
            label: Some(format!("Ch {}", index + 1)),
            background: None,
            centre: None,
        }
    }

    /// Caption, falling back to the one-based channel number
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("Ch {}", self.index + 1))
    }
}

/// Where readings come from and how to reconnect
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FeedConfig {
    /// Upstream WebSocket URL
    #[serde(default)]
    pub upstream: Option<String>,

    /// Delay between reconnect attempts
    #[serde(default = "default_reconnect_interval")]
    pub reconnect_interval_ms: u64,

    /// Give up after this many failed attempts (unbounded if unset)
    #[serde(default)]
    pub max_attempts: Option<u32>,

    /// Frame period of the simulated feed
    #[serde(default = "default_simulate_interval")]
    pub simulate_interval_ms: u64,
}

fn default_reconnect_interval() -> u64 {
    1000
}

fn default_simulate_interval() -> u64 {
    500
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            upstream: None,
            reconnect_interval_ms: default_reconnect_interval(),
            max_attempts: None,
            simulate_interval_ms: default_simulate_interval(),
        }
    }
}

impl FeedConfig {
    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_interval_ms)
    }

    pub fn simulate_interval(&self) -> Duration {
        Duration::from_millis(self.simulate_interval_ms)
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        channels = config.channels.len(),
                        precision = config.precision,
                        upstream = config.feed.upstream.as_deref().unwrap_or("(none)"),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to load config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.precision > MAX_PRECISION {
            return Err(ConfigError::PrecisionTooLarge(self.precision));
        }
        if !self.recolor_threshold.is_finite() || self.recolor_threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.recolor_threshold));
        }
        let mut seen = [false; CHANNEL_COUNT];
        for channel in &self.channels {
            if channel.index >= CHANNEL_COUNT {
                return Err(ConfigError::ChannelOutOfRange(channel.index));
            }
            if std::mem::replace(&mut seen[channel.index], true) {
                return Err(ConfigError::DuplicateChannel(channel.index));
            }
        }
        if self.feed.reconnect_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("reconnect_interval_ms"));
        }
        if self.feed.simulate_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("simulate_interval_ms"));
        }
        Ok(())
    }

    /// Settings for a channel, if configured
    pub fn channel(&self, index: usize) -> Option<&ChannelConfig> {
        self.channels.iter().find(|c| c.index == index)
    }

    /// Apply the UPSTREAM_URL override
    pub fn with_upstream(mut self, upstream: Option<String>) -> Self {
        if upstream.is_some() {
            self.feed.upstream = upstream;
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            precision: default_precision(),
            recolor_threshold: default_recolor_threshold(),
            channels: default_channels(),
            feed: FeedConfig::default(),
        }
    }
}
