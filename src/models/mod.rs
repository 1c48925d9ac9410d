pub mod config;
pub mod frame;
pub mod view;

pub use config::{AppConfig, ChannelConfig, ConfigError, FeedConfig};
pub use frame::{ChannelReading, Frame, FrameError, CHANNEL_COUNT};
pub use view::{ChannelView, DisplaySnapshot};
