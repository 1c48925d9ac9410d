pub mod display_state;
pub mod feed;
pub mod hub;
pub mod page_renderer;
pub mod simulator;
pub mod upstream;

pub use display_state::DisplayState;
pub use feed::{FeedError, FeedSupervisor, FrameSource, RetryPolicy};
pub use hub::{DisplayHub, HubEvent};
pub use page_renderer::{PageRenderer, TemplateError};
pub use simulator::SimulatedSource;
pub use upstream::UpstreamSource;
