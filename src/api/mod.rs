pub mod channels;
pub mod color;
pub mod page;
pub mod ws;

pub use channels::{handle_channels, __path_handle_channels};
pub use color::{handle_color, ColorQuery, ColorResponse, __path_handle_color};
pub use page::{handle_index, handle_static};
pub use ws::{handle_raw_ws, handle_ws, ViewMessage};
