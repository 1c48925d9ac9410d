use axum::{extract::State, response::Json};
use std::sync::Arc;

use crate::models::DisplaySnapshot;
use crate::services::DisplayHub;

/// Current state of every channel
///
/// The same snapshot a browser receives when it opens the live socket.
#[utoipa::path(
    get,
    path = "/api/channels",
    responses(
        (status = 200, description = "Display snapshot", body = DisplaySnapshot),
    ),
    tag = "Display"
)]
pub async fn handle_channels(State(hub): State<Arc<DisplayHub>>) -> Json<DisplaySnapshot> {
    Json(hub.snapshot().await)
}
