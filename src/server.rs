//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{extract::FromRef, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::models::AppConfig;
use crate::services::{
    feed, DisplayHub, PageRenderer, RetryPolicy, SimulatedSource, UpstreamSource,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub hub: Arc<DisplayHub>,
    pub renderer: Arc<PageRenderer>,
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<DisplayHub> {
    fn from_ref(state: &AppState) -> Self {
        state.hub.clone()
    }
}

impl FromRef<AppState> for Arc<PageRenderer> {
    fn from_ref(state: &AppState) -> Self {
        state.renderer.clone()
    }
}

/// Where the running server takes its frames from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode {
    /// Upstream WebSocket from the config
    Upstream,
    /// Built-in random walk
    Simulated,
}

/// Create application state from a loaded configuration.
pub fn create_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    config.validate()?;
    let hub = Arc::new(DisplayHub::new(&config));
    let renderer = Arc::new(
        PageRenderer::new().map_err(|e| anyhow::anyhow!("Failed to load page template: {e}"))?,
    );

    Ok(AppState {
        config: Arc::new(config),
        hub,
        renderer,
    })
}

/// Start the feed for the given mode on the current runtime.
pub fn spawn_feed(state: &AppState, mode: FeedMode) -> anyhow::Result<tokio::task::JoinHandle<()>> {
    let hub = state.hub.clone();
    let handle = match mode {
        FeedMode::Upstream => {
            let url = state.config.feed.upstream.as_deref().ok_or_else(|| {
                anyhow::anyhow!("No upstream configured (set UPSTREAM_URL or feed.upstream)")
            })?;
            let source = UpstreamSource::new(url);
            tracing::info!(url = source.url(), "Starting upstream feed");
            feed::spawn(source, hub, RetryPolicy::from_config(&state.config.feed))
        }
        FeedMode::Simulated => {
            tracing::info!("Starting simulated feed");
            feed::spawn(
                SimulatedSource::new(&state.config),
                hub,
                RetryPolicy::from_config(&state.config.feed),
            )
        }
    };
    Ok(handle)
}

/// Build the router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Display page and assets
        .route("/", get(api::handle_index))
        .route("/static/:file", get(api::handle_static))
        // Live streams
        .route("/ws/", get(api::handle_ws))
        .route("/ws/raw/", get(api::handle_raw_ws))
        // JSON API
        .route("/api/channels", get(api::handle_channels))
        .route("/api/color", get(api::handle_color))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and tracing
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
