use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::assets::AssetLoader;
use crate::error::ApiError;
use crate::models::AppConfig;
use crate::services::{DisplayHub, PageRenderer};

/// Serve the live display page
pub async fn handle_index(
    State(config): State<Arc<AppConfig>>,
    State(hub): State<Arc<DisplayHub>>,
    State(renderer): State<Arc<PageRenderer>>,
) -> Result<Html<String>, ApiError> {
    let snapshot = hub.snapshot().await;
    Ok(Html(renderer.render(&config, &snapshot)?))
}

/// Serve an embedded script or stylesheet
pub async fn handle_static(Path(file): Path<String>) -> Result<Response, ApiError> {
    let content_type = match file.rsplit_once('.').map(|(_, ext)| ext) {
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        _ => return Err(ApiError::NotFound),
    };

    let data = AssetLoader::read_static(&file).ok_or(ApiError::NotFound)?;
    Ok(([(header::CONTENT_TYPE, content_type)], data.into_owned()).into_response())
}
