use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use reelgate_core::{classify, Error, Platform};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::AppError;
use super::AppContext;
use crate::metadata::MetadataResult;
use crate::streaming::stream_attachment;

pub fn api_routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(health))
        .route("/detect", post(detect))
        .route("/download", post(download))
}

/// Body accepted by `/detect` and `/download`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct VideoRequest {
    /// Video page URL.
    #[serde(default)]
    pub url: Option<String>,
}

impl VideoRequest {
    /// The URL, if present and non-blank.
    fn required_url(&self) -> Result<&str, Error> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::InvalidRequest("URL is required".into()))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DetectResponse {
    pub url: String,
    /// Platform wire name, or `Unknown`.
    #[schema(value_type = super::openapi::PlatformSchema)]
    pub source: Platform,
    pub metadata: MetadataResult,
}

/// Error payload used by every non-streaming failure.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Classify a URL and look up its display metadata.
///
/// Unknown URLs are not an error here: they get a placeholder metadata
/// object and a 200.
#[utoipa::path(
    post,
    path = "/detect",
    tag = "media",
    request_body = VideoRequest,
    responses(
        (status = 200, description = "Platform and metadata", body = DetectResponse),
        (status = 400, description = "URL missing", body = ErrorResponse)
    )
)]
pub async fn detect(
    State(ctx): State<AppContext>,
    payload: Result<Json<VideoRequest>, JsonRejection>,
) -> Result<Json<DetectResponse>, AppError> {
    let Json(request) = payload?;
    let url = request.required_url()?;

    let platform = classify(url);
    tracing::info!(%platform, url, "Detect request");

    let metadata = ctx.metadata.fetch(platform, url).await;

    Ok(Json(DetectResponse {
        url: url.to_string(),
        source: platform,
        metadata,
    }))
}

/// Fetch the video and stream it back as an attachment.
///
/// Once headers are sent, failures only cut the body short; the staged file
/// is removed either way.
#[utoipa::path(
    post,
    path = "/download",
    tag = "media",
    request_body = VideoRequest,
    responses(
        (status = 200, description = "Video bytes", body = Vec<u8>, content_type = "video/mp4"),
        (status = 400, description = "URL missing, unsupported or invalid", body = ErrorResponse),
        (status = 500, description = "Fetch tool failed", body = ErrorResponse)
    )
)]
pub async fn download(
    State(ctx): State<AppContext>,
    payload: Result<Json<VideoRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let url = request.required_url()?;

    let platform = classify(url);
    tracing::info!(%platform, url, "Download request");

    if !platform.is_supported() {
        return Err(Error::UnsupportedSource.into());
    }

    let file = ctx.pipeline.fetch_media(platform, url).await?;
    Ok(stream_attachment(file, ctx.config.download.chunk_size).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_url_is_missing() {
        let request = VideoRequest {
            url: Some("   ".into()),
        };
        assert!(request.required_url().is_err());
        assert!(VideoRequest::default().required_url().is_err());
    }

    #[test]
    fn url_is_trimmed() {
        let request = VideoRequest {
            url: Some(" https://youtu.be/dQw4w9WgXcQ\n".into()),
        };
        assert_eq!(request.required_url().unwrap(), "https://youtu.be/dQw4w9WgXcQ");
    }

    #[test]
    fn null_url_deserializes_as_missing() {
        let request: VideoRequest = serde_json::from_str(r#"{"url": null}"#).unwrap();
        assert!(request.url.is_none());
        let request: VideoRequest = serde_json::from_str("{}").unwrap();
        assert!(request.url.is_none());
    }
}
