//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`reelgate_core::Error`] so that route
//! handlers can return `Result<T, AppError>` and use `?` on core results.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reelgate_core::Error;
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: Error,
}

impl AppError {
    pub fn new(inner: Error) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &Error {
        &self.inner
    }
}

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self::new(e)
    }
}

/// A body without a JSON content type is treated like a body without a URL;
/// anything else the extractor rejects is reported as is.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match rejection {
            JsonRejection::MissingJsonContentType(_) => "URL is required".to_string(),
            other => other.body_text(),
        };
        Self::new(Error::InvalidRequest(message))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            match &self.inner {
                Error::ExternalTool { platform, detail } => tracing::error!(
                    status = %status,
                    %platform,
                    detail = %detail,
                    "Media fetch failed"
                ),
                other => tracing::error!(
                    status = %status,
                    error = %other,
                    "Server error in API handler"
                ),
            }
        } else {
            tracing::debug!(status = %status, error = %self.inner, "Rejected request");
        }

        let body = json!({ "error": self.inner.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use reelgate_core::Platform;

    async fn render(err: Error) -> (StatusCode, serde_json::Value) {
        let response = AppError::new(err).into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn invalid_request_is_400() {
        let (status, body) = render(Error::InvalidRequest("URL is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "URL is required"}));
    }

    #[tokio::test]
    async fn unsupported_source_is_400() {
        let (status, body) = render(Error::UnsupportedSource).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unsupported video source");
    }

    #[tokio::test]
    async fn tool_failure_hides_detail() {
        let (status, body) = render(Error::external_tool(
            Platform::Facebook,
            "ERROR: secret stderr output",
        ))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to download Facebook video"}));
    }
}
