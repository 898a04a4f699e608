//! OpenAPI document for the HTTP surface, served as JSON.

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use super::AppContext;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "reelgate API",
        version = "0.1.0",
        description = "Detects social video sources, reports metadata and streams downloads",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    servers(
        (url = "/", description = "Default server")
    ),
    paths(
        super::routes_api::health,
        super::routes_api::detect,
        super::routes_api::download,
    ),
    components(
        schemas(
            super::routes_api::VideoRequest,
            super::routes_api::DetectResponse,
            super::routes_api::ErrorResponse,
            crate::metadata::VideoMetadata,
            crate::metadata::MetadataResult,
            PlatformSchema,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "media", description = "Source detection and download endpoints"),
    )
)]
pub struct ApiDoc;

// Schema wrappers for types that can't derive ToSchema directly

/// Video platform a URL was classified as.
#[derive(utoipa::ToSchema)]
#[schema(as = Platform)]
pub enum PlatformSchema {
    #[schema(rename = "youtube")]
    YouTube,
    #[schema(rename = "facebook")]
    Facebook,
    #[schema(rename = "twitter")]
    Twitter,
    #[schema(rename = "tiktok")]
    TikTok,
    #[schema(rename = "instagram")]
    Instagram,
    Unknown,
}

pub fn openapi_routes() -> Router<AppContext> {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
