//! OpenAPI documentation, served at `/api-docs/openapi.json`.

use axum::Json;
use utoipa::OpenApi;

use crate::handlers;
use imgpress_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "imgpress API",
        description = "Upload an image, get back a compressed (and optionally resized or converted) copy. Supported formats: jpg, jpeg, png, webp, jxl."
    ),
    paths(
        handlers::compress::compress_image,
        handlers::health::liveness_check,
        handlers::health::readiness_check,
    ),
    components(schemas(
        models::CompressResponse,
        models::ErrorBody,
        handlers::health::ReadinessResponse,
    )),
    tags(
        (name = "compress", description = "Image compression"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
