//! `POST /compress`
//!
//! One deadline covers the whole request. If it passes while the body is still being
//! received the response is 408; if it passes while the pipeline runs, the pipeline is
//! cancelled and the response is 503. The temp upload is removed before any response
//! leaves the handler.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Extension, Json,
};
use imgpress_core::models::compression_percentage;
use imgpress_core::{AppError, CompressResponse, ErrorBody, Quality, ResizeDirective};
use imgpress_infra::RequestId;
use imgpress_processing::{
    resolve_target_format, validate_source_format, CompressionRequest, CompressionResult,
    PipelineError, ValidationError,
};
use imgpress_storage::TempUpload;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::multipart::{read_compress_form, CompressForm, FormFields};

/// How a compression job ended. Exactly one is produced per request.
enum JobOutcome {
    Completed(CompressionResult),
    Failed(PipelineError),
    TimedOut,
}

/// Compress an uploaded image
///
/// Accepts one `image` file plus optional `convertTo`, `quality`, `width` and `height`
/// text fields, stores the encoded result in the compressed-output area and reports
/// the size reduction.
#[utoipa::path(
    post,
    path = "/compress",
    tag = "compress",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "`image` file (jpg, jpeg, png, webp, jxl) and optional `convertTo`, `quality` (1-100), `width`, `height`"),
    responses(
        (status = 200, description = "Image compressed", body = CompressResponse),
        (status = 400, description = "Missing image, unsupported format or malformed form", body = ErrorBody),
        (status = 408, description = "Upload not received in time", body = ErrorBody),
        (status = 413, description = "File too large", body = ErrorBody),
        (status = 503, description = "Compression failed or timed out", body = ErrorBody)
    )
)]
#[tracing::instrument(
    skip(state, request_id, multipart),
    fields(
        request_id = %request_id.as_ref().map(|Extension(id)| id.0.as_str()).unwrap_or("-"),
        operation = "compress_image"
    )
)]
pub async fn compress_image(
    State(state): State<Arc<AppState>>,
    request_id: Option<Extension<RequestId>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CompressResponse>, HttpAppError> {
    let budget = state.config.compression_timeout();
    let deadline = Instant::now() + budget;
    let mut multipart = multipart?;

    let form = match tokio::time::timeout_at(
        deadline,
        read_compress_form(
            &state.uploads,
            &mut multipart,
            state.config.max_upload_size_bytes(),
        ),
    )
    .await
    {
        Ok(form) => form?,
        // The partial upload was owned by the dropped future and is deleted with it.
        Err(_) => return Err(AppError::UploadTimeout(budget.as_secs()).into()),
    };

    let CompressForm { image, fields } = form;
    let Some(upload) = image else {
        return Err(ValidationError::MissingImage.into());
    };

    let request = match build_request(&upload, fields).await {
        Ok(request) => request,
        Err(e) => {
            upload.remove().await;
            return Err(e);
        }
    };

    tracing::info!(
        upload = %upload.filename(),
        original = %upload.original_filename(),
        size_bytes = upload.size(),
        target = %request.target,
        quality = request.quality.value(),
        resize = ?request.resize,
        "Compression requested"
    );

    let cancel = CancellationToken::new();
    let outcome = tokio::select! {
        result = state.pipeline.run(request, cancel.clone()) => match result {
            Ok(result) => JobOutcome::Completed(result),
            Err(e) => JobOutcome::Failed(e),
        },
        _ = tokio::time::sleep_until(deadline) => {
            cancel.cancel();
            JobOutcome::TimedOut
        }
    };

    let size_before = upload.size();
    upload.remove().await;

    match outcome {
        JobOutcome::Completed(result) => {
            let response = CompressResponse {
                code: 200,
                file_size_before: size_before,
                file_size_after: result.size,
                quality: result.quality.value(),
                compressed: compression_percentage(size_before, result.size),
                url: state.compressed().public_url(&result.output.filename),
            };
            tracing::info!(
                output = %result.output.filename,
                encoder = %result.encoder,
                file_size_before = response.file_size_before,
                file_size_after = response.file_size_after,
                compressed = response.compressed,
                "Compression succeeded"
            );
            Ok(Json(response))
        }
        JobOutcome::Failed(e) => Err(e.into()),
        JobOutcome::TimedOut => Err(AppError::CompressionTimeout(budget.as_secs()).into()),
    }
}

/// Validate the form against the received upload, in the order the client sees errors.
async fn build_request(
    upload: &TempUpload,
    fields: FormFields,
) -> Result<CompressionRequest, HttpAppError> {
    validate_source_format(upload.original_filename())?;
    let target =
        resolve_target_format(fields.convert_to.as_deref(), upload.original_filename())?;
    upload
        .ensure_readable()
        .await
        .map_err(|e| AppError::SourceUnavailable(e.to_string()))?;

    Ok(CompressionRequest {
        source_path: upload.path().to_path_buf(),
        upload_name: upload.filename().to_string(),
        original_filename: upload.original_filename().to_string(),
        original_size: upload.size(),
        target,
        quality: Quality::from_field(fields.quality.as_deref()),
        resize: ResizeDirective::from_fields(fields.width.as_deref(), fields.height.as_deref()),
    })
}
