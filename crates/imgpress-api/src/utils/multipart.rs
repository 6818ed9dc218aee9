//! Streaming reader for the `/compress` multipart form.
//!
//! The `image` file is streamed chunk by chunk into the upload area; text fields are
//! collected as raw strings and interpreted by the handler. Fields may arrive in any
//! order and unknown fields are skipped.

use axum::extract::multipart::Field;
use axum::extract::Multipart;
use imgpress_core::constants::IMAGE_FIELD;
use imgpress_core::AppError;
use imgpress_storage::{TempUpload, UploadArea};

use crate::error::HttpAppError;

/// Raw contents of a compress form
#[derive(Debug, Default)]
pub struct CompressForm {
    pub image: Option<TempUpload>,
    pub fields: FormFields,
}

/// Text fields exactly as sent
#[derive(Debug, Default)]
pub struct FormFields {
    pub convert_to: Option<String>,
    pub quality: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

impl CompressForm {
    /// Delete the received upload, if any.
    pub async fn discard(self) {
        if let Some(upload) = self.image {
            upload.remove().await;
        }
    }
}

/// Read the whole form. On failure every partially written upload is deleted before returning.
pub async fn read_compress_form(
    uploads: &UploadArea,
    multipart: &mut Multipart,
    max_file_bytes: usize,
) -> Result<CompressForm, HttpAppError> {
    let mut form = CompressForm::default();

    match read_fields(uploads, multipart, max_file_bytes, &mut form).await {
        Ok(()) => Ok(form),
        Err(e) => {
            form.discard().await;
            Err(e)
        }
    }
}

async fn read_fields(
    uploads: &UploadArea,
    multipart: &mut Multipart,
    max_file_bytes: usize,
    form: &mut CompressForm,
) -> Result<(), HttpAppError> {
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            IMAGE_FIELD => {
                if form.image.is_some() {
                    return Err(AppError::Validation(
                        "Only one image may be uploaded per request".to_string(),
                    )
                    .into());
                }
                form.image = Some(stream_image(uploads, field, max_file_bytes).await?);
            }
            "convertTo" => form.fields.convert_to = Some(field.text().await?),
            "quality" => form.fields.quality = Some(field.text().await?),
            "width" => form.fields.width = Some(field.text().await?),
            "height" => form.fields.height = Some(field.text().await?),
            other => {
                tracing::debug!(field = %other, "Ignoring unknown form field");
            }
        }
    }

    Ok(())
}

async fn stream_image(
    uploads: &UploadArea,
    mut field: Field<'_>,
    max_file_bytes: usize,
) -> Result<TempUpload, HttpAppError> {
    let original_filename = field.file_name().unwrap_or_default().to_string();
    let mut writer = uploads.begin(&original_filename).await?;

    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                writer.abort().await;
                return Err(e.into());
            }
        };

        if writer.bytes_written() + chunk.len() as u64 > max_file_bytes as u64 {
            writer.abort().await;
            return Err(AppError::PayloadTooLarge(format!(
                "File size exceeds maximum allowed size of {} MB",
                max_file_bytes / 1024 / 1024
            ))
            .into());
        }

        if let Err(e) = writer.write_chunk(&chunk).await {
            writer.abort().await;
            return Err(e.into());
        }
    }

    let upload = writer.finish().await?;
    tracing::debug!(
        upload = %upload.filename(),
        size_bytes = upload.size(),
        "Upload received"
    );
    Ok(upload)
}
