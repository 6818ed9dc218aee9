use imgpress_core::AppError;

use crate::error::HttpAppError;

/// Any unmatched route
pub async fn not_found() -> HttpAppError {
    HttpAppError(AppError::NotFound("Not found".to_string()))
}
