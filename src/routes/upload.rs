//! Upload Routes
//!
//! Endpoints:
//! - POST /upload-logs - Signed multipart upload of a device log archive

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::state::AppState;
use crate::upload::{
    process_upload, read_payload, FailureKind, UploadError, UploadHeaders, UploadResponse,
    MAX_FILE_SIZE, MULTIPART_OVERHEAD,
};

// ============================================================================
// Error Response
// ============================================================================

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for UploadError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        match self.kind() {
            FailureKind::InternalProcessing => {
                tracing::error!("Upload processing failed: {}", self);
            }
            _ => {
                tracing::warn!(status = %status, "Upload rejected: {}", self);
            }
        }

        let body = Json(ErrorResponse {
            error: self.client_message().to_string(),
        });

        (status, body).into_response()
    }
}

// ============================================================================
// Router
// ============================================================================

/// Create the upload router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload-logs", post(upload_logs))
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + MULTIPART_OVERHEAD))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /upload-logs
///
/// Auth headers are checked before the body is read.
async fn upload_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, UploadError> {
    let upload_headers = UploadHeaders::from_headers(&headers)?;
    let payload = read_payload(multipart).await?;

    tracing::debug!(
        device_id = %upload_headers.device_id,
        file_name = %payload.file_name,
        size = payload.data.len(),
        "Upload received"
    );

    let result = process_upload(
        state.signing_key(),
        state.blob_store(),
        upload_headers,
        payload,
    )
    .await?;

    Ok(Json(result.into()))
}

// ============================================================================
// Tests
// ============================================================================
