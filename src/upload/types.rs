//! Upload types for the signed log upload protocol

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::http::{header, HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::StorageError;
use crate::signature::SignatureError;

// ============================================================================
// Constants
// ============================================================================

/// Maximum file size: 50MB
pub const MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

/// Allowance for multipart framing and the title field on top of the file
pub const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// The only media type accepted for the file part
pub const ACCEPTED_MEDIA_TYPE: &str = "application/zip";

pub const TIMESTAMP_HEADER: &str = "x-timestamp";
pub const SIGNATURE_HEADER: &str = "x-signature";
pub const DEVICE_ID_HEADER: &str = "x-device-id";
pub const FILE_HASH_HEADER: &str = "x-file-hash";

// ============================================================================
// Request Types
// ============================================================================

/// Authentication headers of an upload request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadHeaders {
    /// Caller-supplied clock value, opaque to the server
    pub timestamp: String,
    pub signature: String,
    pub device_id: String,
    /// SHA-256 the caller claims for the file
    pub declared_file_hash: String,
    /// Transport `Content-Type`, empty when absent
    pub content_type: String,
}

impl UploadHeaders {
    /// Extract the authentication headers.
    ///
    /// All four `x-*` headers must be present and non-empty; a header that is
    /// not valid UTF-8 counts as missing.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, UploadError> {
        let get = |name: &str| -> Option<String> {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        match (
            get(TIMESTAMP_HEADER),
            get(SIGNATURE_HEADER),
            get(DEVICE_ID_HEADER),
            get(FILE_HASH_HEADER),
        ) {
            (Some(timestamp), Some(signature), Some(device_id), Some(declared_file_hash)) => {
                Ok(Self {
                    timestamp,
                    signature,
                    device_id,
                    declared_file_hash,
                    content_type: headers
                        .get(header::CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string(),
                })
            }
            _ => Err(UploadError::MissingHeaders),
        }
    }
}

/// The multipart body of an upload request
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub file_name: String,
    pub title: String,
    /// Media type declared on the file part
    pub media_type: String,
    pub data: Bytes,
}

// ============================================================================
// Result Types
// ============================================================================

/// Outcome of an upload that passed every check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub storage_key: String,
    pub storage_location: String,
    pub sha256_hash: String,
    pub file_name: String,
    pub title: String,
}

/// JSON body returned on success
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
    pub title: String,
    pub s3_location: String,
    pub sha256_hash: String,
}

impl From<UploadResult> for UploadResponse {
    fn from(result: UploadResult) -> Self {
        Self {
            message: "File uploaded successfully".to_string(),
            filename: result.file_name,
            title: result.title,
            s3_location: result.storage_location,
            sha256_hash: result.sha256_hash,
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Upload errors
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Missing required headers")]
    MissingHeaders,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("No file uploaded")]
    NoFile,

    #[error("Missing title")]
    MissingTitle,

    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("File too large: more than {max} bytes")]
    FileTooLarge { max: usize },

    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("File hash mismatch: declared {declared}, actual {actual}")]
    HashMismatch { declared: String, actual: String },

    #[error("Signature computation failed: {0}")]
    Signature(#[from] SignatureError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure classes exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Authorization,
    ClientInput,
    Integrity,
    InternalProcessing,
}

impl UploadError {
    pub fn kind(&self) -> FailureKind {
        match self {
            UploadError::MissingHeaders | UploadError::InvalidSignature => {
                FailureKind::Authorization
            }
            UploadError::NoFile
            | UploadError::MissingTitle
            | UploadError::InvalidFileType(_)
            | UploadError::FileTooLarge { .. }
            | UploadError::Multipart(_) => FailureKind::ClientInput,
            UploadError::HashMismatch { .. } => FailureKind::Integrity,
            UploadError::Signature(_) | UploadError::Storage(_) | UploadError::Internal(_) => {
                FailureKind::InternalProcessing
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            UploadError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::Multipart(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            _ => match self.kind() {
                FailureKind::Authorization => StatusCode::UNAUTHORIZED,
                FailureKind::ClientInput | FailureKind::Integrity => StatusCode::BAD_REQUEST,
                FailureKind::InternalProcessing => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Message safe to return to the caller
    pub fn client_message(&self) -> &'static str {
        match self {
            UploadError::MissingHeaders => "Missing required headers",
            UploadError::InvalidSignature => "Invalid signature",
            UploadError::NoFile => "No file uploaded",
            UploadError::MissingTitle => "Missing title",
            UploadError::InvalidFileType(_) => "Invalid file type",
            UploadError::FileTooLarge { .. } => "File too large",
            UploadError::Multipart(_) => "Invalid multipart body",
            UploadError::HashMismatch { .. } => "File hash mismatch",
            UploadError::Signature(_) | UploadError::Storage(_) | UploadError::Internal(_) => {
                "Error processing upload"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn full_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TIMESTAMP_HEADER, HeaderValue::from_static("1000"));
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_static("abc"));
        headers.insert(DEVICE_ID_HEADER, HeaderValue::from_static("dev1"));
        headers.insert(FILE_HASH_HEADER, HeaderValue::from_static("def"));
        headers
    }

    #[test]
    fn test_headers_extracted() {
        let mut headers = full_headers();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/zip"));

        let parsed = UploadHeaders::from_headers(&headers).unwrap();
        assert_eq!(parsed.timestamp, "1000");
        assert_eq!(parsed.signature, "abc");
        assert_eq!(parsed.device_id, "dev1");
        assert_eq!(parsed.declared_file_hash, "def");
        assert_eq!(parsed.content_type, "application/zip");
    }

    #[test]
    fn test_content_type_defaults_to_empty() {
        let parsed = UploadHeaders::from_headers(&full_headers()).unwrap();
        assert_eq!(parsed.content_type, "");
    }

    #[test]
    fn test_each_header_is_required() {
        for name in [TIMESTAMP_HEADER, SIGNATURE_HEADER, DEVICE_ID_HEADER, FILE_HASH_HEADER] {
            let mut headers = full_headers();
            headers.remove(name);
            assert!(matches!(
                UploadHeaders::from_headers(&headers),
                Err(UploadError::MissingHeaders)
            ));

            headers.insert(name, HeaderValue::from_static(""));
            assert!(matches!(
                UploadHeaders::from_headers(&headers),
                Err(UploadError::MissingHeaders)
            ));
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(UploadError::MissingHeaders.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(UploadError::InvalidSignature.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(UploadError::NoFile.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            UploadError::FileTooLarge { max: MAX_FILE_SIZE }.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            UploadError::HashMismatch {
                declared: "a".into(),
                actual: "b".into()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            UploadError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_not_in_client_message() {
        let err = UploadError::Storage(StorageError::PutFailed {
            key: "dev1-a.zip".into(),
            reason: "connection reset by 10.0.0.4".into(),
        });

        assert_eq!(err.kind(), FailureKind::InternalProcessing);
        assert_eq!(err.client_message(), "Error processing upload");
    }

    #[test]
    fn test_response_field_names() {
        let response = UploadResponse::from(UploadResult {
            storage_key: "dev1-a.zip".into(),
            storage_location: "memory://dev1-a.zip".into(),
            sha256_hash: "h".into(),
            file_name: "a.zip".into(),
            title: "Crash".into(),
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "File uploaded successfully");
        assert_eq!(json["filename"], "a.zip");
        assert_eq!(json["title"], "Crash");
        assert_eq!(json["s3Location"], "memory://dev1-a.zip");
        assert_eq!(json["sha256Hash"], "h");
    }
}
