//! Upload verification and storage
//!
//! Runs the integrity and authenticity checks on an already-extracted request
//! and hands the verified file to the blob store. The signature is always
//! checked against the hash of the bytes actually received, never the hash
//! the caller declared.

use axum::body::Bytes;

use super::types::{UploadError, UploadHeaders, UploadPayload, UploadResult};
use crate::signature::{calculate_signature, sha256_hex, verify_signature, SigningKey};
use crate::storage::{BlobStore, ObjectMetadata};

/// Storage key for an upload. Repeat uploads of a file name from the same
/// device overwrite each other.
pub fn storage_key(device_id: &str, file_name: &str) -> String {
    format!("{}-{}", device_id, file_name)
}

/// SHA-256 of the payload, computed on the blocking pool
async fn hash_payload(data: Bytes) -> Result<String, UploadError> {
    tokio::task::spawn_blocking(move || sha256_hex(&data))
        .await
        .map_err(|e| UploadError::Internal(format!("hashing task failed: {}", e)))
}

/// Verify an upload and store it.
///
/// The payload is consumed; its buffer is released on every return path.
pub async fn process_upload(
    key: &SigningKey,
    store: &dyn BlobStore,
    headers: UploadHeaders,
    payload: UploadPayload,
) -> Result<UploadResult, UploadError> {
    let actual_hash = hash_payload(payload.data.clone()).await?;

    if actual_hash != headers.declared_file_hash {
        tracing::warn!(
            device_id = %headers.device_id,
            declared = %headers.declared_file_hash,
            actual = %actual_hash,
            "File hash mismatch"
        );
        return Err(UploadError::HashMismatch {
            declared: headers.declared_file_hash,
            actual: actual_hash,
        });
    }

    let expected = calculate_signature(
        &headers.timestamp,
        &headers.content_type,
        &headers.device_id,
        &actual_hash,
        key,
    )?;

    if !verify_signature(&expected, &headers.signature) {
        tracing::warn!(device_id = %headers.device_id, "Signature verification failed");
        return Err(UploadError::InvalidSignature);
    }

    let UploadPayload {
        file_name,
        title,
        media_type,
        data,
    } = payload;
    let object_key = storage_key(&headers.device_id, &file_name);
    let size = data.len();

    let stored = store
        .put(&object_key, data, ObjectMetadata::new(media_type, actual_hash.clone()))
        .await?;

    tracing::info!(
        device_id = %headers.device_id,
        key = %stored.key,
        size,
        sha256 = %actual_hash,
        "Upload stored"
    );

    Ok(UploadResult {
        storage_key: stored.key,
        storage_location: stored.location,
        sha256_hash: actual_hash,
        file_name,
        title,
    })
}
