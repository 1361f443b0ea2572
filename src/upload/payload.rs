//! Multipart payload extraction

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;

use super::types::{UploadError, UploadPayload, ACCEPTED_MEDIA_TYPE, MAX_FILE_SIZE};

/// Read the `file` and `title` parts of an upload.
///
/// A body that is not multipart at all carries no file. A `file` part without
/// a filename is a plain text field, not a file. Only the first file part is
/// kept; the media type is checked before its bytes are buffered, and the
/// file is rejected as soon as it grows past [`MAX_FILE_SIZE`].
pub async fn read_payload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadPayload, UploadError> {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            tracing::debug!("Upload body is not multipart: {}", rejection);
            return Err(UploadError::NoFile);
        }
    };

    let mut file = None;
    let mut title = None;

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" if file.is_none() => {
                let Some(file_name) = field.file_name().map(str::to_string) else {
                    continue;
                };
                let media_type = field.content_type().unwrap_or_default().to_string();
                if media_type != ACCEPTED_MEDIA_TYPE {
                    return Err(UploadError::InvalidFileType(media_type));
                }

                let mut buf = Vec::new();
                while let Some(chunk) = field.chunk().await? {
                    if buf.len() + chunk.len() > MAX_FILE_SIZE {
                        return Err(UploadError::FileTooLarge { max: MAX_FILE_SIZE });
                    }
                    buf.extend_from_slice(&chunk);
                }
                let data = Bytes::from(buf);
                tracing::debug!(file_name = %file_name, size = data.len(), "Read file part");
                file = Some((file_name, media_type, data));
            }
            "title" => {
                title = Some(field.text().await?);
            }
            _ => {}
        }
    }

    let (file_name, media_type, data) = file.ok_or(UploadError::NoFile)?;
    let title = title.ok_or(UploadError::MissingTitle)?;

    Ok(UploadPayload {
        file_name,
        title,
        media_type,
        data,
    })
}
