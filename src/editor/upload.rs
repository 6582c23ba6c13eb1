//! Image ingestion: type/size checks and data-URL encoding

use base64::Engine;

use crate::error::UploadError;

/// Reject anything that is not an image or is over `limit` bytes
pub fn check_image(mime: &str, size: u64, limit: u64) -> Result<(), UploadError> {
    if !mime.starts_with("image/") {
        return Err(UploadError::NotAnImage {
            mime: mime.to_string(),
        });
    }
    if size > limit {
        return Err(UploadError::TooLarge { size, limit });
    }
    Ok(())
}

/// `data:<mime>;base64,<payload>`
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime, payload)
}

/// Check then encode a picked file
pub fn ingest_image(mime: &str, bytes: &[u8], limit: u64) -> Result<String, UploadError> {
    check_image(mime, bytes.len() as u64, limit)?;
    Ok(encode_data_url(mime, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_IMAGE_BYTES;

    #[test]
    fn test_rejects_non_image() {
        let err = check_image("video/mp4", 10, MAX_IMAGE_BYTES).unwrap_err();
        assert_eq!(err.to_string(), "Please choose an image.");
        assert_eq!(err.row_status(), "Use image under ~3MB.");
    }

    #[test]
    fn test_size_ceiling_inclusive() {
        assert!(check_image("image/png", MAX_IMAGE_BYTES, MAX_IMAGE_BYTES).is_ok());
        let err = check_image("image/png", MAX_IMAGE_BYTES + 1, MAX_IMAGE_BYTES).unwrap_err();
        assert_eq!(
            err,
            UploadError::TooLarge {
                size: MAX_IMAGE_BYTES + 1,
                limit: MAX_IMAGE_BYTES
            }
        );
        assert_eq!(err.to_string(), "Image too large (max ~3MB).");
    }

    #[test]
    fn test_encode_data_url() {
        assert_eq!(encode_data_url("image/gif", b"GIF89a"), "data:image/gif;base64,R0lGODlh");
    }

    #[test]
    fn test_ingest_image() {
        let url = ingest_image("image/png", &[0x89, b'P', b'N', b'G'], 16).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert!(ingest_image("image/png", &[0; 17], 16).is_err());
    }
}
