//! Input validation: the uploaded file and its declared media type.
//!
//! The browser-reported media type is the only gate here. Anything other
//! than `application/pdf` is rejected immediately, before the bytes are
//! looked at — a corrupt PDF with the right media type is the extraction
//! stage's problem, not ours.

use crate::error::Pdf2QaError;
use tracing::debug;

/// The only accepted media type for uploads.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A user-supplied file: opaque bytes plus the declared media type.
///
/// Created by the file-selection event and consumed by extraction; the
/// pipeline does not retain it afterwards.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

impl UploadedFile {
    pub fn new(bytes: impl Into<Vec<u8>>, media_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            media_type: media_type.into(),
        }
    }
}

/// Check that the declared media type is exactly `application/pdf`.
pub fn validate_media_type(media_type: &str) -> Result<(), Pdf2QaError> {
    if media_type == PDF_MEDIA_TYPE {
        debug!("accepted upload with media type {}", media_type);
        Ok(())
    } else {
        Err(Pdf2QaError::InvalidFileType {
            media_type: media_type.to_string(),
        })
    }
}
