//! Error types for storage and image ingestion

use thiserror::Error;

/// Failure writing to (or reading from) the key-value store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Value could not be converted to or from JSON
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The underlying store refused the operation (quota exceeded, unavailable)
    #[error("Storage error: {0}")]
    Backend(String),
}

/// Rejected image upload
///
/// The display text is what the editor shows in the field's status label.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Please choose an image.")]
    NotAnImage { mime: String },

    #[error("Image too large (max ~3MB).")]
    TooLarge { size: u64, limit: u64 },
}

impl UploadError {
    /// Shorter status text used inside gallery and team rows
    pub fn row_status(&self) -> &'static str {
        "Use image under ~3MB."
    }
}
