use thiserror::Error;

use crate::domain::pagination::PageRequestError;

/// Error for CarId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CarIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for car field validation failures
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CarValidationError {
    #[error("Brand must be 1-{max} characters, got {actual}")]
    BrandLength { max: usize, actual: usize },

    #[error("Model must be 1-{max} characters, got {actual}")]
    ModelLength { max: usize, actual: usize },

    #[error("Year must be between {min} and {max}, got {actual}")]
    YearOutOfRange { min: i32, max: i32, actual: i32 },

    #[error("Engine displacement must be positive, got {0}")]
    InvalidDisplacement(i32),

    #[error("Engine power must be between {min} and {max} kW, got {actual}")]
    PowerOutOfRange { min: i32, max: i32, actual: i32 },

    #[error("Price must be positive, got {0}")]
    InvalidPrice(f64),

    #[error("Description must be at most {max} characters, got {actual}")]
    DescriptionTooLong { max: usize, actual: usize },
}

/// Error for image upload validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImageUploadError {
    #[error("Unsupported image content type: {0} (expected image/jpeg or image/png)")]
    UnsupportedContentType(String),

    #[error("Image too large: {actual} bytes exceeds the {max} byte limit")]
    TooLarge { max: usize, actual: usize },
}

/// Top-level error for all car-related operations
#[derive(Debug, Clone, Error)]
pub enum CarError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid car ID: {0}")]
    InvalidCarId(#[from] CarIdError),

    #[error("Invalid car data: {0}")]
    Validation(#[from] CarValidationError),

    #[error("Invalid image: {0}")]
    Image(#[from] ImageUploadError),

    #[error("Invalid page request: {0}")]
    Page(#[from] PageRequestError),

    // Domain-level errors
    #[error("Car not found: {0}")]
    NotFound(String),

    // Infrastructure errors
    #[error("Image upload failed: {0}")]
    ImageStoreUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for CarError {
    fn from(err: anyhow::Error) -> Self {
        CarError::Unknown(err.to_string())
    }
}

/// Error for the listing notification pipeline.
///
/// Never surfaced to HTTP callers; the pipeline runs after the creating
/// request has already succeeded.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    #[error("Copy generation failed: {0}")]
    GenerationFailed(String),

    #[error("Generated copy has unexpected shape: {0}")]
    MalformedCopy(String),

    #[error("Failed to persist generated copy: {0}")]
    PersistFailed(String),

    #[error("Email delivery failed: {0}")]
    EmailFailed(String),
}
