//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Decode failures surface as `UnsupportedFormat`, guard and allocation failures as
//! `Resource`; callers treat both as per-image failures.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported or corrupt image: {0}")]
    UnsupportedFormat(String),

    #[error("Resource limit exceeded: {0}")]
    Resource(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Size must be greater than 0, got: {size}")]
    ZeroSize { size: usize },

    #[error("Processing error: {0}")]
    Processing(String),
}

impl Error {
    /// True for failures the caller should absorb by dropping the image.
    pub fn is_per_image(&self) -> bool {
        matches!(self, Error::UnsupportedFormat(_) | Error::Resource(_))
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::Limits(l) => Error::Resource(l.to_string()),
            // Decoding reads from memory, so I/O failures mean truncated data
            other => Error::UnsupportedFormat(other.to_string()),
        }
    }
}

impl From<tiff::TiffError> for Error {
    fn from(e: tiff::TiffError) -> Self {
        match e {
            tiff::TiffError::LimitsExceeded => Error::Resource("TIFF decoder limits exceeded".into()),
            other => Error::UnsupportedFormat(other.to_string()),
        }
    }
}
