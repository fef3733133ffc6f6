//! Error types shared by the crop engine.

use thiserror::Error;

/// Error types for crop session and extraction operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CropError {
    /// The aspect ratio is zero, negative, or not finite.
    #[error("Invalid aspect ratio: {0}")]
    InvalidAspectRatio(f64),

    /// A crop rectangle has a coordinate outside [0, 1] or no area.
    #[error("Invalid crop rectangle: ({left}, {top}, {right}, {bottom})")]
    InvalidCropRect {
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
    },

    /// The minimum size exceeds the maximum size, or either is negative.
    #[error("Invalid size constraints: minimum {minimum}, maximum {maximum}")]
    InvalidSizeConstraints { minimum: f64, maximum: f64 },

    /// The extraction size limit is zero, negative, or not finite.
    #[error("Invalid max output size: {0}")]
    InvalidMaxSize(f64),

    /// A pixel-dependent operation ran before an image was bound.
    #[error("Image not ready")]
    ImageNotReady,

    /// The pixel buffer does not match the declared dimensions.
    #[error("Pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    InvalidBitmap { expected: usize, actual: usize },

    /// The output image could not be materialized.
    #[error("Render failed: {0}")]
    Render(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(CropError::ImageNotReady.to_string(), "Image not ready");

        let err = CropError::InvalidAspectRatio(0.0);
        assert_eq!(err.to_string(), "Invalid aspect ratio: 0");

        let err = CropError::InvalidBitmap {
            expected: 16,
            actual: 12,
        };
        assert_eq!(
            err.to_string(),
            "Pixel buffer size mismatch: expected 16 bytes, got 12"
        );
    }
}
