//! Error types for diagram output.

use thiserror::Error;

/// Errors that can occur while encoding a rendered diagram.
#[derive(Debug, Error)]
pub enum BlueprintError {
    /// Pixel buffer does not match the image size.
    #[error("RGBA buffer holds {actual} bytes, {width}x{height} needs {expected}")]
    BufferSize {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
        /// Bytes required for the image.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },

    /// PNG encoder failure.
    #[error("PNG encoding failed: {0}")]
    PngEncoding(#[from] png::EncodingError),
}

/// Result type for diagram output.
pub type BlueprintResult<T> = std::result::Result<T, BlueprintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BlueprintError::BufferSize {
            width: 3,
            height: 3,
            expected: 36,
            actual: 16,
        };
        assert_eq!(
            format!("{err}"),
            "RGBA buffer holds 16 bytes, 3x3 needs 36"
        );
    }
}
