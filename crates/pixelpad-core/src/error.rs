//! User-facing error type for processing runs.

use std::fmt;

use thiserror::Error;

use crate::codec::CodecError;
use crate::pdf::RenderError;

/// Conversions the core refuses to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Turning a PDF into a raster image without the page renderer.
    PdfToImage,
    /// Shrinking a PDF, which would require re-rendering its pages.
    PdfCompression,
    /// Wrapping a PDF inside another PDF.
    PdfToPdf,
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Conversion::PdfToImage => {
                "PDF conversion to images isn't available in this build. Use the PDF page export instead."
            }
            Conversion::PdfCompression => {
                "PDF compression isn't available without re-rendering. Use Enlarge Size to pad."
            }
            Conversion::PdfToPdf => "This file is already a PDF. Select an image to convert.",
        };
        f.write_str(message)
    }
}

/// Errors surfaced to the caller of a processing run.
///
/// Every variant carries a message suitable for direct display.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The input MIME type is not one of JPEG, PNG, WEBP or PDF.
    #[error("Please upload a JPG, PNG, WEBP, or PDF file (got {0}).")]
    UnsupportedInputFormat(String),

    /// The size target was not a finite positive number.
    #[error("Enter a valid target size.")]
    InvalidTarget,

    /// The padded file would not fit in memory.
    #[error("Target size of {0} bytes is too large to build on this device.")]
    TargetTooLarge(u64),

    /// The codec produced no output for an explicit conversion.
    #[error("Encoding failed: {0}")]
    EncodeFailure(#[from] CodecError),

    /// The requested conversion cannot be performed by the core.
    #[error("{0}")]
    UnsupportedConversion(Conversion),

    /// The PDF page renderer could not be initialized.
    #[error("PDF engine failed to load: {0}. Check your internet connection and retry.")]
    RendererUnavailable(String),

    /// The PDF page renderer failed part way through a document.
    #[error("PDF rendering failed: {0}")]
    RenderFailed(String),

    /// Processing was requested before any file was loaded.
    #[error("Upload an image first.")]
    NoSource,

    /// A mode, unit or output-format string was not recognized.
    #[error("Unknown {kind}: {value}")]
    UnknownOption { kind: &'static str, value: String },

    /// The processing configuration is inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<RenderError> for ProcessError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Unavailable(reason) => ProcessError::RendererUnavailable(reason),
            other => ProcessError::RenderFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_messages_are_descriptive() {
        let err = ProcessError::UnsupportedConversion(Conversion::PdfCompression);
        assert!(err.to_string().contains("Enlarge Size"));

        let err = ProcessError::UnsupportedConversion(Conversion::PdfToImage);
        assert!(err.to_string().starts_with("PDF conversion to images"));
    }

    #[test]
    fn test_render_error_mapping() {
        let err: ProcessError = RenderError::Unavailable("script blocked".to_string()).into();
        assert!(matches!(err, ProcessError::RendererUnavailable(_)));
        assert!(err.to_string().contains("script blocked"));

        let err: ProcessError = RenderError::PageFailed {
            page: 3,
            reason: "bad stream".to_string(),
        }
        .into();
        assert!(matches!(err, ProcessError::RenderFailed(_)));
    }

    #[test]
    fn test_unknown_option_display() {
        let err = ProcessError::UnknownOption {
            kind: "size unit",
            value: "GB".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown size unit: GB");
    }

    #[test]
    fn test_target_too_large_display() {
        let err = ProcessError::TargetTooLarge(1 << 60);
        assert_eq!(
            err.to_string(),
            "Target size of 1152921504606846976 bytes is too large to build on this device."
        );
    }
}
