//! Core types for the codec adapter.

use std::borrow::Cow;

use image::{DynamicImage, ExtendedColorType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::MimeType;

/// Decoding failures.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The format cannot be decoded to pixels by this codec.
    #[error("Cannot decode {0} to pixels")]
    UnsupportedFormat(MimeType),

    /// The container could not be read.
    #[error("Could not read image data: {0}")]
    CorruptedFile(String),
}

/// Encoding failures.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    InvalidPixelData { expected: usize, actual: usize },

    #[error("Cannot encode a {width}x{height} image")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec has no encoder for this format.
    #[error("No encoder for {0}")]
    UnsupportedFormat(MimeType),

    #[error("{format} encoding failed: {reason}")]
    EncodingFailed { format: MimeType, reason: String },
}

/// Either half of a decode-then-encode round.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// EXIF `Orientation` tag (1..=8); how the stored pixels must be turned to
/// display upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Mirrored across the top-left to bottom-right diagonal.
    Transpose = 5,
    Rotate90CW = 6,
    /// Mirrored across the top-right to bottom-left diagonal.
    Transverse = 7,
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Channel layout of a decoded pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PixelLayout {
    #[default]
    Rgb8,
    Rgba8,
}

impl PixelLayout {
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Rgb8 => 3,
            PixelLayout::Rgba8 => 4,
        }
    }

    pub fn color_type(self) -> ExtendedColorType {
        match self {
            PixelLayout::Rgb8 => ExtendedColorType::Rgb8,
            PixelLayout::Rgba8 => ExtendedColorType::Rgba8,
        }
    }
}

/// A decoded image with 8-bit RGB or RGBA pixel data.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Channel layout of `pixels`.
    pub layout: PixelLayout,
    /// Pixel data in row-major order.
    /// Length should be width * height * layout.channels().
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create an RGB image.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            layout: PixelLayout::Rgb8,
            pixels,
        }
    }

    /// Create an RGBA image, as produced by a canvas readback.
    pub fn new_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            layout: PixelLayout::Rgba8,
            pixels,
        }
    }

    /// Convert from the image crate, keeping alpha only when present.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        if img.color().has_alpha() {
            let rgba = img.into_rgba8();
            let (width, height) = rgba.dimensions();
            Self::new_rgba(width, height, rgba.into_raw())
        } else {
            let rgb = img.into_rgb8();
            let (width, height) = rgb.dimensions();
            Self::new(width, height, rgb.into_raw())
        }
    }

    /// Expected pixel buffer length for the declared dimensions.
    pub fn expected_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * self.layout.channels()
    }

    /// RGB view of the pixels; alpha is dropped for RGBA images.
    pub fn rgb_pixels(&self) -> Cow<'_, [u8]> {
        match self.layout {
            PixelLayout::Rgb8 => Cow::Borrowed(&self.pixels),
            PixelLayout::Rgba8 => Cow::Owned(
                self.pixels
                    .chunks_exact(4)
                    .flat_map(|px| [px[0], px[1], px[2]])
                    .collect(),
            ),
        }
    }
}
