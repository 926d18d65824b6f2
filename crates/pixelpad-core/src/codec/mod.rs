//! Codec adapter: pixels in, encoded bytes out.
//!
//! The [`Codec`] trait is the seam between the size search and whatever
//! actually encodes images. [`ImageCodec`] implements it with the `image`
//! crate; tests substitute deterministic codecs.
//!
//! # Examples
//!
//! ```ignore
//! use pixelpad_core::codec::{Codec, ImageCodec};
//! use pixelpad_core::MimeType;
//!
//! let codec = ImageCodec;
//! let image = codec.decode(&std::fs::read("photo.jpg")?, MimeType::Jpeg)?;
//! let smaller = codec.encode(&image, MimeType::Jpeg, 0.6)?;
//! ```

mod decode;
mod encode;
mod types;

pub use decode::{decode_image, extract_orientation};
pub use encode::{encode_image, jpeg_quality, webp_quality};
pub use types::{CodecError, DecodeError, DecodedImage, EncodeError, Orientation, PixelLayout};

use crate::types::MimeType;

/// Image encode/decode backend.
///
/// `quality` is in `[0, 1]` and only meaningful for lossy formats.
/// Implementations never encode PDF; PDF output is assembled by the caller
/// from a JPEG encode.
pub trait Codec {
    fn decode(&self, bytes: &[u8], mime: MimeType) -> Result<DecodedImage, DecodeError>;

    fn encode(
        &self,
        image: &DecodedImage,
        mime: MimeType,
        quality: f32,
    ) -> Result<Vec<u8>, EncodeError>;
}

/// Codec backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl Codec for ImageCodec {
    fn decode(&self, bytes: &[u8], mime: MimeType) -> Result<DecodedImage, DecodeError> {
        decode_image(bytes, mime)
    }

    fn encode(
        &self,
        image: &DecodedImage,
        mime: MimeType,
        quality: f32,
    ) -> Result<Vec<u8>, EncodeError> {
        encode_image(image, mime, quality)
    }
}

impl<C: Codec + ?Sized> Codec for &C {
    fn decode(&self, bytes: &[u8], mime: MimeType) -> Result<DecodedImage, DecodeError> {
        (**self).decode(bytes, mime)
    }

    fn encode(
        &self,
        image: &DecodedImage,
        mime: MimeType,
        quality: f32,
    ) -> Result<Vec<u8>, EncodeError> {
        (**self).encode(image, mime, quality)
    }
}
