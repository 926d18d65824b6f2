//! Image decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat, ImageReader};

use super::{DecodeError, DecodedImage, Orientation};
use crate::types::MimeType;

/// Decode JPEG, PNG or WEBP bytes, applying EXIF orientation correction.
///
/// The container is sniffed from the bytes; the declared MIME type is only
/// used when sniffing finds nothing.
///
/// # Errors
///
/// Returns `DecodeError::UnsupportedFormat` for PDF input and
/// `DecodeError::CorruptedFile` if the bytes cannot be decoded.
pub fn decode_image(bytes: &[u8], mime: MimeType) -> Result<DecodedImage, DecodeError> {
    let declared = image_format(mime).ok_or(DecodeError::UnsupportedFormat(mime))?;

    let orientation = extract_orientation(bytes);

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    if reader.format().is_none() {
        reader.set_format(declared);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    Ok(DecodedImage::from_dynamic(apply_orientation(img, orientation)))
}

fn image_format(mime: MimeType) -> Option<ImageFormat> {
    match mime {
        MimeType::Jpeg => Some(ImageFormat::Jpeg),
        MimeType::Png => Some(ImageFormat::Png),
        MimeType::Webp => Some(ImageFormat::WebP),
        MimeType::Pdf => None,
    }
}

/// Extract EXIF orientation from an image container.
///
/// Returns `Orientation::Normal` if no EXIF data is found.
pub fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
