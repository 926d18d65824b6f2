//! Image encoding to JPEG, PNG and WEBP.
//!
//! JPEG and WEBP honour the quality setting. PNG is lossless, so quality is
//! ignored for it.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{DecodedImage, EncodeError, PixelLayout};
use crate::types::MimeType;

/// Map a `[0, 1]` quality to the JPEG encoder's 1-100 scale.
///
/// Out-of-range and NaN values are clamped.
pub fn jpeg_quality(quality: f32) -> u8 {
    let scaled = (quality.clamp(0.0, 1.0) * 100.0).round();
    (scaled as u8).clamp(1, 100)
}

/// Encode pixels to `mime` at `quality` (0.0 to 1.0).
///
/// # Errors
///
/// Returns an error if the dimensions are zero, the pixel buffer does not
/// match them, the format has no encoder (PDF), or the encoder fails.
pub fn encode_image(
    image: &DecodedImage,
    mime: MimeType,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    validate(image)?;

    let mut buffer = Cursor::new(Vec::new());
    let result = match mime {
        MimeType::Jpeg => {
            let rgb = image.rgb_pixels();
            JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality)).write_image(
                &rgb,
                image.width,
                image.height,
                ExtendedColorType::Rgb8,
            )
        }
        MimeType::Png => PngEncoder::new(&mut buffer).write_image(
            &image.pixels,
            image.width,
            image.height,
            image.layout.color_type(),
        ),
        MimeType::Webp => return encode_webp(image, quality),
        MimeType::Pdf => return Err(EncodeError::UnsupportedFormat(mime)),
    };

    result.map_err(|e| EncodeError::EncodingFailed {
        format: mime,
        reason: e.to_string(),
    })?;

    Ok(buffer.into_inner())
}

/// Lossy WEBP through libwebp; `quality` maps to libwebp's 0-100 scale.
fn encode_webp(image: &DecodedImage, quality: f32) -> Result<Vec<u8>, EncodeError> {
    let encoder = match image.layout {
        PixelLayout::Rgb8 => webp::Encoder::from_rgb(&image.pixels, image.width, image.height),
        PixelLayout::Rgba8 => webp::Encoder::from_rgba(&image.pixels, image.width, image.height),
    };

    let mut config = webp::WebPConfig::new().map_err(|_| EncodeError::EncodingFailed {
        format: MimeType::Webp,
        reason: "could not create encoder config".to_string(),
    })?;
    config.quality = webp_quality(quality);

    let encoded = encoder
        .encode_advanced(&config)
        .map_err(|e| EncodeError::EncodingFailed {
            format: MimeType::Webp,
            reason: format!("{:?}", e),
        })?;
    Ok(encoded.to_vec())
}

/// Map a `[0, 1]` quality to libwebp's 0-100 scale. NaN maps to 0.
pub fn webp_quality(quality: f32) -> f32 {
    if quality.is_nan() {
        return 0.0;
    }
    quality.clamp(0.0, 1.0) * 100.0
}

fn validate(image: &DecodedImage) -> Result<(), EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = image.expected_len();
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }
    Ok(())
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: valid input always yields a well-formed JPEG.
        #[test]
        fn prop_valid_input_produces_valid_jpeg(
            width in 1u32..=40,
            height in 1u32..=40,
            quality in 0.0f32..=1.0,
        ) {
            let img = DecodedImage::new(width, height, vec![128u8; (width * height * 3) as usize]);
            let jpeg = encode_image(&img, MimeType::Jpeg, quality).unwrap();

            prop_assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
            prop_assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
        }

        /// Property: same input and quality always produce the same bytes.
        #[test]
        fn prop_deterministic_output(
            width in 1u32..=20,
            height in 1u32..=20,
            quality in 0.0f32..=1.0,
        ) {
            let img = DecodedImage::new(width, height, vec![100u8; (width * height * 3) as usize]);
            let a = encode_image(&img, MimeType::Jpeg, quality).unwrap();
            let b = encode_image(&img, MimeType::Jpeg, quality).unwrap();
            prop_assert_eq!(a, b);
        }

        /// Property: a buffer of the wrong length is always rejected.
        #[test]
        fn prop_invalid_pixel_length_returns_error(
            width in 1u32..=20,
            height in 1u32..=20,
            extra in 1usize..=10,
        ) {
            let img = DecodedImage::new(width, height, vec![0u8; (width * height * 3) as usize + extra]);
            let result = encode_image(&img, MimeType::Png, 1.0);
            let rejected = matches!(result, Err(EncodeError::InvalidPixelData { .. }));
            prop_assert!(rejected, "unexpected result: {:?}", result);
        }
    }
}
