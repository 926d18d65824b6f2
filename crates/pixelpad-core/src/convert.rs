//! Format conversions built on the codec adapter and the PDF writer.

use crate::codec::{Codec, CodecError, DecodedImage, EncodeError};
use crate::error::{Conversion, ProcessError};
use crate::pdf::{build_pdf, PageRenderer, PageSequence};
use crate::types::{MimeType, OutputArtifact, SourceAsset};

/// Encode `image` as `mime`; PDF output wraps a JPEG encoded at `quality`.
pub fn encode_as<C: Codec + ?Sized>(
    codec: &C,
    image: &DecodedImage,
    mime: MimeType,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    match mime {
        MimeType::Pdf => {
            let jpeg = codec.encode(image, MimeType::Jpeg, quality)?;
            Ok(build_pdf(&jpeg, image.width, image.height))
        }
        _ => codec.encode(image, mime, quality),
    }
}

/// Decode `source` and re-encode it as `mime` at `quality`.
pub fn encode_source<C: Codec + ?Sized>(
    codec: &C,
    source: &SourceAsset,
    mime: MimeType,
    quality: f32,
) -> Result<Vec<u8>, CodecError> {
    let image = codec.decode(source.bytes(), source.mime())?;
    Ok(encode_as(codec, &image, mime, quality)?)
}

/// Convert an image to a one-page PDF.
///
/// Unlike the size search, an encode failure here is returned to the caller:
/// there is no sensible PDF to fall back to.
pub fn image_to_pdf<C: Codec + ?Sized>(
    codec: &C,
    source: &SourceAsset,
    quality: f32,
) -> Result<OutputArtifact, ProcessError> {
    if source.mime() == MimeType::Pdf {
        return Err(ProcessError::UnsupportedConversion(Conversion::PdfToPdf));
    }
    let bytes = encode_source(codec, source, MimeType::Pdf, quality)?;
    log::info!(
        "converted {} ({} bytes) to PDF ({} bytes)",
        source.mime(),
        source.byte_len(),
        bytes.len()
    );
    Ok(OutputArtifact::new(
        bytes,
        MimeType::Pdf,
        MimeType::Pdf.extension(),
        source.byte_len(),
    ))
}

/// A PNG produced from one rendered PDF page.
#[derive(Debug, Clone)]
pub struct PageArtifact {
    pub page_number: u32,
    pub artifact: OutputArtifact,
}

impl PageArtifact {
    /// Download name, e.g. `pixelpad-page-3.png`.
    pub fn suggested_file_name(&self) -> String {
        format!(
            "pixelpad-page-{}.{}",
            self.page_number,
            self.artifact.extension()
        )
    }
}

/// Render every page of `pdf` through `renderer` and encode each as PNG.
///
/// Pages are processed one after another; the first failure aborts the run.
/// A document with no pages yields an empty list.
pub fn render_pdf_pages<R, C>(
    renderer: &mut R,
    codec: &C,
    pdf: &[u8],
) -> Result<Vec<PageArtifact>, ProcessError>
where
    R: PageRenderer + ?Sized,
    C: Codec + ?Sized,
{
    let pages = PageSequence::new(renderer.render(pdf)?);

    let mut artifacts = Vec::new();
    for page in pages {
        let page = page?;
        let bytes = codec
            .encode(&page.image, MimeType::Png, 1.0)
            .map_err(CodecError::from)?;
        log::debug!("page {} rendered to {} PNG bytes", page.page_number, bytes.len());
        artifacts.push(PageArtifact {
            page_number: page.page_number,
            artifact: OutputArtifact::new(bytes, MimeType::Png, MimeType::Png.extension(), pdf.len()),
        });
    }

    log::info!("rendered {} PDF page(s)", artifacts.len());
    Ok(artifacts)
}
