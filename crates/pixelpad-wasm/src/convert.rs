//! Standalone conversion bindings.
//!
//! PDF page export needs a rasterizer, which lives on the JavaScript side
//! (e.g. pdf.js). The page collects rendered pages into a [`JsPageBatch`]
//! and hands it to [`pdf_pages_to_images`]:
//!
//! ```typescript
//! const batch = new JsPageBatch();
//! try {
//!   const pdf = await pdfjs.getDocument({ data: bytes }).promise;
//!   for (let n = 1; n <= pdf.numPages; n++) {
//!     const { width, height, data } = await renderPage(pdf, n);
//!     batch.push_page(n, width, height, data);
//!   }
//! } catch (e) {
//!   batch.mark_unavailable(String(e));
//! }
//! const pages = pdf_pages_to_images(bytes, batch);
//! ```

use pixelpad_core::pdf::RenderedPages;
use pixelpad_core::{
    build_pdf, pad, render_pdf_pages, DecodedImage, ImageCodec, PageRenderer, ProcessConfig,
    ProcessError, RenderError, RenderedPage, SizeTarget, SizeUnit, SourceAsset,
};
use wasm_bindgen::prelude::*;

use crate::types::{to_js_error, JsArtifact};

/// Convert a JPEG, PNG or WEBP file to a one-page PDF.
///
/// # Errors
/// Returns an error for unsupported or undecodable input, and for PDF input.
#[wasm_bindgen]
pub fn image_to_pdf(
    bytes: Vec<u8>,
    mime_type: &str,
    file_name: Option<String>,
) -> Result<JsArtifact, JsValue> {
    let source =
        SourceAsset::from_upload(bytes, mime_type, file_name.as_deref()).map_err(to_js_error)?;
    let quality = ProcessConfig::default().high_quality;
    pixelpad_core::image_to_pdf(&ImageCodec, &source, quality)
        .map(JsArtifact::from_artifact)
        .map_err(to_js_error)
}

/// Pages rendered by the JavaScript PDF engine, in order.
///
/// A batch can be consumed once.
#[wasm_bindgen]
pub struct JsPageBatch {
    pages: Option<Vec<RenderedPage>>,
    unavailable: Option<String>,
}

impl Default for JsPageBatch {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsPageBatch {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsPageBatch {
        JsPageBatch {
            pages: Some(Vec::new()),
            unavailable: None,
        }
    }

    /// Add one rendered page. `rgba` is canvas `ImageData.data`.
    ///
    /// # Errors
    /// Returns an error if `rgba` is not `width * height * 4` bytes.
    pub fn push_page(
        &mut self,
        page_number: u32,
        width: u32,
        height: u32,
        rgba: Vec<u8>,
    ) -> Result<(), JsValue> {
        self.add_page(page_number, width, height, rgba)
            .map_err(to_js_error)
    }

    /// Record that the PDF engine could not be loaded.
    pub fn mark_unavailable(&mut self, reason: String) {
        self.unavailable = Some(reason);
    }

    #[wasm_bindgen(getter)]
    pub fn page_count(&self) -> usize {
        self.pages.as_ref().map_or(0, Vec::len)
    }
}

impl JsPageBatch {
    fn add_page(
        &mut self,
        page_number: u32,
        width: u32,
        height: u32,
        rgba: Vec<u8>,
    ) -> Result<(), RenderError> {
        let image = DecodedImage::new_rgba(width, height, rgba);
        if image.pixels.len() != image.expected_len() {
            return Err(RenderError::PageFailed {
                page: page_number,
                reason: format!(
                    "expected {} RGBA bytes for {}x{}, got {}",
                    image.expected_len(),
                    width,
                    height,
                    image.pixels.len()
                ),
            });
        }
        let pages = self
            .pages
            .as_mut()
            .ok_or_else(|| RenderError::Unavailable("page batch already consumed".to_string()))?;
        pages.push(RenderedPage { page_number, image });
        Ok(())
    }
}

impl PageRenderer for JsPageBatch {
    fn render<'a>(&'a mut self, _pdf: &'a [u8]) -> Result<RenderedPages<'a>, RenderError> {
        if let Some(reason) = self.unavailable.take() {
            return Err(RenderError::Unavailable(reason));
        }
        let pages = self
            .pages
            .take()
            .ok_or_else(|| RenderError::Unavailable("page batch already consumed".to_string()))?;
        Ok(Box::new(pages.into_iter().map(Ok::<_, RenderError>)))
    }
}

/// Encode each page in `batch` as PNG.
///
/// Returns an array of `JsArtifact`, one per page, in page order. An empty
/// batch yields an empty array.
///
/// # Errors
/// Returns the "PDF engine failed to load" message if the batch was marked
/// unavailable, or a render error if pages are missing or out of order.
#[wasm_bindgen]
pub fn pdf_pages_to_images(pdf: &[u8], batch: &mut JsPageBatch) -> Result<js_sys::Array, JsValue> {
    let pages = render_pdf_pages(batch, &ImageCodec, pdf).map_err(to_js_error)?;
    if pages.is_empty() {
        log::info!("No pages found.");
    }
    Ok(pages
        .into_iter()
        .map(|page| JsValue::from(JsArtifact::from_page(page)))
        .collect())
}

/// Wrap a baseline JPEG in a single-page PDF sized `width` x `height` points.
#[wasm_bindgen]
pub fn build_pdf_from_jpeg(jpeg: &[u8], width: u32, height: u32) -> Vec<u8> {
    build_pdf(jpeg, width, height)
}

/// Pad `bytes` to `value` `unit` (`KB` or `MB`).
///
/// Bytes already at or above the target come back unchanged.
///
/// # Errors
/// Returns an error for an invalid target, an unknown unit, or a target too
/// large to allocate.
#[wasm_bindgen]
pub fn pad_to_size(bytes: Vec<u8>, value: f64, unit: &str) -> Result<Vec<u8>, JsValue> {
    let unit: SizeUnit = unit.parse().map_err(to_js_error)?;
    pad_to_target(bytes, SizeTarget::new(value, unit)).map_err(to_js_error)
}

fn pad_to_target(bytes: Vec<u8>, target: SizeTarget) -> Result<Vec<u8>, ProcessError> {
    let target_bytes = target.to_bytes()?;
    let too_large = || ProcessError::TargetTooLarge(target_bytes);
    let len = usize::try_from(target_bytes).map_err(|_| too_large())?;
    pad(bytes, len).map_err(|_| too_large())
}

/// e.g. `1.50 KB`.
#[wasm_bindgen]
pub fn format_bytes(bytes: f64) -> String {
    pixelpad_core::format_bytes(bytes.max(0.0) as u64)
}
