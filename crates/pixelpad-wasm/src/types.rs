//! WASM-compatible wrapper types.
//!
//! Artifacts stay in WASM memory until JavaScript asks for the bytes; each
//! call to `bytes()` copies them into a fresh `Uint8Array`.

use pixelpad_core::{delta_label, format_bytes, OutputArtifact, PageArtifact};
use wasm_bindgen::prelude::*;

/// A produced file, ready for preview or download.
#[wasm_bindgen]
pub struct JsArtifact {
    inner: OutputArtifact,
    page_number: Option<u32>,
}

#[wasm_bindgen]
impl JsArtifact {
    /// Encoded file bytes as a `Uint8Array` (copied).
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes().to_vec()
    }

    /// MIME type, e.g. `image/jpeg`. Use it as the Blob type.
    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.mime().as_str().to_string()
    }

    /// Suggested extension without the dot.
    #[wasm_bindgen(getter)]
    pub fn extension(&self) -> String {
        self.inner.extension().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.byte_len()
    }

    /// Signed size change against the source, in bytes.
    ///
    /// Returned as a JS number rather than a BigInt; file sizes stay far
    /// below 2^53.
    #[wasm_bindgen(getter)]
    pub fn delta(&self) -> f64 {
        self.inner.delta() as f64
    }

    /// e.g. `1.24 MB smaller`.
    #[wasm_bindgen(getter)]
    pub fn delta_label(&self) -> String {
        delta_label(self.inner.delta())
    }

    /// e.g. `480.3 KB`.
    #[wasm_bindgen(getter)]
    pub fn size_label(&self) -> String {
        format_bytes(self.inner.byte_len() as u64)
    }

    /// Page number for artifacts exported from a PDF page, else `undefined`.
    #[wasm_bindgen(getter)]
    pub fn page_number(&self) -> Option<u32> {
        self.page_number
    }

    /// Download name. Pages ignore the timestamp.
    pub fn file_name(&self, timestamp_ms: f64) -> String {
        match self.page_number {
            Some(page) => format!("pixelpad-page-{}.{}", page, self.inner.extension()),
            None => self.inner.suggested_file_name(timestamp_ms.max(0.0) as u64),
        }
    }
}

impl JsArtifact {
    pub(crate) fn from_artifact(inner: OutputArtifact) -> Self {
        Self {
            inner,
            page_number: None,
        }
    }

    pub(crate) fn from_page(page: PageArtifact) -> Self {
        Self {
            inner: page.artifact,
            page_number: Some(page.page_number),
        }
    }
}

/// Map any displayable error onto a JS string value.
pub(crate) fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
