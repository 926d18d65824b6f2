//! Processing session bindings.
//!
//! # Example
//!
//! ```typescript
//! const session = new JsSession();
//! session.load_file(new Uint8Array(await file.arrayBuffer()), file.type, file.name);
//! session.set_output_format('webp');
//! try {
//!   const out = session.process(500, 'KB');
//!   download(new Blob([out.bytes()], { type: out.mime_type }), out.file_name(Date.now()));
//! } finally {
//!   statusLine.textContent = session.status_message;
//! }
//! ```

use std::str::FromStr;

use pixelpad_core::{
    ImageCodec, Mode, OutputFormat, ProcessConfig, ProcessError, Session, SizeTarget, SizeUnit,
};
use wasm_bindgen::prelude::*;

use crate::types::{to_js_error, JsArtifact};

/// Compress / enlarge session holding one source file.
#[wasm_bindgen]
pub struct JsSession {
    inner: Session<ImageCodec>,
}

impl Default for JsSession {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsSession {
    /// Create a session with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsSession {
        JsSession {
            inner: Session::new(ImageCodec),
        }
    }

    /// Create a session from a partial configuration object, e.g.
    /// `{ search: { iterations: 12 }, high_quality: 0.95 }`.
    ///
    /// # Errors
    /// Returns an error if the object has the wrong shape or its values are
    /// out of range.
    pub fn with_config(config: JsValue) -> Result<JsSession, JsValue> {
        let config: ProcessConfig = if config.is_undefined() || config.is_null() {
            ProcessConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid configuration: {}", e)))?
        };
        let inner = Session::with_config(ImageCodec, config).map_err(to_js_error)?;
        Ok(JsSession { inner })
    }

    /// Current configuration as a plain object.
    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.config()).map_err(to_js_error)
    }

    /// Load a file. `mime_type` may be empty, in which case the name decides.
    pub fn load_file(
        &mut self,
        bytes: Vec<u8>,
        mime_type: &str,
        file_name: Option<String>,
    ) -> Result<(), JsValue> {
        self.inner
            .load_upload(bytes, mime_type, file_name.as_deref())
            .map_err(to_js_error)
    }

    /// `compress` or `enlarge`. An unknown name fails the session.
    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode: Mode = self.parse_option(mode).map_err(to_js_error)?;
        self.inner.set_mode(mode);
        Ok(())
    }

    /// `original`, `jpg`, `png`, `webp` or `pdf`. An unknown name fails the
    /// session.
    pub fn set_output_format(&mut self, format: &str) -> Result<(), JsValue> {
        let format: OutputFormat = self.parse_option(format).map_err(to_js_error)?;
        self.inner.set_output_format(format);
        Ok(())
    }

    /// Run the current mode. `unit` is `KB` or `MB`.
    ///
    /// The status line is updated whether or not this succeeds.
    pub fn process(&mut self, value: f64, unit: &str) -> Result<JsArtifact, JsValue> {
        let unit: SizeUnit = self.parse_option(unit).map_err(to_js_error)?;
        let artifact = self
            .inner
            .process(SizeTarget::new(value, unit))
            .map_err(to_js_error)?;
        Ok(JsArtifact::from_artifact(artifact.clone()))
    }

    /// Last produced artifact, if it is still current.
    pub fn output(&self) -> Option<JsArtifact> {
        self.inner.output().cloned().map(JsArtifact::from_artifact)
    }

    /// Release the current artifact.
    pub fn reset_output(&mut self) {
        self.inner.reset_output();
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        self.inner.mode().as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn output_format(&self) -> String {
        self.inner.output_format().as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn has_source(&self) -> bool {
        self.inner.source().is_some()
    }

    /// Source MIME type, or `undefined` before a file is loaded.
    #[wasm_bindgen(getter)]
    pub fn source_mime_type(&self) -> Option<String> {
        self.inner.source().map(|s| s.mime().as_str().to_string())
    }

    #[wasm_bindgen(getter)]
    pub fn source_byte_length(&self) -> usize {
        self.inner.source().map_or(0, |s| s.byte_len())
    }

    /// Machine-readable status, e.g. `target_too_small`.
    #[wasm_bindgen(getter)]
    pub fn status_code(&self) -> String {
        self.inner.status().code.as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn status_message(&self) -> String {
        self.inner.status().message.clone()
    }

    /// `info`, `warning` or `error`.
    #[wasm_bindgen(getter)]
    pub fn status_severity(&self) -> String {
        self.inner.status().severity().as_str().to_string()
    }

    /// True for warnings and errors; the page styles the status line on it.
    #[wasm_bindgen(getter)]
    pub fn is_error(&self) -> bool {
        self.inner.status().is_error()
    }
}

impl JsSession {
    /// Parse a string option from the page, failing the session on error.
    fn parse_option<T>(&mut self, value: &str) -> Result<T, ProcessError>
    where
        T: FromStr<Err = ProcessError>,
    {
        value.parse().inspect_err(|e| self.inner.fail(e))
    }
}
