//! PixelPad WASM - WebAssembly bindings for PixelPad
//!
//! This crate exposes the pixelpad-core compress / enlarge pipeline to the
//! browser page. Nothing leaves the page: files go in as `Uint8Array`s and
//! come back as `JsArtifact`s.
//!
//! # Module Structure
//!
//! - `session` - `JsSession`, the mode / output-format state machine
//! - `convert` - one-shot conversions (image to PDF, PDF pages to PNG, padding)
//! - `types` - `JsArtifact`, the produced-file wrapper
//! - `logger` - `log` records forwarded to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsSession } from '@pixelpad/wasm';
//!
//! await init();
//!
//! const session = new JsSession();
//! session.load_file(new Uint8Array(await file.arrayBuffer()), file.type, file.name);
//! const out = session.process(500, 'KB');
//! console.log(`${out.size_label} (${out.delta_label})`);
//! ```

use wasm_bindgen::prelude::*;

mod convert;
mod logger;
mod session;
mod types;

pub use convert::{
    build_pdf_from_jpeg, format_bytes, image_to_pdf, pad_to_size, pdf_pages_to_images,
    JsPageBatch,
};
pub use session::JsSession;
pub use types::JsArtifact;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    logger::init(log::LevelFilter::Info);
}

/// Change console verbosity: `error`, `warn`, `info`, `debug`, `trace` or `off`.
///
/// # Errors
/// Returns an error for an unknown level name.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = logger::parse_level(level)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown log level: {}", level)))?;
    logger::init(filter);
    Ok(())
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
