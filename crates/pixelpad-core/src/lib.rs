//! PixelPad Core - file size compression and enlargement
//!
//! This crate hits a target byte size for JPEG, PNG, WEBP and PDF files,
//! entirely in memory:
//!
//! - compress: binary-search the encoder quality until the output fits
//! - enlarge: append inert padding after the file's end marker
//! - convert: wrap images in a one-page PDF, export PDF pages as PNG
//!
//! [`Session`] ties these together behind a mode / output-format state
//! machine; the free functions are usable on their own.

pub mod codec;
pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod padding;
pub mod pdf;
pub mod search;
pub mod session;
pub mod types;

pub use codec::{Codec, CodecError, DecodedImage, ImageCodec};
pub use config::{ProcessConfig, SearchConfig};
pub use convert::{encode_as, image_to_pdf, render_pdf_pages, PageArtifact};
pub use error::{Conversion, ProcessError};
pub use format::{delta_label, format_bytes};
pub use padding::{pad, pad_with_marker, PADDING_MARKER};
pub use pdf::{build_pdf, PageRenderer, RenderError, RenderedPage};
pub use search::{search_quality, SearchOutcome};
pub use session::{Session, Severity, Status, StatusCode};
pub use types::{
    EncodedCandidate, MimeType, Mode, OutputArtifact, OutputFormat, OutputSpec, SizeTarget,
    SizeUnit, SourceAsset, KIB, MIB,
};
