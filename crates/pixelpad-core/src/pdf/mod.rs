//! PDF support: the single-page JPEG writer and the page-renderer contract.

mod render;
mod writer;

pub use render::{PageRenderer, PageSequence, RenderError, RenderedPage, RenderedPages};
pub use writer::{build_pdf, build_pdf_with_table, ByteAccumulator, PdfObjectTable, OBJECT_COUNT};
