//! Contract for the external PDF page renderer.
//!
//! The core never rasterizes PDFs itself. A renderer (pdf.js in the browser)
//! hands back pages one at a time; [`PageSequence`] checks that they arrive
//! numbered 1, 2, 3... and that the sequence is consumed at most once.

use thiserror::Error;

use crate::codec::DecodedImage;

/// One rasterized page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// 1-based page number.
    pub page_number: u32,
    pub image: DecodedImage,
}

#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer failed to load or initialize.
    #[error("{0}")]
    Unavailable(String),

    /// A single page could not be rendered.
    #[error("page {page}: {reason}")]
    PageFailed { page: u32, reason: String },

    /// The renderer yielded pages out of order.
    #[error("expected page {expected}, renderer produced page {actual}")]
    OutOfOrder { expected: u32, actual: u32 },
}

/// Boxed page iterator returned by a renderer.
pub type RenderedPages<'a> = Box<dyn Iterator<Item = Result<RenderedPage, RenderError>> + 'a>;

/// Rasterizes every page of a PDF, in order.
pub trait PageRenderer {
    /// Start rendering `pdf`. Fails with [`RenderError::Unavailable`] when the
    /// rendering engine cannot be loaded.
    fn render<'a>(&'a mut self, pdf: &'a [u8]) -> Result<RenderedPages<'a>, RenderError>;
}

/// Order-checking adapter over a renderer's page iterator.
pub struct PageSequence<'a> {
    inner: RenderedPages<'a>,
    expected: u32,
    finished: bool,
}

impl<'a> PageSequence<'a> {
    pub fn new(inner: RenderedPages<'a>) -> Self {
        Self {
            inner,
            expected: 1,
            finished: false,
        }
    }
}

impl Iterator for PageSequence<'_> {
    type Item = Result<RenderedPage, RenderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = match self.inner.next() {
            Some(Ok(page)) if page.page_number != self.expected => Err(RenderError::OutOfOrder {
                expected: self.expected,
                actual: page.page_number,
            }),
            Some(item) => item,
            None => {
                self.finished = true;
                return None;
            }
        };
        // The first error ends the sequence.
        self.finished = item.is_err();
        self.expected += 1;
        Some(item)
    }
}
