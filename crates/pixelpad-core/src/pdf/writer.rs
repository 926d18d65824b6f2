//! Single-page PDF writer embedding one JPEG through `/DCTDecode`.
//!
//! Object layout:
//!
//! | #  | Object                                   |
//! |----|------------------------------------------|
//! | 1  | Catalog                                  |
//! | 2  | Pages (one kid)                          |
//! | 3  | Page, `MediaBox [0 0 W H]`               |
//! | 4  | Image XObject `/Im0`, raw JPEG stream    |
//! | 5  | Content stream drawing `/Im0` full page  |
//!
//! The file is written front to back into a [`ByteAccumulator`]; each
//! object's offset is taken from the accumulator immediately before its
//! `N 0 obj` token, so the cross-reference table cannot drift.

/// Number of xref entries, including the free-list head for object 0.
pub const OBJECT_COUNT: usize = 6;

const HEADER: &str = "%PDF-1.4\n";
const FREE_HEAD: &str = "0000000000 65535 f \n";

/// Append-only byte buffer that knows its own length.
#[derive(Debug, Default)]
pub struct ByteAccumulator {
    buf: Vec<u8>,
}

impl ByteAccumulator {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Absolute offset the next write will land at.
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn push_str(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Offsets of the in-use objects, in object-number order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PdfObjectTable {
    offsets: Vec<(u32, usize)>,
}

impl PdfObjectTable {
    /// Record where object `number` starts. Objects must arrive in order.
    pub fn record(&mut self, number: u32, offset: usize) {
        debug_assert_eq!(number as usize, self.offsets.len() + 1);
        self.offsets.push((number, offset));
    }

    pub fn offset(&self, number: u32) -> Option<usize> {
        self.offsets
            .iter()
            .find(|(n, _)| *n == number)
            .map(|(_, offset)| *offset)
    }

    /// Entry count as declared in the xref subsection, free head included.
    pub fn len(&self) -> usize {
        self.offsets.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    fn write_xref(&self, out: &mut ByteAccumulator) {
        out.push_str(&format!("xref\n0 {}\n", self.len()));
        out.push_str(FREE_HEAD);
        for (_, offset) in &self.offsets {
            out.push_str(&format!("{:010} 00000 n \n", offset));
        }
    }
}

fn begin_object(out: &mut ByteAccumulator, table: &mut PdfObjectTable, number: u32) {
    table.record(number, out.position());
    out.push_str(&format!("{} 0 obj\n", number));
}

/// Build a one-page PDF showing `jpeg` at `width` x `height` points.
///
/// The JPEG bytes are embedded verbatim; they are not decoded or checked.
pub fn build_pdf(jpeg: &[u8], width: u32, height: u32) -> Vec<u8> {
    build_pdf_with_table(jpeg, width, height).0
}

/// Like [`build_pdf`], also returning the recorded object offsets.
pub fn build_pdf_with_table(jpeg: &[u8], width: u32, height: u32) -> (Vec<u8>, PdfObjectTable) {
    let mut out = ByteAccumulator::with_capacity(jpeg.len() + 1024);
    let mut table = PdfObjectTable::default();

    out.push_str(HEADER);

    begin_object(&mut out, &mut table, 1);
    out.push_str("<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    begin_object(&mut out, &mut table, 2);
    out.push_str("<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n");

    begin_object(&mut out, &mut table, 3);
    out.push_str(&format!(
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {w} {h}] \
         /Resources << /XObject << /Im0 4 0 R >> >> /Contents 5 0 R >>\nendobj\n",
        w = width,
        h = height
    ));

    begin_object(&mut out, &mut table, 4);
    out.push_str(&format!(
        "<< /Type /XObject /Subtype /Image /Width {w} /Height {h} /ColorSpace /DeviceRGB \
         /BitsPerComponent 8 /Filter /DCTDecode /Length {len} >>\nstream\n",
        w = width,
        h = height,
        len = jpeg.len()
    ));
    out.push_bytes(jpeg);
    out.push_str("\nendstream\nendobj\n");

    let content = format!("q {} 0 0 {} 0 0 cm /Im0 Do Q", width, height);
    begin_object(&mut out, &mut table, 5);
    out.push_str(&format!("<< /Length {} >>\nstream\n", content.len()));
    out.push_str(&content);
    out.push_str("\nendstream\nendobj\n");

    let xref_offset = out.position();
    table.write_xref(&mut out);
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF",
        OBJECT_COUNT, xref_offset
    ));

    debug_assert_eq!(table.len(), OBJECT_COUNT);
    (out.into_bytes(), table)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: for any payload and page size, every xref offset lands on
        /// its object header and the stream length is recorded exactly.
        #[test]
        fn prop_offsets_exact(
            jpeg in prop::collection::vec(any::<u8>(), 0..2048),
            width in 1u32..=10_000,
            height in 1u32..=10_000,
        ) {
            let (pdf, table) = build_pdf_with_table(&jpeg, width, height);
            for n in 1..=5u32 {
                let offset = table.offset(n).unwrap();
                let token = format!("{} 0 obj", n);
                prop_assert!(pdf[offset..].starts_with(token.as_bytes()));
            }
            let length = format!("/Length {} >>", jpeg.len());
            prop_assert!(pdf.windows(length.len()).any(|w| w == length.as_bytes()));
        }
    }
}
