//! Document access used by the extractor.
//!
//! The extractor never touches a PDF library directly. It sees a
//! [`SheetDocument`] produced by a [`DocumentLoader`], which keeps page
//! scanning testable without a native renderer and lets another backend be
//! swapped in. The Pdfium backend lives in [`crate::pdfium`].

use std::io::{Read, Seek, SeekFrom};

use image::GrayImage;

use crate::error::Result;

/// An opened exam document.
pub trait SheetDocument {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Plain text of a page (zero-based index).
    fn page_text(&self, page: usize) -> Result<String>;

    /// Render a page to 8-bit grayscale at `scale` times its natural size.
    ///
    /// The bitmap is owned by the caller; the backend must not keep render
    /// buffers alive after returning.
    fn render_page(&self, page: usize, scale: f32) -> Result<GrayImage>;
}

/// Opens documents from raw bytes.
///
/// The opened document may borrow the bytes but never outlives them, so the
/// caller keeps ownership of the original buffer.
pub trait DocumentLoader: Sync {
    /// Document type produced by this loader.
    type Document<'a>: SheetDocument
    where
        Self: 'a;

    /// Open a document. Fails with [`crate::Error::MalformedDocument`] when the
    /// bytes are not a readable document.
    fn load<'a>(&'a self, bytes: &'a [u8]) -> Result<Self::Document<'a>>;
}

/// Read a whole stream from its start, then rewind it so the caller can reuse it.
pub fn read_and_rewind<R: Read + Seek>(reader: &mut R) -> Result<Vec<u8>> {
    reader.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    reader.seek(SeekFrom::Start(0))?;
    Ok(bytes)
}
