//! Pdfium document backend.
//!
//! Binds the Pdfium shared library through `pdfium-render`. Page text comes
//! from Pdfium's text layer; pages are rendered to RGBA and reduced to
//! grayscale before the bitmap handle is released.

use image::GrayImage;
use pdfium_render::prelude::*;

use crate::document::{DocumentLoader, SheetDocument};
use crate::error::{Error, Result};
use crate::scanner::rgba_to_gray;

/// Loads PDFs with Pdfium.
pub struct PdfiumLoader {
    pdfium: Pdfium,
}

impl PdfiumLoader {
    /// Bind to the Pdfium library installed on the system search path.
    pub fn system() -> Result<Self> {
        let bindings = Pdfium::bind_to_system_library()
            .map_err(|e| Error::BackendUnavailable(format!("{:?}", e)))?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Bind to the Pdfium library found in `dir`.
    pub fn from_directory(dir: &str) -> Result<Self> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            .map_err(|e| Error::BackendUnavailable(format!("{} ({:?})", dir, e)))?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Bind to `dir` when given, otherwise to the system library.
    pub fn bind(dir: Option<&str>) -> Result<Self> {
        match dir {
            Some(dir) => Self::from_directory(dir),
            None => Self::system(),
        }
    }
}

impl DocumentLoader for PdfiumLoader {
    type Document<'a> = PdfiumSheet<'a>;

    fn load<'a>(&'a self, bytes: &'a [u8]) -> Result<PdfiumSheet<'a>> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| Error::MalformedDocument(format!("{:?}", e)))?;
        Ok(PdfiumSheet { document })
    }
}

/// A PDF opened by [`PdfiumLoader`].
pub struct PdfiumSheet<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumSheet<'a> {
    fn page(&self, page: usize) -> std::result::Result<PdfPage<'a>, String> {
        let index = PdfPageIndex::try_from(page)
            .map_err(|_| format!("page index {} out of range", page))?;
        self.document.pages().get(index).map_err(|e| format!("{:?}", e))
    }
}

impl SheetDocument for PdfiumSheet<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_text(&self, page: usize) -> Result<String> {
        let pdf_page = self
            .page(page)
            .map_err(|reason| Error::PageText { page, reason })?;
        let text = pdf_page.text().map_err(|e| Error::PageText {
            page,
            reason: format!("{:?}", e),
        })?;
        Ok(text.all())
    }

    fn render_page(&self, page: usize, scale: f32) -> Result<GrayImage> {
        let pdf_page = self
            .page(page)
            .map_err(|reason| Error::Rasterization { page, reason })?;
        let config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = pdf_page
            .render_with_config(&config)
            .map_err(|e| Error::Rasterization {
                page,
                reason: format!("{:?}", e),
            })?;

        let width = bitmap.width() as u32;
        let height = bitmap.height() as u32;
        let rgba = bitmap.as_rgba_bytes();
        rgba_to_gray(width, height, &rgba).ok_or_else(|| Error::Rasterization {
            page,
            reason: format!("bitmap buffer does not match {}x{}", width, height),
        })
    }
}
