//! Answer-sheet extractor: runs the scanners over a document's pages.
//!
//! Pages are processed strictly in order. The text scanner runs on every page;
//! the density scanner runs on a page only while the document as a whole has
//! produced no answers yet. Detections from later pages never overwrite a
//! question already answered on an earlier page.
//!
//! Failures degrade instead of propagating: an unreadable document yields no
//! answers, and a page whose text or bitmap cannot be produced contributes
//! nothing while the remaining pages are still scanned.

use std::io::{Read, Seek};

use serde::Serialize;

use crate::answers::DetectedAnswers;
use crate::config::ImageScanConfig;
use crate::document::{read_and_rewind, DocumentLoader, SheetDocument};
use crate::error::Result;
use crate::scanner::{scan_image, scan_text};

/// Which scanners ran on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMethod {
    /// Text layer only
    Text,
    /// Text layer, then the density fallback
    TextAndImage,
}

/// What happened on one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageScan {
    /// Zero-based page index
    pub page: usize,
    /// Scanners that ran
    pub method: ScanMethod,
    /// Questions this page added to the document's answers
    pub detected: usize,
    /// Text or rasterization failure on this page, if any
    pub error: Option<String>,
}

/// Answers recovered from a document plus per-page diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SheetExtraction {
    /// Merged answers across all pages
    pub answers: DetectedAnswers,
    /// One entry per page, in page order
    pub pages: Vec<PageScan>,
}

impl SheetExtraction {
    /// Whether the density fallback ran on any page.
    pub fn used_image_fallback(&self) -> bool {
        self.pages
            .iter()
            .any(|p| p.method == ScanMethod::TextAndImage)
    }
}

/// Extracts marked answers from exam documents.
pub struct AnswerSheetExtractor<L> {
    loader: L,
    config: ImageScanConfig,
}

impl<L: DocumentLoader> AnswerSheetExtractor<L> {
    /// Create an extractor with default image scan parameters.
    pub fn new(loader: L) -> Self {
        Self::with_config(loader, ImageScanConfig::default())
    }

    /// Create an extractor with explicit image scan parameters.
    pub fn with_config(loader: L, config: ImageScanConfig) -> Self {
        Self { loader, config }
    }

    /// The document loader.
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Image scan parameters in use.
    pub fn config(&self) -> &ImageScanConfig {
        &self.config
    }

    /// Extract answers, degrading any failure to an empty mapping.
    pub fn extract(&self, bytes: &[u8]) -> DetectedAnswers {
        match self.try_extract(bytes) {
            Ok(extraction) => extraction.answers,
            Err(e) => {
                log::warn!("Error processing document: {}", e);
                DetectedAnswers::new()
            },
        }
    }

    /// Extract answers from a seekable stream and rewind it afterwards.
    pub fn extract_reader<R: Read + Seek>(&self, reader: &mut R) -> DetectedAnswers {
        match read_and_rewind(reader) {
            Ok(bytes) => self.extract(&bytes),
            Err(e) => {
                log::warn!("Error reading document stream: {}", e);
                DetectedAnswers::new()
            },
        }
    }

    /// Extract answers with per-page diagnostics.
    ///
    /// Only a document that cannot be opened is an error; page-level
    /// failures are recorded in [`PageScan::error`].
    pub fn try_extract(&self, bytes: &[u8]) -> Result<SheetExtraction> {
        let document = self.loader.load(bytes)?;
        Ok(self.scan_document(&document))
    }

    /// Scan an already opened document.
    pub fn scan_document<D: SheetDocument + ?Sized>(&self, document: &D) -> SheetExtraction {
        let page_count = document.page_count();
        let mut answers = DetectedAnswers::new();
        let mut pages = Vec::with_capacity(page_count);

        for page in 0..page_count {
            let mut scan = PageScan {
                page,
                method: ScanMethod::Text,
                detected: 0,
                error: None,
            };

            match document.page_text(page) {
                Ok(text) => scan.detected += answers.merge_missing(scan_text(&text)),
                Err(e) => {
                    log::warn!("{}", e);
                    scan.error = Some(e.to_string());
                },
            }

            if answers.is_empty() {
                scan.method = ScanMethod::TextAndImage;
                match self.scan_page_image(document, page) {
                    Ok(found) => scan.detected += answers.merge_missing(found),
                    Err(e) => {
                        log::warn!("Error in image extraction: {}", e);
                        scan.error = Some(e.to_string());
                    },
                }
            }

            log::debug!(
                "Page {}: {:?} added {} answer(s)",
                page,
                scan.method,
                scan.detected
            );
            pages.push(scan);
        }

        SheetExtraction { answers, pages }
    }

    /// Render one page and run the density scanner. The bitmap is dropped on return.
    fn scan_page_image<D: SheetDocument + ?Sized>(
        &self,
        document: &D,
        page: usize,
    ) -> Result<DetectedAnswers> {
        let bitmap = document.render_page(page, self.config.render_scale)?;
        Ok(scan_image(&bitmap, &self.config))
    }
}
