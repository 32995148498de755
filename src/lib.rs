// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # Answer Sheet
//!
//! Recover marked answers from exam PDFs and grade them against an answer key.
//!
//! ## Core Features
//!
//! - **Text-first extraction**: question headers (`12.` / `12)`) followed by a
//!   line with an option label and the mark glyph `X` (`C) ... X`), including
//!   true/false (`V` / `F`) questions
//! - **Pixel-density fallback**: pages without a usable text layer are
//!   rendered and scanned band by band for dark option slots
//! - **Best-effort by construction**: unreadable documents and failed pages
//!   degrade to "no answers detected" instead of aborting a batch
//! - **Grading**: 0-20 scores, configurable pass mark, batch statistics and a
//!   JSON report for downstream renderers
//! - **Bounded concurrency**: batches run on tokio with a semaphore capping
//!   in-flight extractions, and cancellation of not-yet-started documents
//!
//! ## Quick Start
//!
//! ```ignore
//! use answer_sheet::{parse_answer_key, AnswerSheetExtractor, GradingConfig, PdfiumLoader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let key = parse_answer_key("1:a, 2:d, 3:e, 4:v, 5:f");
//! let extractor = AnswerSheetExtractor::new(PdfiumLoader::system()?);
//!
//! let bytes = std::fs::read("alumno.pdf")?;
//! let detected = extractor.extract(&bytes);
//! let result = answer_sheet::grade("alumno.pdf", &key, &detected, &GradingConfig::default());
//! println!("{}: {} ({})", result.document_id, result.score, result.passed);
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 (<http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license (<http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Answer data model
pub mod answers;
pub mod key;

// Configuration
pub mod config;

// Page scanners
pub mod scanner;

// Document access and extraction
pub mod document;
pub mod extractor;

// Pdfium backend (optional)
#[cfg(feature = "pdfium")]
#[cfg_attr(docsrs, doc(cfg(feature = "pdfium")))]
pub mod pdfium;

// Grading and batch processing
pub mod batch;
pub mod grading;
pub mod report;

// Re-exports
pub use answers::{AnswerKey, DetectedAnswers, QuestionNumber, Symbol};
pub use batch::{BatchGrader, BatchOutcome, CancellationToken, ExamDocument};
pub use config::{BatchConfig, GraderConfig, GradingConfig, ImageScanConfig};
pub use document::{DocumentLoader, SheetDocument};
pub use error::{Error, Result};
pub use extractor::{AnswerSheetExtractor, PageScan, ScanMethod, SheetExtraction};
pub use grading::{grade, BatchSummary, GradedSheet, GradingResult};
pub use key::parse_answer_key;
#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumLoader;
pub use report::{CourseInfo, GradingReport};
