//! Concurrent grading of a batch of exam documents.
//!
//! Each document is extracted on tokio's blocking pool. A semaphore caps how
//! many extractions run at once, so at most `concurrency` pages are being
//! rasterized at any time. Pages of a single document are still scanned
//! sequentially by the extractor.

use std::sync::Arc;

use tokio::sync::Semaphore;
pub use tokio_util::sync::CancellationToken;

use crate::answers::{AnswerKey, DetectedAnswers};
use crate::config::GraderConfig;
use crate::document::DocumentLoader;
use crate::error::{Error, Result};
use crate::extractor::AnswerSheetExtractor;
use crate::grading::{grade, BatchSummary, GradedSheet};

/// One submitted exam.
#[derive(Debug, Clone)]
pub struct ExamDocument {
    /// Identifier shown in results (usually the file name)
    pub id: String,
    /// Raw document bytes
    pub bytes: Vec<u8>,
}

impl ExamDocument {
    /// Create a document entry.
    pub fn new(id: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            bytes,
        }
    }
}

/// Result of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// Graded documents, in submission order
    pub sheets: Vec<GradedSheet>,
    /// Documents not graded: never started after cancellation, then those over the batch limit
    pub skipped: Vec<String>,
}

impl BatchOutcome {
    /// Summary statistics over the graded documents.
    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_results(self.sheets.iter().map(|s| &s.result))
    }
}

/// Grades batches of documents against one answer key.
pub struct BatchGrader<L> {
    extractor: Arc<AnswerSheetExtractor<L>>,
    config: GraderConfig,
}

impl<L: DocumentLoader + Send + 'static> BatchGrader<L> {
    /// Create a grader. The configuration is validated here.
    pub fn new(loader: L, config: GraderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            extractor: Arc::new(AnswerSheetExtractor::with_config(
                loader,
                config.image.clone(),
            )),
            config,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &GraderConfig {
        &self.config
    }

    /// The underlying extractor.
    pub fn extractor(&self) -> &AnswerSheetExtractor<L> {
        &self.extractor
    }

    /// Extract and grade one document on the calling thread.
    pub fn grade_document(&self, key: &AnswerKey, document: &ExamDocument) -> GradedSheet {
        let detected = self.extractor.extract(&document.bytes);
        self.record(&document.id, key, detected)
    }

    fn record(&self, id: &str, key: &AnswerKey, detected: DetectedAnswers) -> GradedSheet {
        let result = grade(id, key, &detected, &self.config.grading);
        log::info!(
            "{}: {}/{} correct, score {} ({})",
            result.document_id,
            result.correct_count,
            result.total_questions,
            result.score,
            if result.passed { "pass" } else { "fail" }
        );
        GradedSheet { result, detected }
    }

    /// Grade a batch.
    ///
    /// Documents past `max_documents` are skipped with a warning. Once `cancel`
    /// fires, documents still waiting for a slot are skipped; extractions
    /// already running finish. A document whose extraction panics is graded
    /// as a blank sheet.
    ///
    /// Returns [`Error::EmptyBatch`] when `documents` is empty; every other
    /// failure is absorbed per document.
    pub async fn grade_batch(
        &self,
        key: &AnswerKey,
        mut documents: Vec<ExamDocument>,
        cancel: &CancellationToken,
    ) -> Result<BatchOutcome> {
        if documents.is_empty() {
            return Err(Error::EmptyBatch);
        }

        let limit = self.config.batch.max_documents;
        let over_limit = if documents.len() > limit {
            log::warn!(
                "{} documents submitted, only the first {} will be graded",
                documents.len(),
                limit
            );
            documents.split_off(limit)
        } else {
            Vec::new()
        };

        let semaphore = Arc::new(Semaphore::new(self.config.batch.concurrency));
        let ids: Vec<String> = documents.iter().map(|d| d.id.clone()).collect();

        let mut tasks = Vec::with_capacity(documents.len());
        for document in documents {
            let semaphore = Arc::clone(&semaphore);
            let extractor = Arc::clone(&self.extractor);
            let cancel = cancel.clone();

            tasks.push(tokio::spawn(async move {
                // Held until the extraction below has finished.
                let _permit = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return None,
                    permit = semaphore.acquire_owned() => permit.ok()?,
                };
                let extraction =
                    tokio::task::spawn_blocking(move || extractor.extract(&document.bytes));
                Some(extraction.await)
            }));
        }

        let results = futures::future::join_all(tasks).await;

        let mut sheets = Vec::with_capacity(results.len());
        let mut skipped = Vec::new();
        for (id, result) in ids.into_iter().zip(results) {
            match result {
                Ok(Some(Ok(detected))) => sheets.push(self.record(&id, key, detected)),
                Ok(Some(Err(e))) | Err(e) => {
                    log::error!("Extraction failed for {} ({}), treating as unreadable", id, e);
                    sheets.push(self.record(&id, key, DetectedAnswers::new()));
                },
                Ok(None) => skipped.push(id),
            }
        }

        if !skipped.is_empty() {
            log::warn!("Batch cancelled, {} document(s) not started", skipped.len());
        }
        skipped.extend(over_limit.into_iter().map(|d| d.id));

        Ok(BatchOutcome { sheets, skipped })
    }
}
