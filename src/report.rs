//! Data handed to report renderers.
//!
//! Layout (tables, charts, paginated output) is the renderer's job. This module
//! only assembles the figures it needs and serializes them to JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::grading::{BatchSummary, GradedSheet};

/// Course metadata printed on a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseInfo {
    /// Course name
    pub name: String,
    /// Course code
    pub code: String,
    /// Minimum passing score
    pub pass_threshold: f64,
    /// Number of questions in the answer key
    pub total_questions: usize,
}

/// Everything a renderer needs for one graded batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingReport {
    /// Course metadata
    pub course: CourseInfo,
    /// Generation time (RFC 3339)
    pub generated_at: String,
    /// Per-document grades, in submission order
    pub sheets: Vec<GradedSheet>,
    /// Aggregate statistics
    pub summary: BatchSummary,
}

impl GradingReport {
    /// Build a report stamped with the current time.
    pub fn new(course: CourseInfo, sheets: Vec<GradedSheet>) -> Self {
        let summary = BatchSummary::from_results(sheets.iter().map(|s| &s.result));
        Self {
            course,
            generated_at: chrono::Local::now().to_rfc3339(),
            sheets,
            summary,
        }
    }

    /// Sheets ordered by score, highest first. Ties keep submission order.
    pub fn ranked(&self) -> Vec<&GradedSheet> {
        let mut ranked: Vec<&GradedSheet> = self.sheets.iter().collect();
        ranked.sort_by(|a, b| b.result.score.total_cmp(&a.result.score));
        ranked
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty-printed JSON to a file.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        Ok(())
    }
}
