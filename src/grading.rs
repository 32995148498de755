//! Grading against an answer key, and batch summary statistics.

use serde::{Deserialize, Serialize};

use crate::answers::{AnswerKey, DetectedAnswers};
use crate::config::GradingConfig;

/// Round to two decimals.
///
/// Rounds the exact binary value, so an exact half (`0.625`) goes to the even
/// digit (`0.62`) while `13.3333` still becomes `13.33`.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Grade of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    /// Caller-supplied identifier (usually the file name)
    pub document_id: String,
    /// Key questions answered with the expected symbol
    pub correct_count: usize,
    /// Number of questions in the key
    pub total_questions: usize,
    /// Score on the configured scale, rounded to two decimals
    pub score: f64,
    /// Whether `score` reached the pass threshold
    pub passed: bool,
}

/// Compare detected answers with the key.
///
/// Only questions in the key count; a question missing from `detected` is
/// incorrect. An empty key scores 0.
pub fn grade(
    document_id: &str,
    key: &AnswerKey,
    detected: &DetectedAnswers,
    config: &GradingConfig,
) -> GradingResult {
    let total_questions = key.len();
    let correct_count = key
        .iter()
        .filter(|&(question, expected)| detected.get(question) == Some(expected))
        .count();

    let score = if total_questions == 0 {
        0.0
    } else {
        round2(correct_count as f64 / total_questions as f64 * config.max_score)
    };
    let passed = score >= config.pass_threshold;

    GradingResult {
        document_id: document_id.to_string(),
        correct_count,
        total_questions,
        score,
        passed,
    }
}

/// A graded document together with the answers it was graded on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedSheet {
    /// Grade record
    #[serde(flatten)]
    pub result: GradingResult,
    /// Answers recovered from the document
    pub detected: DetectedAnswers,
}

/// Aggregate statistics over a set of grades.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of graded documents
    pub documents: usize,
    /// Mean score
    pub mean_score: f64,
    /// Highest score
    pub highest_score: f64,
    /// Lowest score
    pub lowest_score: f64,
    /// Documents that passed
    pub passed: usize,
    /// Percentage of documents that passed (0-100)
    pub pass_rate: f64,
    /// Mean score among passing documents (0 when none passed)
    pub mean_passing_score: f64,
}

impl BatchSummary {
    /// Summarize a list of grades. All values are rounded to two decimals.
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a GradingResult>,
    {
        let scores: Vec<(f64, bool)> = results.into_iter().map(|r| (r.score, r.passed)).collect();
        if scores.is_empty() {
            return Self::default();
        }

        let documents = scores.len();
        let total: f64 = scores.iter().map(|(s, _)| s).sum();
        let highest = scores.iter().map(|(s, _)| *s).fold(f64::MIN, f64::max);
        let lowest = scores.iter().map(|(s, _)| *s).fold(f64::MAX, f64::min);
        let passing: Vec<f64> = scores.iter().filter(|(_, p)| *p).map(|(s, _)| *s).collect();

        let mean_passing_score = if passing.is_empty() {
            0.0
        } else {
            round2(passing.iter().sum::<f64>() / passing.len() as f64)
        };

        Self {
            documents,
            mean_score: round2(total / documents as f64),
            highest_score: round2(highest),
            lowest_score: round2(lowest),
            passed: passing.len(),
            pass_rate: round2(passing.len() as f64 / documents as f64 * 100.0),
            mean_passing_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::Symbol;

    fn result(score: f64, passed: bool) -> GradingResult {
        GradingResult {
            document_id: format!("{score}"),
            correct_count: 0,
            total_questions: 10,
            score,
            passed,
        }
    }

    #[test]
    fn test_grade_scenario() {
        let key: AnswerKey = [(1, Symbol::A), (2, Symbol::B), (3, Symbol::V)].into_iter().collect();
        let detected: DetectedAnswers =
            [(1, Symbol::A), (2, Symbol::C), (3, Symbol::V)].into_iter().collect();

        let result = grade("alumno.pdf", &key, &detected, &GradingConfig::default());

        assert_eq!(result.document_id, "alumno.pdf");
        assert_eq!(result.correct_count, 2);
        assert_eq!(result.total_questions, 3);
        assert_eq!(result.score, 13.33);
        assert!(!result.passed);
    }

    #[test]
    fn test_empty_key_scores_zero() {
        let detected: DetectedAnswers = [(1, Symbol::A)].into_iter().collect();
        let result = grade("x", &AnswerKey::new(), &detected, &GradingConfig::default());
        assert_eq!(result.score, 0.0);
        assert_eq!(result.total_questions, 0);
        assert!(!result.passed);
    }

    #[test]
    fn test_absent_answers_are_incorrect() {
        let key: AnswerKey = [(1, Symbol::A), (2, Symbol::B)].into_iter().collect();
        let result = grade("x", &key, &DetectedAnswers::new(), &GradingConfig::default());
        assert_eq!(result.correct_count, 0);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_extra_detections_are_ignored() {
        let key: AnswerKey = [(1, Symbol::A)].into_iter().collect();
        let detected: DetectedAnswers = [(1, Symbol::A), (2, Symbol::B)].into_iter().collect();
        let result = grade("x", &key, &detected, &GradingConfig::default());
        assert_eq!(result.correct_count, 1);
        assert_eq!(result.score, 20.0);
        assert!(result.passed);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let key: AnswerKey = (1..=10).map(|q| (q, Symbol::A)).collect();
        let detected: DetectedAnswers = (1..=7).map(|q| (q, Symbol::A)).collect();
        let result = grade("x", &key, &detected, &GradingConfig::default());
        assert_eq!(result.score, 14.0);
        assert!(result.passed);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(13.333333), 13.33);
        assert_eq!(round2(6.666666), 6.67);
        assert_eq!(round2(20.0), 20.0);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_round2_exact_halves_go_to_even() {
        assert_eq!(round2(0.625), 0.62);
        assert_eq!(round2(3.125), 3.12);
        assert_eq!(round2(1.875), 1.88);
        assert_eq!(round2(0.375), 0.38);
    }

    #[test]
    fn test_thirty_two_question_key() {
        let key: AnswerKey = (1..=32).map(|q| (q, Symbol::A)).collect();
        let config = GradingConfig::default();

        let one: DetectedAnswers = [(1, Symbol::A)].into_iter().collect();
        assert_eq!(grade("x", &key, &one, &config).score, 0.62);

        let five: DetectedAnswers = (1..=5).map(|q| (q, Symbol::A)).collect();
        assert_eq!(grade("x", &key, &five, &config).score, 3.12);

        let three: DetectedAnswers = (1..=3).map(|q| (q, Symbol::A)).collect();
        assert_eq!(grade("x", &key, &three, &config).score, 1.88);
    }

    #[test]
    fn test_summary() {
        let results = vec![result(18.0, true), result(10.0, false), result(14.5, true)];

        let summary = BatchSummary::from_results(&results);

        assert_eq!(summary.documents, 3);
        assert_eq!(summary.mean_score, 14.17);
        assert_eq!(summary.highest_score, 18.0);
        assert_eq!(summary.lowest_score, 10.0);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.pass_rate, 66.67);
        assert_eq!(summary.mean_passing_score, 16.25);
    }

    #[test]
    fn test_summary_without_passes() {
        let results = vec![result(4.0, false)];
        let summary = BatchSummary::from_results(&results);
        assert_eq!(summary.passed, 0);
        assert_eq!(summary.pass_rate, 0.0);
        assert_eq!(summary.mean_passing_score, 0.0);
    }

    #[test]
    fn test_empty_summary() {
        let summary = BatchSummary::from_results(&Vec::new());
        assert_eq!(summary, BatchSummary::default());
    }
}
