//! Configuration for extraction, grading and batch processing.
//!
//! Every struct has defaults matching the stock answer-sheet layout and can be
//! overridden field-by-field from JSON:
//!
//! ```ignore
//! use answer_sheet::config::GraderConfig;
//!
//! let config = GraderConfig::from_json_str(r#"{ "grading": { "pass_threshold": 11.0 } }"#)?;
//! assert_eq!(config.image.dark_threshold, 100);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parameters of the pixel-density fallback scanner.
///
/// The defaults were tuned by hand against a single sheet layout. Treat them as
/// calibration values: re-tune against real scans before trusting the image path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageScanConfig {
    /// Scale factor applied when rendering a page (2.0 = twice the PDF point size)
    pub render_scale: f32,
    /// Gray level below which a pixel counts as ink
    pub dark_threshold: u8,
    /// Number of equal horizontal bands the page height is divided into
    pub band_divisions: u32,
    /// Bands inspected from the top of the page (one per question)
    pub max_bands: u32,
    /// A band needs more than this many dark pixels to hold a mark
    pub band_min_dark: u32,
    /// An option slot needs more than this many dark pixels to be selected
    pub slot_min_dark: u32,
    /// Number of option slots per band (a..e)
    pub option_slots: u32,
}

impl Default for ImageScanConfig {
    fn default() -> Self {
        Self {
            render_scale: 2.0,
            dark_threshold: 100,
            band_divisions: 20,
            max_bands: 15,
            band_min_dark: 50,
            slot_min_dark: 30,
            option_slots: 5,
        }
    }
}

impl ImageScanConfig {
    /// Set the render scale.
    pub fn with_render_scale(mut self, scale: f32) -> Self {
        self.render_scale = scale;
        self
    }

    /// Set the ink threshold.
    pub fn with_dark_threshold(mut self, threshold: u8) -> Self {
        self.dark_threshold = threshold;
        self
    }

    /// Set the dark-pixel gates for bands and option slots.
    pub fn with_gates(mut self, band_min_dark: u32, slot_min_dark: u32) -> Self {
        self.band_min_dark = band_min_dark;
        self.slot_min_dark = slot_min_dark;
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.render_scale.is_finite() || self.render_scale <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "render_scale must be a positive number, got {}",
                self.render_scale
            )));
        }
        if self.band_divisions == 0 {
            return Err(Error::InvalidConfig("band_divisions must be at least 1".into()));
        }
        if self.max_bands > self.band_divisions {
            return Err(Error::InvalidConfig(format!(
                "max_bands ({}) cannot exceed band_divisions ({})",
                self.max_bands, self.band_divisions
            )));
        }
        if self.option_slots == 0 || self.option_slots > 5 {
            return Err(Error::InvalidConfig(format!(
                "option_slots must be between 1 and 5, got {}",
                self.option_slots
            )));
        }
        Ok(())
    }
}

/// Score scale and pass mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingConfig {
    /// Minimum score that counts as a pass
    pub pass_threshold: f64,
    /// Score awarded for a fully correct sheet
    pub max_score: f64,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            pass_threshold: 14.0,
            max_score: 20.0,
        }
    }
}

impl GradingConfig {
    /// Set the pass threshold.
    pub fn with_pass_threshold(mut self, threshold: f64) -> Self {
        self.pass_threshold = threshold;
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.max_score.is_finite() || self.max_score <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "max_score must be a positive number, got {}",
                self.max_score
            )));
        }
        if !(0.0..=self.max_score).contains(&self.pass_threshold) {
            return Err(Error::InvalidConfig(format!(
                "pass_threshold must be within 0..={}, got {}",
                self.max_score, self.pass_threshold
            )));
        }
        Ok(())
    }
}

/// Limits for batch grading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Documents beyond this count are dropped from a batch
    pub max_documents: usize,
    /// Maximum documents extracted at the same time
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            max_documents: 30,
            concurrency: cores.min(8),
        }
    }
}

impl BatchConfig {
    /// Set the worker limit.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the document limit.
    pub fn with_max_documents(mut self, max_documents: usize) -> Self {
        self.max_documents = max_documents;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(Error::InvalidConfig("concurrency must be at least 1".into()));
        }
        if self.max_documents == 0 {
            return Err(Error::InvalidConfig("max_documents must be at least 1".into()));
        }
        Ok(())
    }
}

/// Complete grader configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraderConfig {
    /// Image fallback scanner parameters
    pub image: ImageScanConfig,
    /// Score scale and pass mark
    pub grading: GradingConfig,
    /// Batch limits
    pub batch: BatchConfig,
}

impl GraderConfig {
    /// Create configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate configuration from a JSON string. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Replace the image scanner parameters.
    pub fn with_image(mut self, image: ImageScanConfig) -> Self {
        self.image = image;
        self
    }

    /// Replace the grading parameters.
    pub fn with_grading(mut self, grading: GradingConfig) -> Self {
        self.grading = grading;
        self
    }

    /// Replace the batch limits.
    pub fn with_batch(mut self, batch: BatchConfig) -> Self {
        self.batch = batch;
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        self.image.validate()?;
        self.grading.validate()?;
        self.batch.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GraderConfig::default();
        assert_eq!(config.image.render_scale, 2.0);
        assert_eq!(config.image.dark_threshold, 100);
        assert_eq!(config.image.band_divisions, 20);
        assert_eq!(config.image.max_bands, 15);
        assert_eq!(config.image.band_min_dark, 50);
        assert_eq!(config.image.slot_min_dark, 30);
        assert_eq!(config.image.option_slots, 5);
        assert_eq!(config.grading.pass_threshold, 14.0);
        assert_eq!(config.grading.max_score, 20.0);
        assert_eq!(config.batch.max_documents, 30);
        assert!(config.batch.concurrency >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            GraderConfig::from_json_str(r#"{ "grading": { "pass_threshold": 11.5 } }"#).unwrap();
        assert_eq!(config.grading.pass_threshold, 11.5);
        assert_eq!(config.grading.max_score, 20.0);
        assert_eq!(config.image, ImageScanConfig::default());
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let result = GraderConfig::from_json_str(r#"{ "batch": { "concurrency": 0 } }"#);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_more_bands_than_divisions() {
        let config = GraderConfig::new().with_image(ImageScanConfig {
            max_bands: 21,
            ..Default::default()
        });
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_threshold_above_scale() {
        let config =
            GraderConfig::new().with_grading(GradingConfig::default().with_pass_threshold(25.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_render_scale() {
        let config =
            GraderConfig::new().with_image(ImageScanConfig::default().with_render_scale(0.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_json_is_json_error() {
        let result = GraderConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grader.json");
        std::fs::write(&path, r#"{ "image": { "dark_threshold": 80 } }"#).unwrap();

        let config = GraderConfig::from_json_file(&path).unwrap();
        assert_eq!(config.image.dark_threshold, 80);
        assert_eq!(config.image.max_bands, 15);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = GraderConfig::from_json_file("/nonexistent/grader.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
