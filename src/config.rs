//! Configuration types for payslip extraction and charting.
//!
//! Extraction behaviour is controlled through [`ExtractionConfig`], chart
//! rendering through [`ChartConfig`]; both are built via their builders.
//! Keeping every knob in one struct makes it trivial to serialise a run's
//! configuration for logging and to diff two runs to understand why their
//! outputs differ.
//!
//! # Design choice: builder over constructor
//! Positional constructors break on every new field. The builder pattern lets
//! callers set only what they care about and rely on documented defaults for
//! the rest.

use crate::error::PayslipError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default substring a payslip file name must contain.
pub const DEFAULT_PATTERN: &str = "VypListek";

/// Default on-disk cache file.
pub const DEFAULT_CACHE: &str = "payslip-cache.json";

/// Default chart output file.
pub const DEFAULT_CHART: &str = "payslip-chart.html";

/// Configuration for scanning and extracting a directory of payslips.
///
/// # Example
/// ```rust
/// use payslip2chart::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .dir("./slips")
///     .pattern("VypListek")
///     .write_text(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Directory scanned (non-recursively) for payslip PDFs. Default: `.`.
    pub dir: PathBuf,

    /// Substring a file name must contain to count as a payslip.
    /// Default: `"VypListek"`.
    ///
    /// The payroll system names every slip `VypListek<suffix>.pdf`; anything
    /// else in the directory (contracts, scans) is ignored by this filter
    /// before a single byte is read.
    pub pattern: String,

    /// Path of the JSON line cache. Default: `payslip-cache.json`.
    pub cache_path: PathBuf,

    /// Also write a `<stem>_res.txt` dump of the normalized lines next to
    /// each source PDF. Default: false.
    ///
    /// The dumps exist for eyeballing what the normalizer produced when a
    /// series comes out wrong; nothing reads them back.
    pub write_text: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            pattern: DEFAULT_PATTERN.to_string(),
            cache_path: PathBuf::from(DEFAULT_CACHE),
            write_text: false,
        }
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.dir = dir.into();
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.pattern = pattern.into();
        self
    }

    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.cache_path = path.into();
        self
    }

    pub fn write_text(mut self, v: bool) -> Self {
        self.config.write_text = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, PayslipError> {
        let c = &self.config;
        if c.pattern.trim().is_empty() {
            return Err(PayslipError::InvalidConfig(
                "File pattern must not be empty (it would match every PDF)".into(),
            ));
        }
        if c.cache_path.as_os_str().is_empty() {
            return Err(PayslipError::InvalidConfig(
                "Cache path must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Configuration for the rendered chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Output HTML file. Default: `payslip-chart.html`.
    pub output: PathBuf,

    /// Chart title. Default: "Salary components over time".
    pub title: String,

    /// Canvas width in pixels. Clamped to 320–4000. Default: 1400.
    pub width: u32,

    /// Canvas height in pixels. Clamped to 240–3000. Default: 800.
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_CHART),
            title: "Salary components over time".to_string(),
            width: 1400,
            height: 800,
        }
    }
}

impl ChartConfig {
    /// Create a new builder for `ChartConfig`.
    pub fn builder() -> ChartConfigBuilder {
        ChartConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ChartConfig`].
#[derive(Debug)]
pub struct ChartConfigBuilder {
    config: ChartConfig,
}

impl ChartConfigBuilder {
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output = path.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn width(mut self, px: u32) -> Self {
        self.config.width = px.clamp(320, 4000);
        self
    }

    pub fn height(mut self, px: u32) -> Self {
        self.config.height = px.clamp(240, 3000);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ChartConfig, PayslipError> {
        if self.config.output.as_os_str().is_empty() {
            return Err(PayslipError::InvalidConfig(
                "Chart output path must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_defaults() {
        let c = ExtractionConfig::default();
        assert_eq!(c.pattern, "VypListek");
        assert_eq!(c.cache_path, PathBuf::from("payslip-cache.json"));
        assert!(!c.write_text);
    }

    #[test]
    fn empty_pattern_rejected() {
        let err = ExtractionConfig::builder().pattern("  ").build();
        assert!(matches!(err, Err(PayslipError::InvalidConfig(_))));
    }

    #[test]
    fn chart_dimensions_clamped() {
        let c = ChartConfig::builder().width(10).height(99_999).build().unwrap();
        assert_eq!(c.width, 320);
        assert_eq!(c.height, 3000);
    }

    #[test]
    fn builder_sets_all_fields() {
        let c = ExtractionConfig::builder()
            .dir("/data/slips")
            .pattern("Payslip")
            .cache_path("/tmp/c.json")
            .write_text(true)
            .build()
            .unwrap();
        assert_eq!(c.dir, PathBuf::from("/data/slips"));
        assert_eq!(c.pattern, "Payslip");
        assert!(c.write_text);
    }
}
