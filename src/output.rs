//! Result types returned by the extraction entry points.

use crate::error::SlipError;
use crate::pipeline::series::Period;
use serde::{Deserialize, Serialize};

/// Outcome for a single payslip PDF.
///
/// `error = None` means the slip was extracted, normalized, and cached.
/// On failure the other fields describe as much as was recovered before the
/// slip was abandoned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlipResult {
    /// File stem of the source PDF (e.g. `VypListek_2019_03`).
    pub stem: String,

    /// Pay period parsed from the slip header, when one was found.
    pub period: Option<Period>,

    /// Number of normalized lines produced for this slip.
    pub line_count: usize,

    /// Set when the slip failed; the slip is then absent from the cache.
    pub error: Option<SlipError>,
}

/// Aggregate statistics for one extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// PDFs that matched the payslip pattern.
    pub total_files: usize,
    /// Slips extracted and cached successfully.
    pub processed: usize,
    /// Slips that failed (see the per-slip [`SlipError`]s).
    pub failed: usize,
    /// Wall-clock time for the whole run, milliseconds.
    pub total_duration_ms: u64,
    /// Time spent inside the PDF text extractor, milliseconds.
    pub extract_duration_ms: u64,
}

/// Everything a caller gets back from [`crate::convert::convert_dir`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// Per-slip outcomes, in file-name order.
    pub slips: Vec<SlipResult>,
    /// Run-level statistics.
    pub stats: ExtractionStats,
}

impl ExtractionOutput {
    /// First per-slip error, if any slip failed.
    pub fn first_error(&self) -> Option<&SlipError> {
        self.slips.iter().find_map(|s| s.error.as_ref())
    }
}

/// One row of `inspect` output: a discovered payslip and its probed period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlipSummary {
    pub stem: String,
    pub period: Option<Period>,
    pub line_count: usize,
}
