//! Error types for the payslip2chart library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`PayslipError`] — **Fatal**: the run cannot proceed at all (missing
//!   directory, unreadable cache, bad configuration). Returned as
//!   `Err(PayslipError)` from the top-level `convert*`/`plot*` functions.
//!
//! * [`SlipError`] — **Non-fatal**: a single payslip failed (garbled PDF,
//!   empty extraction, no recognisable pay period) but all other slips are
//!   fine. Stored inside [`crate::output::SlipResult`] so callers can inspect
//!   partial success rather than losing the whole run to one bad file.
//!
//! The separation lets callers decide their own tolerance: abort on the first
//! bad slip, log and continue, or collect all errors for a post-run report.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the payslip2chart library.
///
/// Per-slip failures use [`SlipError`] and are stored in
/// [`crate::output::SlipResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum PayslipError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The payslip directory does not exist.
    #[error("Payslip directory not found: '{path}'\nCheck the path exists and is readable.")]
    DirNotFound { path: PathBuf },

    /// A discovered payslip vanished or could not be opened.
    #[error("Payslip file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// No file in the directory matched the payslip pattern.
    #[error("No payslip PDFs matching '{pattern}' found in '{dir}'\nAdjust --pattern or point --dir at the directory holding the payslips.")]
    NoPayslipsFound { dir: PathBuf, pattern: String },

    /// The file matched the pattern but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Cache errors ──────────────────────────────────────────────────────
    /// The cache file does not exist yet.
    #[error("Cache file not found: '{path}'\nRun `payslip2chart convert` first to build it.")]
    CacheMissing { path: PathBuf },

    /// The cache file exists but could not be parsed.
    #[error("Cache file '{path}' is corrupt: {detail}\nDelete it and re-run `payslip2chart convert`.")]
    CacheCorrupt { path: PathBuf, detail: String },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// Every payslip failed; there is nothing to cache or plot.
    #[error("All {total} payslips failed to extract.\nFirst error: {first_error}")]
    AllSlipsFailed { total: usize, first_error: String },

    /// The cache held slips but none carried a parseable "MM YYYY" period.
    #[error("No pay period could be parsed from any cached payslip.\nExpected the second line of each slip to end in 'MM YYYY'.")]
    NoPeriods,

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file (cache, txt dump, chart).
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Chart HTML rendering failed.
    #[error("Failed to render chart to '{path}': {detail}")]
    ChartRenderFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single payslip.
///
/// Stored alongside [`crate::output::SlipResult`] when a slip fails.
/// The overall run continues unless ALL slips fail.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum SlipError {
    /// Text extraction from the PDF failed.
    #[error("'{stem}': text extraction failed: {detail}")]
    ExtractFailed { stem: String, detail: String },

    /// The PDF yielded no text at all.
    #[error("'{stem}': extracted text is empty")]
    EmptySlip { stem: String },

    /// The slip has no second line ending in a "MM YYYY" pay period.
    #[error("'{stem}': no pay period found (expected 'MM YYYY' at the end of line 2, got {found:?})")]
    MissingPeriod { stem: String, found: Option<String> },
}
