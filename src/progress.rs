//! Progress-callback trait for per-slip extraction events.
//!
//! Inject an [`ProgressCallback`] into [`crate::convert::convert_dir`] to
//! receive real-time events as the pipeline processes each payslip.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a terminal progress bar, a log file, or a GUI — without
//! the library knowing anything about how the host application communicates.
//! The trait is `Send + Sync` so a single callback can be shared freely.

use std::sync::Arc;

/// Called by the extraction pipeline as it processes each payslip.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Slips are processed sequentially, in file-name
/// order, so events arrive in order too.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once after discovery, before any slip is read.
    fn on_run_start(&self, total_slips: usize) {
        let _ = total_slips;
    }

    /// Called just before a slip's PDF is opened.
    fn on_slip_start(&self, stem: &str, index: usize, total_slips: usize) {
        let _ = (stem, index, total_slips);
    }

    /// Called when a slip is successfully extracted and normalized.
    fn on_slip_complete(&self, stem: &str, index: usize, total_slips: usize, line_count: usize) {
        let _ = (stem, index, total_slips, line_count);
    }

    /// Called when a slip fails.
    fn on_slip_error(&self, stem: &str, index: usize, total_slips: usize, error: &str) {
        let _ = (stem, index, total_slips, error);
    }

    /// Called once after all slips have been attempted.
    fn on_run_complete(&self, total_slips: usize, success_count: usize) {
        let _ = (total_slips, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias for the shared callback handle.
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;
