//! PDF text extraction backed by the `pdf-extract` crate.
//!
//! A payslip is a single typeset page; `pdf_extract::extract_text` returns
//! the whole document as one string, which is exactly the granularity the
//! normalizer wants. Extraction failures are per-slip ([`SlipError`]) so one
//! corrupt file never aborts the run.

use crate::error::SlipError;
use std::path::Path;
use tracing::debug;

/// Extract the full text of a payslip PDF.
///
/// Returns [`SlipError::ExtractFailed`] when the PDF cannot be parsed and
/// [`SlipError::EmptySlip`] when parsing succeeds but yields no text (scanned
/// image-only slips with no OCR layer do this).
pub fn extract_text(path: &Path, stem: &str) -> Result<String, SlipError> {
    let text = pdf_extract::extract_text(path).map_err(|e| SlipError::ExtractFailed {
        stem: stem.to_string(),
        detail: e.to_string(),
    })?;

    if text.trim().is_empty() {
        return Err(SlipError::EmptySlip {
            stem: stem.to_string(),
        });
    }

    debug!("Extracted {} bytes of text from '{}'", text.len(), stem);
    Ok(text)
}
