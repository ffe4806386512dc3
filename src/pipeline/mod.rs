//! Pipeline stages for payslip-to-series extraction.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the PDF text backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ normalize ──▶ series
//! (dir scan)  (pdf text)  (line rules)  (bucketing + axis alignment)
//! ```
//!
//! 1. [`input`]     — discover payslip PDFs by filename pattern and validate
//!    the `%PDF` magic bytes
//! 2. [`extract`]   — whole-document text extraction via `pdf-extract`
//! 3. [`normalize`] — per-line cleanup: diacritics, separators, known bad
//!    conversions
//! 4. [`series`]    — bucket normalized lines into labeled time series on a
//!    shared pay-period axis

pub mod extract;
pub mod input;
pub mod normalize;
pub mod series;
