//! # payslip2chart
//!
//! Extract salary line-items from payslip PDFs and chart them over time.
//!
//! ## Why this crate?
//!
//! Payroll systems export one PDF per month, typeset on a column grid with
//! localized, diacritic-heavy labels. Reading a salary trend out of a folder
//! of those by hand is hopeless. This crate flattens each slip into
//! normalized `key; value` lines, buckets the lines into labeled time series
//! on a shared month axis, and renders the series as a stacked bar chart.
//!
//! ## Pipeline Overview
//!
//! ```text
//! payslip directory
//!  │
//!  ├─ 1. Discover   filename-pattern scan + %PDF magic check
//!  ├─ 2. Extract    PDF → plain text (pdf-extract)
//!  ├─ 3. Normalize  diacritics, column gaps → "; ", OCR-split repairs
//!  ├─ 4. Cache      stem → lines, persisted as JSON
//!  ├─ 5. Bucket     lines → {key → time series}, axis-aligned, "0"-padded
//!  └─ 6. Chart      stacked bars → standalone HTML (ECharts)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use payslip2chart::{
//!     convert_and_plot, default_series, ChartConfig, ExtractionConfig,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extraction = ExtractionConfig::builder().dir("./slips").build()?;
//!     let chart = ChartConfig::default();
//!     let (output, chart_path) =
//!         convert_and_plot(&extraction, &chart, &default_series(), None)?;
//!     eprintln!(
//!         "{}/{} slips → {}",
//!         output.stats.processed,
//!         output.stats.total_files,
//!         chart_path.display()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `payslip2chart` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! payslip2chart = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod cache;
pub mod chart;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use cache::SlipCache;
pub use chart::{default_series, render_chart, write_chart, SeriesSpec};
pub use config::{ChartConfig, ChartConfigBuilder, ExtractionConfig, ExtractionConfigBuilder};
pub use convert::{convert_and_plot, convert_dir, inspect_dir, plot_from_cache};
pub use error::{PayslipError, SlipError};
pub use output::{ExtractionOutput, ExtractionStats, SlipResult, SlipSummary};
pub use pipeline::series::{AlignedSeries, NumericSeries, Period, SeriesTable};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
