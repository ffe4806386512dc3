//! Top-level entry points: extract a directory, plot from the cache, or
//! inspect without writing anything.
//!
//! The pipeline is linear and single-pass: discover → extract → normalize →
//! cache → (separately) bucket → chart. Per-slip failures are recorded in
//! [`SlipResult`] and the run continues; only an empty result is fatal.

use crate::cache::{self, SlipCache};
use crate::chart::{self, SeriesSpec};
use crate::config::{ChartConfig, ExtractionConfig};
use crate::error::{PayslipError, SlipError};
use crate::output::{ExtractionOutput, ExtractionStats, SlipResult, SlipSummary};
use crate::pipeline::series::{period_field, slip_period, SeriesTable};
use crate::pipeline::{extract, input, normalize};
use crate::progress::ProgressCallback;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Extract every payslip in the configured directory and persist the cache.
///
/// # Returns
/// `Ok(ExtractionOutput)` on success, even if some slips failed
/// (check `output.stats.failed`).
///
/// # Errors
/// Returns `Err(PayslipError)` only for fatal errors:
/// - Directory not found / no matching PDFs / non-PDF content
/// - Every slip failed (extraction error or missing pay period)
/// - The cache or a text dump could not be written
pub fn convert_dir(
    config: &ExtractionConfig,
    progress: Option<&ProgressCallback>,
) -> Result<ExtractionOutput, PayslipError> {
    let total_start = Instant::now();
    info!(
        "Starting extraction: dir='{}' pattern='{}'",
        config.dir.display(),
        config.pattern
    );

    // ── Step 1: Discover payslips ────────────────────────────────────────
    let files = input::discover_payslips(&config.dir, &config.pattern)?;
    let total_files = files.len();
    if let Some(cb) = progress {
        cb.on_run_start(total_files);
    }

    // ── Step 2: Extract and normalize each slip ──────────────────────────
    let mut cache = SlipCache::default();
    let mut slips: Vec<SlipResult> = Vec::with_capacity(total_files);
    let mut extract_duration_ms = 0u64;

    for (index, path) in files.iter().enumerate() {
        let stem = input::slip_stem(path);
        if let Some(cb) = progress {
            cb.on_slip_start(&stem, index, total_files);
        }

        let extract_start = Instant::now();
        let text = extract::extract_text(path, &stem);
        extract_duration_ms += extract_start.elapsed().as_millis() as u64;

        match text {
            Ok(text) => {
                let lines = normalize::normalize_text(&text);
                // The dump is the diagnostic for a bad slip, so write it even
                // when the period check below fails.
                if config.write_text {
                    cache::write_text_dump(path, &lines)?;
                }

                let (result, entry) = record_slip(stem.clone(), lines);
                if let Some(cb) = progress {
                    match &result.error {
                        None => cb.on_slip_complete(&stem, index, total_files, result.line_count),
                        Some(e) => cb.on_slip_error(&stem, index, total_files, &e.to_string()),
                    }
                }
                if let Some(e) = &result.error {
                    warn!("{}", e);
                }
                if let Some((stem, lines)) = entry {
                    cache.insert(stem, lines);
                }
                slips.push(result);
            }
            Err(e) => {
                warn!("'{}' failed: {}", stem, e);
                if let Some(cb) = progress {
                    cb.on_slip_error(&stem, index, total_files, &e.to_string());
                }
                slips.push(SlipResult {
                    stem,
                    period: None,
                    line_count: 0,
                    error: Some(e),
                });
            }
        }
    }

    // ── Step 3: Persist the cache ────────────────────────────────────────
    let processed = slips.iter().filter(|s| s.error.is_none()).count();
    let failed = total_files - processed;

    if processed == 0 {
        let first_error = slips
            .iter()
            .find_map(|s| s.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(PayslipError::AllSlipsFailed {
            total: total_files,
            first_error,
        });
    }

    cache.save(&config.cache_path)?;

    if let Some(cb) = progress {
        cb.on_run_complete(total_files, processed);
    }

    let stats = ExtractionStats {
        total_files,
        processed,
        failed,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        extract_duration_ms,
    };
    info!(
        "Extraction complete: {}/{} slips, {}ms total",
        processed, total_files, stats.total_duration_ms
    );

    Ok(ExtractionOutput { slips, stats })
}

/// Bookkeeping for one successfully extracted slip: a cache entry when the
/// header carries a pay period, a recorded [`SlipError::MissingPeriod`]
/// otherwise. Period-less slips never enter the cache.
fn record_slip(
    stem: String,
    lines: Vec<String>,
) -> (SlipResult, Option<(String, Vec<String>)>) {
    match slip_period(&lines) {
        Some(period) => (
            SlipResult {
                stem: stem.clone(),
                period: Some(period),
                line_count: lines.len(),
                error: None,
            },
            Some((stem, lines)),
        ),
        None => {
            let error = SlipError::MissingPeriod {
                stem: stem.clone(),
                found: period_field(&lines).map(str::to_string),
            };
            (
                SlipResult {
                    stem,
                    period: None,
                    line_count: lines.len(),
                    error: Some(error),
                },
                None,
            )
        }
    }
}

/// Load the cache, bucket it into series, and write the stacked bar chart.
///
/// Returns the path of the written HTML file.
pub fn plot_from_cache(
    extraction: &ExtractionConfig,
    chart_config: &ChartConfig,
    specs: &[SeriesSpec],
) -> Result<PathBuf, PayslipError> {
    let cache = SlipCache::load(&extraction.cache_path)?;
    let table = SeriesTable::build(&cache)?;

    let chart = chart::render_chart(&table, specs, chart_config);
    chart::write_chart(&chart, &chart_config.output, chart_config)?;

    info!("Chart written to {}", chart_config.output.display());
    Ok(chart_config.output.clone())
}

/// Convenience wrapper: extract the directory, then plot in one call.
pub fn convert_and_plot(
    extraction: &ExtractionConfig,
    chart_config: &ChartConfig,
    specs: &[SeriesSpec],
    progress: Option<&ProgressCallback>,
) -> Result<(ExtractionOutput, PathBuf), PayslipError> {
    let output = convert_dir(extraction, progress)?;
    let chart_path = plot_from_cache(extraction, chart_config, specs)?;
    Ok((output, chart_path))
}

/// Discover payslips and probe their periods without writing anything.
///
/// Extraction still runs (the period lives inside the PDF text) but the
/// cache on disk and any `_res.txt` dumps are left untouched.
pub fn inspect_dir(config: &ExtractionConfig) -> Result<Vec<SlipSummary>, PayslipError> {
    let files = input::discover_payslips(&config.dir, &config.pattern)?;

    let mut summaries = Vec::with_capacity(files.len());
    for path in &files {
        let stem = input::slip_stem(path);
        match extract::extract_text(path, &stem) {
            Ok(text) => {
                let lines = normalize::normalize_text(&text);
                summaries.push(SlipSummary {
                    stem,
                    period: slip_period(&lines),
                    line_count: lines.len(),
                });
            }
            Err(e) => {
                warn!("'{}' failed during inspect: {}", stem, e);
                summaries.push(SlipSummary {
                    stem,
                    period: None,
                    line_count: 0,
                });
            }
        }
    }

    Ok(summaries)
}
