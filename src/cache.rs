//! On-disk cache of normalized payslip lines.
//!
//! ## Why cache at all?
//!
//! PDF text extraction is by far the slowest stage, and the slip corpus only
//! grows by one file a month. `convert` writes every slip's normalized lines
//! to a single JSON document; `plot` then re-renders in milliseconds without
//! touching a PDF. JSON (not a binary format) so a broken series can be
//! diagnosed with any text editor.
//!
//! The map is a `BTreeMap` keyed by file stem: payroll exports embed the
//! period in the stem (`VypListek_2019_03`), so iteration order is already
//! chronological and deterministic.

use crate::error::PayslipError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// File stem → normalized lines, for every successfully extracted slip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlipCache {
    slips: BTreeMap<String, Vec<String>>,
}

impl SlipCache {
    /// Number of cached slips.
    pub fn len(&self) -> usize {
        self.slips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slips.is_empty()
    }

    /// Insert (or replace) a slip's normalized lines.
    pub fn insert(&mut self, stem: String, lines: Vec<String>) {
        self.slips.insert(stem, lines);
    }

    /// Iterate slips in stem order.
    pub fn slips(&self) -> impl Iterator<Item = (&str, &Vec<String>)> {
        self.slips.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Load a cache written by [`save`](Self::save).
    ///
    /// A missing file and a corrupt file are distinct errors: the first means
    /// "run convert first", the second "the file on disk is damaged".
    pub fn load(path: &Path) -> Result<Self, PayslipError> {
        let data = match std::fs::read_to_string(path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PayslipError::CacheMissing {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => {
                return Err(PayslipError::CacheCorrupt {
                    path: path.to_path_buf(),
                    detail: e.to_string(),
                })
            }
        };

        let cache: SlipCache =
            serde_json::from_str(&data).map_err(|e| PayslipError::CacheCorrupt {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;

        info!("Loaded {} slips from {}", cache.len(), path.display());
        Ok(cache)
    }

    /// Persist the cache as pretty JSON.
    ///
    /// Atomic write (temp file + rename) so a crash mid-write never leaves a
    /// half-written cache behind.
    pub fn save(&self, path: &Path) -> Result<(), PayslipError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PayslipError::Internal(format!("cache serialisation: {e}")))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| PayslipError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json).map_err(|e| PayslipError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::rename(&tmp_path, path).map_err(|e| PayslipError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        info!("Saved {} slips to {}", self.len(), path.display());
        Ok(())
    }
}

/// Write a slip's normalized lines to `<stem>_res.txt` next to the source PDF.
///
/// One line per row, trailing newline. Nothing reads these back; they exist
/// for eyeballing the normalizer's output.
pub fn write_text_dump(pdf_path: &Path, lines: &[String]) -> Result<(), PayslipError> {
    let stem = pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let txt_path = pdf_path.with_file_name(format!("{stem}_res.txt"));

    let mut body = lines.join("\n");
    body.push('\n');

    std::fs::write(&txt_path, body).map_err(|e| PayslipError::OutputWriteFailed {
        path: txt_path.clone(),
        source: e,
    })
}
