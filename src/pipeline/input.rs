//! Input discovery: find payslip PDFs in a directory.
//!
//! ## Why validate magic bytes up front?
//!
//! `pdf-extract` panics deep inside its parser on some non-PDF inputs, and a
//! renamed `.docx` or an HTML error page saved as `.pdf` is common in
//! hand-curated payslip folders. Checking the `%PDF` header here turns that
//! into a meaningful fatal error before any slip is processed.

use crate::error::PayslipError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Discover payslip PDFs in `dir`, sorted by file name.
///
/// A file qualifies when its name contains `pattern` and its extension is
/// `.pdf` (case-insensitive). The scan is non-recursive. Every match is
/// validated to start with the `%PDF` magic bytes.
///
/// File-name order doubles as chronological order for payroll exports
/// (`VypListek_2019_03.pdf` …), which keeps the period axis stable even
/// before periods are parsed.
pub fn discover_payslips(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, PayslipError> {
    if !dir.is_dir() {
        return Err(PayslipError::DirNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => PayslipError::PermissionDenied {
            path: dir.to_path_buf(),
        },
        _ => PayslipError::DirNotFound {
            path: dir.to_path_buf(),
        },
    })?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => continue,
        };
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf && name.contains(pattern) {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(PayslipError::NoPayslipsFound {
            dir: dir.to_path_buf(),
            pattern: pattern.to_string(),
        });
    }

    files.sort();

    for path in &files {
        validate_pdf(path)?;
    }

    debug!("Discovered {} payslip PDFs in {}", files.len(), dir.display());
    Ok(files)
}

/// Check that `path` is readable and starts with the `%PDF` magic bytes.
fn validate_pdf(path: &Path) -> Result<(), PayslipError> {
    match std::fs::File::open(path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            // A file too short to hold the magic cannot be a PDF either.
            if f.read_exact(&mut magic).is_err() || &magic != b"%PDF" {
                return Err(PayslipError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(PayslipError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => Err(PayslipError::FileNotFound {
            path: path.to_path_buf(),
        }),
    }
}

/// File stem of a payslip path, lossily decoded.
pub fn slip_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
