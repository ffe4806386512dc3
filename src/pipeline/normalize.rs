//! Line normalization: deterministic cleanup of extracted payslip text.
//!
//! ## Why is normalization necessary?
//!
//! Payslip PDFs are typeset on a column grid, and text extractors flatten
//! that grid into lines where the only hint of column boundaries is a run of
//! spaces. Czech labels additionally carry diacritics that make key lookup
//! brittle, and a few labels come out of the extractor split mid-word
//! ("Be z hotovostne"). This module applies cheap, deterministic rules that
//! turn each raw line into `key; value; value…` form without touching
//! content. Each rule is independently testable.
//!
//! ## Rule Order
//!
//! Rules must run in this specific order: drop colons before collapsing
//! whitespace (a colon may be flanked by the spaces that mark a column
//! boundary), strip diacritics before the bad-conversion repairs so the
//! repair table can be plain ASCII.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Known extractor mis-splits and their repairs.
///
/// The replacement for "Be z hotovostne" deliberately appends a `;` — the
/// original label is followed by a single space only, so the whitespace
/// collapse never inserts the key/value separator for it.
const BAD_CONVERTS: &[(&str, &str)] = &[
    ("Be z hotovostne", "Bezhotovostne;"),
    ("VYPOCT . ZALOHA", "VYPOCT. ZALOHA"),
    ("EVEKT OR", "EVEKTOR"),
];

static RE_LONG_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Strip diacritics: NFD-decompose and drop combining marks.
///
/// "Růžovoučký kůň pěl ďábelské ódy" → "Ruzovoucky kun pel dabelske ody".
pub fn strip_accents(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Normalize a single extracted line into `key; value…` form.
///
/// Rules (applied in order):
/// 1. Remove every `:` (decorative on payslip labels)
/// 2. Trim and strip diacritics
/// 3. Collapse every run of 2+ whitespace characters into `"; "`
/// 4. Repair known bad conversions (see [`BAD_CONVERTS`])
pub fn normalize_line(line: &str) -> String {
    let line = strip_accents(line.replace(':', "").trim());
    let line = RE_LONG_SPACES.replace_all(&line, "; ").into_owned();
    fix_bad_converts(line)
}

/// Split extracted text into normalized lines.
pub fn normalize_text(text: &str) -> Vec<String> {
    text.split('\n').map(normalize_line).collect()
}

fn fix_bad_converts(mut line: String) -> String {
    for (broken, fixed) in BAD_CONVERTS {
        if line.contains(broken) {
            line = line.replace(broken, fixed);
            break;
        }
    }
    line
}
