//! Series bucketing: turn normalized slip lines into labeled time series.
//!
//! Every slip contributes one data point per labeled line. The pay period
//! comes from the slip's second line, whose last `;`-separated field is the
//! `"MM YYYY"` stamp printed in the slip header. Building the table keeps
//! raw values as strings; numeric interpretation happens per series via
//! [`AlignedSeries::parse_numeric`] so one odd series (account numbers,
//! decimal averages, negatives) cannot poison the others.
//!
//! ## The axis invariant
//!
//! Every aligned series has exactly one value per axis period. Slips are
//! monthly but people skip months (unpaid leave, onboarding), so each series
//! is padded with `"0"` at periods where its key never appeared.

use crate::cache::SlipCache;
use crate::error::PayslipError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Line-key substrings that mark non-data lines (rules, headers, employer
/// footer). Lines whose key contains any of these never become a series.
const IGNORED_KEY_MARKERS: &[&str] = &["- - -", ":", "PERM spol."];

/// Index of the line carrying the pay period (employee header line).
const PERIOD_LINE: usize = 1;

/// A pay period, `"MM YYYY"` on the slip.
///
/// Ordered by `(year, month)` so a sorted axis is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: u16,
    pub month: u8,
}

impl Period {
    pub fn new(month: u8, year: u16) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02} {}", self.month, self.year)
    }
}

impl FromStr for Period {
    type Err = ();

    /// Parse `"MM YYYY"` (also tolerates `"M YYYY"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut it = s.split_whitespace();
        let month: u8 = it.next().ok_or(())?.parse().map_err(|_| ())?;
        let year: u16 = it.next().ok_or(())?.parse().map_err(|_| ())?;
        if it.next().is_some() || !(1..=12).contains(&month) || year < 1900 {
            return Err(());
        }
        Ok(Self { year, month })
    }
}

/// The raw field a slip's pay period is read from: the last `;`-separated
/// field of the second line, trimmed but not parsed.
pub fn period_field(lines: &[String]) -> Option<&str> {
    let line = lines.get(PERIOD_LINE)?;
    Some(line.rsplit(';').next()?.trim())
}

/// Read a slip's pay period from its normalized lines.
pub fn slip_period(lines: &[String]) -> Option<Period> {
    period_field(lines)?.parse().ok()
}

/// All labeled series of a slip corpus, on a shared period axis.
#[derive(Debug, Clone)]
pub struct SeriesTable {
    /// Sorted, deduplicated pay periods of every slip in the cache.
    axis: Vec<Period>,
    /// Key → data points, in axis order per slip. Values stay raw strings.
    series: BTreeMap<String, Vec<(Period, String)>>,
    /// Cached slips that carried no parseable period and were left out.
    skipped: usize,
}

impl SeriesTable {
    /// Bucket every cached slip's lines into series.
    ///
    /// Slips without a parseable period are skipped with a warning; the
    /// build fails only when no slip at all carries a period.
    pub fn build(cache: &SlipCache) -> Result<Self, PayslipError> {
        let mut axis: Vec<Period> = Vec::new();
        let mut series: BTreeMap<String, Vec<(Period, String)>> = BTreeMap::new();
        let mut skipped = 0usize;

        for (stem, lines) in cache.slips() {
            let period = match slip_period(lines) {
                Some(p) => p,
                None => {
                    warn!("'{}': no pay period on line 2, slip skipped", stem);
                    skipped += 1;
                    continue;
                }
            };
            axis.push(period);

            for line in lines {
                let (key, value) = match split_line(line) {
                    Some(kv) => kv,
                    None => continue,
                };
                series.entry(key.to_string()).or_default().push((period, value));
            }
        }

        if axis.is_empty() {
            return Err(PayslipError::NoPeriods);
        }

        axis.sort_unstable();
        axis.dedup();
        debug!(
            "Built {} series over {} periods ({} slips skipped)",
            series.len(),
            axis.len(),
            skipped
        );

        Ok(Self { axis, series, skipped })
    }

    /// The shared, chronologically sorted period axis.
    pub fn axis(&self) -> &[Period] {
        &self.axis
    }

    /// Number of cached slips left out of the table for lack of a period.
    pub fn skipped_slips(&self) -> usize {
        self.skipped
    }

    /// All series keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|k| k.as_str())
    }

    /// Project `key`'s values onto the full axis, padding missing periods
    /// with `"0"`.
    ///
    /// `subvalue = Some(i)` first splits each raw value on `';'` and takes
    /// field `i` — used for composite values like `"123456789/2010; 16342"`
    /// where only one field is the amount. An absent key yields an all-zero
    /// series (the padding rule applied to an empty series).
    pub fn aligned(&self, key: &str, subvalue: Option<usize>) -> AlignedSeries {
        let points = self.series.get(key);
        let by_period: BTreeMap<Period, &str> = points
            .map(|pts| {
                pts.iter()
                    .map(|(p, v)| (*p, pick_subvalue(v, subvalue)))
                    .collect()
            })
            .unwrap_or_default();

        let raw: Vec<String> = self
            .axis
            .iter()
            .map(|p| by_period.get(p).map_or_else(|| "0".to_string(), |v| v.trim().to_string()))
            .collect();

        AlignedSeries {
            key: key.to_string(),
            raw,
        }
    }
}

/// Split a normalized line into `(key, value)` at the first `';'`.
///
/// Returns `None` for non-data lines: empty keys, value-less lines, and
/// keys carrying one of the [`IGNORED_KEY_MARKERS`].
fn split_line(line: &str) -> Option<(&str, String)> {
    let (key, rest) = line.split_once(';')?;
    let key = key.trim();
    if key.is_empty() || IGNORED_KEY_MARKERS.iter().any(|m| key.contains(m)) {
        return None;
    }
    Some((key, rest.trim().to_string()))
}

/// Select field `i` of a `;`-joined composite value, the whole value when
/// `subvalue` is `None` or the field is missing.
fn pick_subvalue(value: &str, subvalue: Option<usize>) -> &str {
    match subvalue {
        Some(i) => value.split(';').nth(i).unwrap_or(value),
        None => value,
    }
}

/// One series projected onto the full period axis. Values are still raw
/// strings; call [`parse_numeric`](Self::parse_numeric) to get plottable
/// integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedSeries {
    pub key: String,
    pub raw: Vec<String>,
}

impl AlignedSeries {
    /// Interpret the series numerically with the whole-series fallback chain:
    ///
    /// 1. every value parses as `i64`;
    /// 2. else every value parses as `f64`, rounded half-away-from-zero to `i64`
    ///    (vacation averages like `"143.25"`);
    /// 3. else every `'-'` is stripped and parsed as `i64`, and the series is
    ///    marked `sign_stripped` (accounting prints with a trailing minus,
    ///    `"1234-"`, fail both numeric parses).
    ///
    /// The fallback is per-series, not per-value: one decimal in a series
    /// means the whole series is decimal-formatted, and mixing parse modes
    /// within a series would silently change its meaning.
    pub fn parse_numeric(&self) -> NumericSeries {
        if let Some(values) = try_parse_all(&self.raw, |s| s.parse::<i64>().ok()) {
            return NumericSeries {
                key: self.key.clone(),
                values,
                sign_stripped: false,
            };
        }

        if let Some(values) =
            try_parse_all(&self.raw, |s| s.parse::<f64>().ok().map(|f| f.round() as i64))
        {
            return NumericSeries {
                key: self.key.clone(),
                values,
                sign_stripped: false,
            };
        }

        let values: Vec<i64> = self
            .raw
            .iter()
            .map(|s| s.replace('-', "").trim().parse::<i64>().unwrap_or(0))
            .collect();
        NumericSeries {
            key: self.key.clone(),
            values,
            sign_stripped: true,
        }
    }
}

fn try_parse_all(raw: &[String], parse: impl Fn(&str) -> Option<i64>) -> Option<Vec<i64>> {
    raw.iter().map(|s| parse(s.trim())).collect()
}

/// A fully parsed, axis-aligned numeric series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericSeries {
    pub key: String,
    pub values: Vec<i64>,
    /// True when minus signs had to be stripped to parse the series; the
    /// chart prefixes such labels with "(Minus) ".
    pub sign_stripped: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SlipCache;

    fn slip(stem: &str, lines: &[&str]) -> (String, Vec<String>) {
        (
            stem.to_string(),
            lines.iter().map(|l| l.to_string()).collect(),
        )
    }

    fn demo_cache() -> SlipCache {
        let mut cache = SlipCache::default();
        for (stem, lines) in [
            slip(
                "VypListek_2017_05",
                &[
                    "C2 KUN; EVEKTOR, spol. s r.o.",
                    "1127; Verner Jan; 05 2017",
                    "*** HRUBA MZDA; 121212",
                    "Bezhotovostne; 123456789/2010; 16342",
                    "PRUMER (dov.); 143.25",
                    "- - -; 0",
                    "",
                ],
            ),
            slip(
                "VypListek_2017_07",
                &[
                    "C2 KUN; EVEKTOR, spol. s r.o.",
                    "1127; Verner Jan; 07 2017",
                    "*** HRUBA MZDA; 131313",
                    "Bezhotovostne; 123456789/2010; 17000",
                    "PRUMER (dov.); 150.75",
                    "Zuctovani; -500",
                    "Oprava dane; 350-",
                ],
            ),
        ] {
            cache.insert(stem, lines);
        }
        cache
    }

    #[test]
    fn period_parses_and_orders() {
        let a: Period = "05 2017".parse().unwrap();
        let b: Period = "01 2018".parse().unwrap();
        assert!(a < b);
        assert_eq!(a.to_string(), "05 2017");
    }

    #[test]
    fn period_rejects_garbage() {
        assert!("Verner Jan".parse::<Period>().is_err());
        assert!("13 2017".parse::<Period>().is_err());
        assert!("05".parse::<Period>().is_err());
        assert!("05 2017 x".parse::<Period>().is_err());
    }

    #[test]
    fn slip_period_reads_last_field_of_line_two() {
        let lines = vec![
            "C2 KUN; EVEKTOR, spol. s r.o.".to_string(),
            "1127; Verner Jan; 05 2017".to_string(),
        ];
        assert_eq!(slip_period(&lines), Some(Period::new(5, 2017)));
    }

    #[test]
    fn axis_is_sorted_and_deduplicated() {
        let table = SeriesTable::build(&demo_cache()).unwrap();
        assert_eq!(
            table.axis(),
            &[Period::new(5, 2017), Period::new(7, 2017)]
        );
    }

    #[test]
    fn ignored_and_empty_keys_are_dropped() {
        let table = SeriesTable::build(&demo_cache()).unwrap();
        let keys: Vec<&str> = table.keys().collect();
        assert!(!keys.iter().any(|k| k.contains("- - -")));
        assert!(keys.contains(&"*** HRUBA MZDA"));
    }

    #[test]
    fn aligned_series_covers_full_axis() {
        let mut cache = demo_cache();
        // A slip without the Zuctovani key: series must still be axis-length.
        cache.insert(
            "VypListek_2017_06".to_string(),
            vec![
                "C2 KUN; EVEKTOR, spol. s r.o.".to_string(),
                "1127; Verner Jan; 06 2017".to_string(),
                "*** HRUBA MZDA; 125000".to_string(),
            ],
        );
        let table = SeriesTable::build(&cache).unwrap();
        assert_eq!(table.axis().len(), 3);

        let aligned = table.aligned("Zuctovani", None);
        assert_eq!(aligned.raw, vec!["0", "0", "-500"]);
    }

    #[test]
    fn period_less_slip_is_skipped_and_counted() {
        let mut cache = demo_cache();
        cache.insert(
            "VypListek_broken".to_string(),
            vec!["C2 KUN; EVEKTOR, spol. s r.o.".to_string()],
        );
        let table = SeriesTable::build(&cache).unwrap();
        assert_eq!(table.skipped_slips(), 1);
        assert_eq!(table.axis().len(), 2);
    }

    #[test]
    fn absent_key_yields_all_zeros() {
        let table = SeriesTable::build(&demo_cache()).unwrap();
        let aligned = table.aligned("No such key", None);
        assert_eq!(aligned.raw, vec!["0", "0"]);
        assert_eq!(aligned.parse_numeric().values, vec![0, 0]);
    }

    #[test]
    fn subvalue_picks_the_amount_field() {
        let table = SeriesTable::build(&demo_cache()).unwrap();
        let aligned = table.aligned("Bezhotovostne", Some(1));
        assert_eq!(aligned.raw, vec!["16342", "17000"]);
        assert_eq!(aligned.parse_numeric().values, vec![16342, 17000]);
    }

    #[test]
    fn integer_series_parses_directly() {
        let table = SeriesTable::build(&demo_cache()).unwrap();
        let n = table.aligned("*** HRUBA MZDA", None).parse_numeric();
        assert_eq!(n.values, vec![121212, 131313]);
        assert!(!n.sign_stripped);
    }

    #[test]
    fn decimal_series_rounds() {
        let table = SeriesTable::build(&demo_cache()).unwrap();
        let n = table.aligned("PRUMER (dov.)", None).parse_numeric();
        assert_eq!(n.values, vec![143, 151]);
        assert!(!n.sign_stripped);
    }

    #[test]
    fn leading_minus_is_still_an_integer() {
        let table = SeriesTable::build(&demo_cache()).unwrap();
        let n = table.aligned("Zuctovani", None).parse_numeric();
        // Axis has 05 and 07; padded "0" for the missing slip of 05.
        assert_eq!(n.values, vec![0, -500]);
        assert!(!n.sign_stripped);
    }

    #[test]
    fn trailing_minus_series_is_sign_stripped() {
        let table = SeriesTable::build(&demo_cache()).unwrap();
        let n = table.aligned("Oprava dane", None).parse_numeric();
        assert_eq!(n.values, vec![0, 350]);
        assert!(n.sign_stripped);
    }

    #[test]
    fn slip_without_period_is_skipped_not_fatal() {
        let mut cache = demo_cache();
        cache.insert(
            "VypListek_broken".to_string(),
            vec!["garbage".to_string(), "no period here".to_string()],
        );
        let table = SeriesTable::build(&cache).unwrap();
        assert_eq!(table.axis().len(), 2);
    }

    #[test]
    fn cache_with_no_periods_is_fatal() {
        let mut cache = SlipCache::default();
        cache.insert("x".to_string(), vec!["a".to_string(), "b".to_string()]);
        assert!(matches!(
            SeriesTable::build(&cache),
            Err(PayslipError::NoPeriods)
        ));
    }
}
