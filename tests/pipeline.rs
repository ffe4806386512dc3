//! Integration tests for payslip2chart.
//!
//! The pipeline tests run everywhere: they feed raw extracted-style text
//! through normalize → series → chart and check the end-to-end semantics.
//!
//! The e2e tests at the bottom use real payslip PDFs in `./test_cases/` and
//! are gated behind the `E2E_ENABLED` environment variable so they do not
//! run in CI unless explicitly requested:
//!
//!   E2E_ENABLED=1 cargo test --test pipeline -- --nocapture

use payslip2chart::{
    convert_dir, default_series, plot_from_cache, render_chart, write_chart, ChartConfig,
    ExtractionConfig, Period, SeriesTable, SlipCache,
};
use payslip2chart::pipeline::normalize::normalize_text;
use std::path::PathBuf;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

/// Skip this test if E2E_ENABLED is not set *or* no payslips at `dir`.
macro_rules! e2e_skip_unless_ready {
    ($dir:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let d: PathBuf = $dir;
        if !d.is_dir() {
            println!("SKIP — test directory not found: {}", d.display());
            println!("       Copy some VypListek*.pdf files into it first.");
            return;
        }
        d
    }};
}

/// Raw text the way the extractor emits it for one payslip: column gaps as
/// space runs, diacritics intact, one mis-split label.
fn raw_slip(period: &str, gross: u32, cashless: u32) -> String {
    format!(
        "C2 KUN      EVEKT OR, spol. s r.o.\n\
         1127   Věrner Jan   {period}\n\
         *** HRUBÁ MZDA      {gross}\n\
         Be z hotovostne 123456789/2010      {cashless}\n\
         Výkonnostní odměny      2500\n\
         PRUMER (dov.)      143.25\n\
         - - - - - - - - -      0\n"
    )
}

fn cache_from_raw(slips: &[(&str, String)]) -> SlipCache {
    let mut cache = SlipCache::default();
    for (stem, text) in slips {
        cache.insert(stem.to_string(), normalize_text(text));
    }
    cache
}

// ── Pipeline tests (no PDFs, always run) ─────────────────────────────────────

#[test]
fn raw_text_to_series_table() {
    let cache = cache_from_raw(&[
        ("VypListek_2017_05", raw_slip("05 2017", 121212, 16342)),
        ("VypListek_2017_07", raw_slip("07 2017", 131313, 17000)),
    ]);

    let table = SeriesTable::build(&cache).unwrap();
    assert_eq!(table.axis(), &[Period::new(5, 2017), Period::new(7, 2017)]);

    // The mis-split label must have been repaired and bucketed.
    let cashless = table.aligned("Bezhotovostne", Some(1)).parse_numeric();
    assert_eq!(cashless.values, vec![16342, 17000]);

    // Diacritics stripped on keys.
    let bonuses = table.aligned("Vykonnostni odmeny", None).parse_numeric();
    assert_eq!(bonuses.values, vec![2500, 2500]);

    // Decimal series rounds.
    let avg = table.aligned("PRUMER (dov.)", None).parse_numeric();
    assert_eq!(avg.values, vec![143, 143]);

    // Rule lines never become series.
    assert!(!table.keys().any(|k| k.contains("- - -")));
}

#[test]
fn missing_month_is_zero_padded_everywhere() {
    let cache = cache_from_raw(&[
        ("VypListek_2017_05", raw_slip("05 2017", 121212, 16342)),
        // June slip exists but has no bonus line.
        (
            "VypListek_2017_06",
            "C2 KUN      EVEKTOR, spol. s r.o.\n\
             1127   Verner Jan   06 2017\n\
             *** HRUBÁ MZDA      125000\n"
                .to_string(),
        ),
        ("VypListek_2017_07", raw_slip("07 2017", 131313, 17000)),
    ]);

    let table = SeriesTable::build(&cache).unwrap();
    assert_eq!(table.axis().len(), 3);

    for spec in default_series() {
        let aligned = table.aligned(spec.key, spec.subvalue);
        assert_eq!(
            aligned.raw.len(),
            3,
            "series '{}' not padded to the full axis",
            spec.key
        );
    }

    let bonuses = table.aligned("Vykonnostni odmeny", None).parse_numeric();
    assert_eq!(bonuses.values, vec![2500, 0, 2500]);
}

#[test]
fn chart_html_contains_every_period_and_label() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("chart.html");

    let cache = cache_from_raw(&[
        ("VypListek_2017_05", raw_slip("05 2017", 121212, 16342)),
        ("VypListek_2018_01", raw_slip("01 2018", 140000, 18000)),
    ]);
    let table = SeriesTable::build(&cache).unwrap();

    let config = ChartConfig::builder()
        .output(&out)
        .title("Test chart")
        .build()
        .unwrap();
    let chart = render_chart(&table, &default_series(), &config);
    write_chart(&chart, &out, &config).unwrap();

    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.contains("05 2017"));
    assert!(html.contains("01 2018"));
    assert!(html.contains("Hrubá mzda"));
    assert!(html.contains("Výkonnostní odměny"));
}

#[test]
fn plot_round_trips_through_the_cache_file() {
    let tmp = tempfile::tempdir().unwrap();
    let cache_path = tmp.path().join("cache.json");
    let out = tmp.path().join("chart.html");

    cache_from_raw(&[("VypListek_2017_05", raw_slip("05 2017", 121212, 16342))])
        .save(&cache_path)
        .unwrap();

    let extraction = ExtractionConfig::builder()
        .cache_path(&cache_path)
        .build()
        .unwrap();
    let chart_config = ChartConfig::builder().output(&out).build().unwrap();

    let written = plot_from_cache(&extraction, &chart_config, &default_series()).unwrap();
    assert!(written.exists());
}

#[test]
fn axis_sorts_across_year_boundaries() {
    // "12 2017" vs "01 2018": lexicographic month-first order would invert these.
    let cache = cache_from_raw(&[
        ("VypListek_2018_01", raw_slip("01 2018", 1, 1)),
        ("VypListek_2017_12", raw_slip("12 2017", 1, 1)),
    ]);
    let table = SeriesTable::build(&cache).unwrap();
    assert_eq!(table.axis(), &[Period::new(12, 2017), Period::new(1, 2018)]);
}

// ── E2E tests (real PDFs, env-gated) ─────────────────────────────────────────

#[test]
fn e2e_convert_real_payslips() {
    let dir = e2e_skip_unless_ready!(test_cases_dir());

    let tmp = tempfile::tempdir().unwrap();
    let cache_path = tmp.path().join("cache.json");

    let config = ExtractionConfig::builder()
        .dir(&dir)
        .cache_path(&cache_path)
        .build()
        .unwrap();

    let output = convert_dir(&config, None).expect("convert_dir should succeed");
    assert!(output.stats.processed > 0, "no slip extracted");
    assert!(cache_path.exists(), "cache not written");

    let cache = SlipCache::load(&cache_path).unwrap();
    let table = SeriesTable::build(&cache).expect("real slips must carry periods");
    assert!(!table.axis().is_empty());

    println!(
        "e2e: {} slips → {} periods, {} series",
        output.stats.processed,
        table.axis().len(),
        table.keys().count()
    );
}

#[test]
fn e2e_plot_real_payslips() {
    let dir = e2e_skip_unless_ready!(test_cases_dir());

    let tmp = tempfile::tempdir().unwrap();
    let cache_path = tmp.path().join("cache.json");
    let out = tmp.path().join("chart.html");

    let extraction = ExtractionConfig::builder()
        .dir(&dir)
        .cache_path(&cache_path)
        .build()
        .unwrap();
    convert_dir(&extraction, None).expect("convert_dir should succeed");

    let chart_config = ChartConfig::builder().output(&out).build().unwrap();
    let written = plot_from_cache(&extraction, &chart_config, &default_series()).unwrap();

    let html = std::fs::read_to_string(&written).unwrap();
    assert!(html.contains("<html"), "chart output is not HTML");
    println!("e2e: chart at {}", written.display());
}
