//! CLI binary for payslip2chart.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig` / `ChartConfig` and prints results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use payslip2chart::{
    convert_dir, default_series, inspect_dir, plot_from_cache, ChartConfig, ExtractionConfig,
    ExtractionProgressCallback, ProgressCallback,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar and per-slip log
/// lines using [indicatif].
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Count of slips that errored out.
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set by `on_run_start`
    /// (called after discovery, before any slip is read).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_run_start

        // Initial style: spinner only (no counter until we know the total).
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.set_message("Looking for payslips…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} slips  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Extracting");
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_slips: usize) {
        self.activate_bar(total_slips);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Extracting {total_slips} payslips…"))
        ));
    }

    fn on_slip_start(&self, stem: &str, _index: usize, _total: usize) {
        self.bar.set_message(stem.to_string());
    }

    fn on_slip_complete(&self, stem: &str, _index: usize, _total: usize, line_count: usize) {
        self.bar.println(format!(
            "  {} {:<28}  {}",
            green("✓"),
            stem,
            dim(&format!("{line_count:>3} lines")),
        ));
        self.bar.inc(1);
    }

    fn on_slip_error(&self, stem: &str, _index: usize, _total: usize, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg: String = if error.chars().count() > 80 {
            let head: String = error.chars().take(79).collect();
            format!("{head}\u{2026}")
        } else {
            error.to_string()
        };

        self.bar
            .println(format!("  {} {:<28}  {}", red("✗"), stem, red(&msg)));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, total_slips: usize, success_count: usize) {
        let failed = total_slips.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} payslips extracted successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} payslips extracted  ({} failed)",
                if failed == total_slips {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_slips,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract all payslips in the current directory into the cache
  payslip2chart convert

  # Extract a specific folder, keeping per-slip _res.txt dumps
  payslip2chart convert --dir ~/payslips --write-txt

  # Render the stacked bar chart from the cache
  payslip2chart plot --out salary.html --title "Salary 2016-2020"

  # One-off: what did the scanner find, and which months are covered?
  payslip2chart inspect --dir ~/payslips

  # Machine-readable run report
  payslip2chart convert --json > report.json

WORKFLOW:
  1. Drop the monthly VypListek*.pdf exports into one directory.
  2. `payslip2chart convert` — extracts text, normalizes lines, writes the
     JSON cache (payslip-cache.json by default).
  3. `payslip2chart plot` — re-renders the chart from the cache in
     milliseconds; re-run `convert` only when new slips arrive.

ENVIRONMENT VARIABLES:
  PAYSLIP_DIR       Default payslip directory
  PAYSLIP_PATTERN   Default filename pattern (VypListek)
  PAYSLIP_CACHE     Default cache file path
  RUST_LOG          tracing filter, e.g. payslip2chart=debug
"#;

/// Extract salary line-items from payslip PDFs and chart them over time.
#[derive(Parser, Debug)]
#[command(
    name = "payslip2chart",
    version,
    about = "Extract salary line-items from payslip PDFs and chart them over time",
    long_about = "Extract structured salary line-items from scanned/typeset payslip PDFs, \
normalize the text, cache the result as JSON, and render a stacked bar chart of salary \
components over time as a standalone HTML file.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PAYSLIP_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "PAYSLIP_QUIET")]
    quiet: bool,

    /// Disable the progress bar.
    #[arg(long, global = true, env = "PAYSLIP_NO_PROGRESS")]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract payslip PDFs into the JSON line cache.
    Convert {
        /// Directory scanned (non-recursively) for payslip PDFs.
        #[arg(long, env = "PAYSLIP_DIR", default_value = ".")]
        dir: PathBuf,

        /// Substring a file name must contain to count as a payslip.
        #[arg(long, env = "PAYSLIP_PATTERN", default_value = "VypListek")]
        pattern: String,

        /// Path of the JSON line cache.
        #[arg(long, env = "PAYSLIP_CACHE", default_value = "payslip-cache.json")]
        cache: PathBuf,

        /// Also write a <stem>_res.txt dump next to each source PDF.
        #[arg(long)]
        write_txt: bool,

        /// Print the run report as JSON instead of the human summary.
        #[arg(long)]
        json: bool,
    },

    /// Render the stacked bar chart from the cache.
    Plot {
        /// Path of the JSON line cache.
        #[arg(long, env = "PAYSLIP_CACHE", default_value = "payslip-cache.json")]
        cache: PathBuf,

        /// Output HTML file.
        #[arg(short, long, default_value = "payslip-chart.html")]
        out: PathBuf,

        /// Chart title.
        #[arg(long, default_value = "Salary components over time")]
        title: String,

        /// Canvas width in pixels.
        #[arg(long, default_value_t = 1400)]
        width: u32,

        /// Canvas height in pixels.
        #[arg(long, default_value_t = 800)]
        height: u32,
    },

    /// List discovered payslips and their pay periods, without writing anything.
    Inspect {
        /// Directory scanned (non-recursively) for payslip PDFs.
        #[arg(long, env = "PAYSLIP_DIR", default_value = ".")]
        dir: PathBuf,

        /// Substring a file name must contain to count as a payslip.
        #[arg(long, env = "PAYSLIP_PATTERN", default_value = "VypListek")]
        pattern: String,

        /// Print the summaries as JSON instead of the table.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let json_mode = matches!(
        cli.command,
        Command::Convert { json: true, .. } | Command::Inspect { json: true, .. }
    );
    let show_progress = !cli.quiet && !cli.no_progress && !json_mode;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Convert {
            dir,
            pattern,
            cache,
            write_txt,
            json,
        } => run_convert(dir, pattern, cache, write_txt, json, cli.quiet, show_progress),
        Command::Plot {
            cache,
            out,
            title,
            width,
            height,
        } => run_plot(cache, out, title, width, height, cli.quiet),
        Command::Inspect { dir, pattern, json } => run_inspect(dir, pattern, json),
    }
}

fn run_convert(
    dir: PathBuf,
    pattern: String,
    cache: PathBuf,
    write_txt: bool,
    json: bool,
    quiet: bool,
    show_progress: bool,
) -> Result<()> {
    let config = ExtractionConfig::builder()
        .dir(dir)
        .pattern(pattern)
        .cache_path(&cache)
        .write_text(write_txt)
        .build()
        .context("Invalid configuration")?;

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as ProgressCallback)
    } else {
        None
    };

    let output = convert_dir(&config, progress_cb.as_ref()).context("Extraction failed")?;

    if json {
        let report =
            serde_json::to_string_pretty(&output).context("Failed to serialise run report")?;
        println!("{report}");
    } else if !quiet {
        // Summary line (the callback already printed the per-slip log).
        eprintln!(
            "{}  {}/{} slips  {}ms  →  {}",
            if output.stats.failed == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            output.stats.processed,
            output.stats.total_files,
            output.stats.total_duration_ms,
            bold(&cache.display().to_string()),
        );
        if let Some(e) = output.first_error() {
            eprintln!("   first failure: {}", dim(&e.to_string()));
        }
    }

    Ok(())
}

fn run_plot(
    cache: PathBuf,
    out: PathBuf,
    title: String,
    width: u32,
    height: u32,
    quiet: bool,
) -> Result<()> {
    let extraction = ExtractionConfig::builder()
        .cache_path(cache)
        .build()
        .context("Invalid configuration")?;
    let chart_config = ChartConfig::builder()
        .output(out)
        .title(title)
        .width(width)
        .height(height)
        .build()
        .context("Invalid configuration")?;

    let written = plot_from_cache(&extraction, &chart_config, &default_series())
        .context("Chart rendering failed")?;

    if !quiet {
        eprintln!(
            "{}  chart written to {}",
            green("✔"),
            bold(&written.display().to_string())
        );
    }
    Ok(())
}

fn run_inspect(dir: PathBuf, pattern: String, json: bool) -> Result<()> {
    let config = ExtractionConfig::builder()
        .dir(dir)
        .pattern(pattern)
        .build()
        .context("Invalid configuration")?;

    let summaries = inspect_dir(&config).context("Inspection failed")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summaries).context("Failed to serialise summaries")?
        );
        return Ok(());
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{:<32} {:<10} {:>6}", "SLIP", "PERIOD", "LINES")?;
    for s in &summaries {
        let period = s
            .period
            .map(|p| p.to_string())
            .unwrap_or_else(|| "—".to_string());
        writeln!(handle, "{:<32} {:<10} {:>6}", s.stem, period, s.line_count)?;
    }
    Ok(())
}
