//! Chart rendering: stacked bars of salary components, one column group per
//! pay period.
//!
//! ## Chart layout
//!
//! Gross salary is the headline figure and must be readable against the sum
//! of its components, so the `main` series gets a stack group of its own
//! while every other series shares a second stack. ECharts then draws the
//! gross bar and the component stack side by side within each period slot —
//! when the component stack roughly reaches the gross bar's height, the
//! extraction is consistent.

use crate::config::ChartConfig;
use crate::error::PayslipError;
use crate::pipeline::series::SeriesTable;
use charming::{
    component::{Axis, Legend, Title},
    element::{AxisType, Label, LabelPosition},
    series::Bar,
    Chart, HtmlRenderer,
};
use std::path::Path;
use tracing::debug;

/// Stack-group id of the `main` (gross salary) series.
const STACK_GROSS: &str = "gross";
/// Stack-group id shared by every component series.
const STACK_COMPONENTS: &str = "components";

/// Declarative selection of one series to plot.
#[derive(Debug, Clone)]
pub struct SeriesSpec {
    /// Normalized line key, e.g. `"*** HRUBA MZDA"`.
    pub key: &'static str,
    /// Human-readable legend label (diacritics restored).
    pub label: &'static str,
    /// For composite values (`"account; amount"`), the `;`-field holding the
    /// amount.
    pub subvalue: Option<usize>,
    /// The headline series, stacked alone beside the component stack.
    pub main: bool,
}

impl SeriesSpec {
    const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            subvalue: None,
            main: false,
        }
    }

    const fn subvalue(mut self, idx: usize) -> Self {
        self.subvalue = Some(idx);
        self
    }

    const fn main(mut self) -> Self {
        self.main = true;
        self
    }
}

/// The built-in payslip series set.
///
/// Keys are post-normalization (ASCII); labels restore the Czech diacritics
/// for the legend. `Bezhotovostne` and `Kompenzace kapit.poj` carry the bank
/// account in field 0 and the amount in field 1.
pub fn default_series() -> Vec<SeriesSpec> {
    vec![
        SeriesSpec::new("*** HRUBA MZDA", "Hrubá mzda").main(),
        SeriesSpec::new("Bezhotovostne", "Bezhotovostně").subvalue(1),
        SeriesSpec::new("Vykonnostni odmeny", "Výkonnostní odměny"),
        SeriesSpec::new("Mes.premie z fondu", "Měsíční prémie z fondu"),
        SeriesSpec::new("PRUMER (dov.)", "Dovolená — průměr"),
        SeriesSpec::new("DOVOLENA-zust.", "Dovolená — zůstatek"),
        SeriesSpec::new("Stravne s prispevkem", "Stravné"),
        SeriesSpec::new("Kompenzace kapit.poj", "Kompenzace kapit. poj.").subvalue(1),
    ]
}

/// Build the stacked bar chart for `specs` over the table's period axis.
pub fn render_chart(table: &SeriesTable, specs: &[SeriesSpec], config: &ChartConfig) -> Chart {
    let axis_labels: Vec<String> = table.axis().iter().map(|p| p.to_string()).collect();

    let mut chart = Chart::new()
        .title(Title::new().text(config.title.as_str()))
        .legend(Legend::new())
        .x_axis(Axis::new().type_(AxisType::Category).data(axis_labels))
        .y_axis(Axis::new().type_(AxisType::Value));

    for spec in specs {
        let numeric = table.aligned(spec.key, spec.subvalue).parse_numeric();

        let label = if numeric.sign_stripped {
            format!("(Minus) {}", spec.label)
        } else {
            spec.label.to_string()
        };
        debug!(
            "Adding series '{}' ({} points, main={})",
            label,
            numeric.values.len(),
            spec.main
        );

        let stack = if spec.main { STACK_GROSS } else { STACK_COMPONENTS };
        chart = chart.series(
            Bar::new()
                .name(label)
                .stack(stack)
                .label(Label::new().show(true).position(LabelPosition::Inside))
                .data(numeric.values),
        );
    }

    chart
}

/// Render `chart` as a standalone HTML file at `path`.
pub fn write_chart(chart: &Chart, path: &Path, config: &ChartConfig) -> Result<(), PayslipError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| PayslipError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
    }

    let mut renderer = HtmlRenderer::new(
        config.title.clone(),
        u64::from(config.width),
        u64::from(config.height),
    );
    renderer
        .save(chart, path)
        .map_err(|e| PayslipError::ChartRenderFailed {
            path: path.to_path_buf(),
            detail: format!("{e:?}"),
        })
}
