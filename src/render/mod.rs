//! Presentation layer: turns a [`PipelineOutput`] into a self-contained HTML
//! dashboard page.
//!
//! The chart backend only changes how the tables are drawn. Both backends
//! receive the same counts.

pub mod plotly;
pub mod svg;
pub mod table;

use crate::domain::aggregates::{PipelineOutput, ProvinceCounts, YearProvinceCounts, YearTypeCounts};
use crate::utils::error::Result;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt::Write as FmtWrite;
use strum::{Display, EnumString};

pub const BAR_TITLE: &str = "Contrataciones por Año y Tipo";
pub const PIE_TITLE: &str = "Distribución de Contrataciones por Provincia";
pub const LINE_TITLE: &str = "Evolución de Contrataciones por Año y Provincia";
pub const EMPTY_MESSAGE: &str = "No se encontraron registros para los filtros seleccionados.";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChartBackend {
    /// Static charts drawn as inline SVG.
    #[default]
    Svg,
    /// Interactive plotly.js figures.
    Plotly,
}

impl ChartBackend {
    pub fn renderer(&self) -> Box<dyn ChartRenderer> {
        match self {
            ChartBackend::Svg => Box::new(svg::SvgRenderer::default()),
            ChartBackend::Plotly => Box::new(plotly::PlotlyRenderer),
        }
    }
}

/// Draws the three dashboard charts. `id` is unique within the page.
pub trait ChartRenderer {
    /// Suffix appended to section headings, e.g. "Plotly".
    fn name(&self) -> &'static str;

    /// Extra markup for the document head.
    fn head(&self) -> String {
        String::new()
    }

    fn bar_chart(&self, id: &str, counts: &YearTypeCounts) -> Result<String>;
    fn pie_chart(&self, id: &str, counts: &ProvinceCounts) -> Result<String>;
    fn line_chart(&self, id: &str, counts: &YearProvinceCounts) -> Result<String>;
}

/// What one page shows: a title and the pipeline result for the current
/// selection.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub title: String,
    pub output: PipelineOutput,
    pub generated_at: DateTime<Local>,
}

impl DashboardView {
    pub fn new(title: impl Into<String>, output: PipelineOutput) -> Self {
        Self {
            title: title.into(),
            output,
            generated_at: Local::now(),
        }
    }
}

/// Renders the full page with the given backend.
pub fn render_dashboard(view: &DashboardView, backend: ChartBackend) -> Result<String> {
    let renderer = backend.renderer();
    render_with(view, renderer.as_ref())
}

pub fn render_with(view: &DashboardView, renderer: &dyn ChartRenderer) -> Result<String> {
    let output = &view.output;
    let mut body = String::new();

    writeln!(body, "<h1>{}</h1>", escape_html(&view.title)).ok();
    writeln!(
        body,
        r#"<p class="selection">{}</p>"#,
        escape_html(&output.selection.to_string())
    )
    .ok();

    if output.is_empty() {
        writeln!(body, r#"<div class="warning">{}</div>"#, EMPTY_MESSAGE).ok();
    } else {
        writeln!(
            body,
            r#"<div class="success">{} registros encontrados:</div>"#,
            output.record_count()
        )
        .ok();
        body.push_str(&table::to_html_table(&output.filtered));

        let name = renderer.name();
        section(
            &mut body,
            &format!("Gráfico de Barras por Año y Tipo de Contratación ({})", name),
            &renderer.bar_chart("chart-bar", &output.by_year_and_type)?,
        );
        section(
            &mut body,
            &format!("Gráfico de Pastel por Provincia ({})", name),
            &renderer.pie_chart("chart-pie", &output.by_province)?,
        );
        section(
            &mut body,
            &format!("Gráfico de Líneas por Año y Provincia ({})", name),
            &renderer.line_chart("chart-line", &output.by_year_and_province)?,
        );
    }

    writeln!(
        body,
        r#"<footer>Generado: {}</footer>"#,
        view.generated_at.format("%Y-%m-%d %H:%M:%S")
    )
    .ok();

    Ok(format!(
        r##"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
  body {{ font-family: sans-serif; margin: 24px auto; max-width: 960px; color: #212529; }}
  .selection {{ color: #495057; }}
  .success {{ background: #d3f9d8; border-radius: 4px; padding: 8px 12px; }}
  .warning {{ background: #fff3bf; border-radius: 4px; padding: 8px 12px; }}
  table {{ border-collapse: collapse; font-size: 13px; margin: 12px 0; }}
  th, td {{ border: 1px solid #dee2e6; padding: 4px 8px; text-align: left; }}
  th {{ background: #f1f3f5; }}
  footer {{ color: #868e96; font-size: 12px; margin-top: 24px; }}
</style>
{head}
</head>
<body>
{body}</body>
</html>
"##,
        title = escape_html(&view.title),
        head = renderer.head(),
        body = body,
    ))
}

fn section(body: &mut String, heading: &str, chart: &str) {
    writeln!(body, "<h2>{}</h2>", escape_html(heading)).ok();
    body.push_str(chart);
    body.push('\n');
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
