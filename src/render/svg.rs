//! Static chart backend. Charts are drawn server-side as inline SVG so the
//! page needs no script.

use crate::domain::aggregates::{ProvinceCounts, YearProvinceCounts, YearTypeCounts};
use crate::render::{escape_html, ChartRenderer, BAR_TITLE, LINE_TITLE, PIE_TITLE};
use crate::utils::error::Result;
use std::f64::consts::PI;
use std::fmt::Write as FmtWrite;

const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

// ── Layout ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct SvgLayout {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
}

impl Default for SvgLayout {
    fn default() -> Self {
        Self {
            width: 760.0,
            height: 420.0,
            margin_left: 60.0,
            margin_right: 220.0,
            margin_top: 40.0,
            margin_bottom: 50.0,
        }
    }
}

impl SvgLayout {
    fn plot_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }

    fn plot_height(&self) -> f64 {
        self.height - self.margin_top - self.margin_bottom
    }

    fn baseline(&self) -> f64 {
        self.height - self.margin_bottom
    }

    /// Pixel y for a count given the axis maximum.
    fn y_for(&self, value: usize, axis_max: usize) -> f64 {
        self.baseline() - self.plot_height() * value as f64 / axis_max.max(1) as f64
    }
}

#[derive(Debug, Default)]
pub struct SvgRenderer {
    layout: SvgLayout,
}

impl SvgRenderer {
    fn open(&self, id: &str, title: &str) -> String {
        let l = &self.layout;
        let mut svg = String::new();
        writeln!(
            svg,
            r#"<svg id="{id}" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
            id = id,
            w = l.width,
            h = l.height
        )
        .ok();
        writeln!(
            svg,
            r#"<text x="{x:.1}" y="22" font-size="15" text-anchor="middle">{t}</text>"#,
            x = l.margin_left + l.plot_width() / 2.0,
            t = escape_html(title)
        )
        .ok();
        svg
    }

    /// Axes, integer y ticks and axis labels.
    fn axes(&self, svg: &mut String, axis_max: usize, x_label: &str, y_label: &str) {
        let l = &self.layout;
        let x0 = l.margin_left;
        let x1 = l.margin_left + l.plot_width();
        let base = l.baseline();

        writeln!(
            svg,
            r##"<line x1="{x0}" y1="{top}" x2="{x0}" y2="{base}" stroke="#333"/><line x1="{x0}" y1="{base}" x2="{x1}" y2="{base}" stroke="#333"/>"##,
            x0 = x0,
            x1 = x1,
            top = l.margin_top,
            base = base
        )
        .ok();

        for tick in y_ticks(axis_max) {
            let y = l.y_for(tick, axis_max);
            writeln!(
                svg,
                r##"<line x1="{a}" y1="{y:.1}" x2="{x0}" y2="{y:.1}" stroke="#333"/><text x="{t}" y="{ty:.1}" text-anchor="end">{tick}</text>"##,
                a = x0 - 4.0,
                x0 = x0,
                y = y,
                t = x0 - 6.0,
                ty = y + 4.0,
                tick = tick
            )
            .ok();
        }

        writeln!(
            svg,
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="middle">{label}</text>"#,
            x = x0 + l.plot_width() / 2.0,
            y = l.height - 10.0,
            label = escape_html(x_label)
        )
        .ok();
        writeln!(
            svg,
            r#"<text transform="translate(16,{y:.1}) rotate(-90)" text-anchor="middle">{label}</text>"#,
            y = l.margin_top + l.plot_height() / 2.0,
            label = escape_html(y_label)
        )
        .ok();
    }

    fn legend(&self, svg: &mut String, title: &str, entries: &[(String, &str)]) {
        let x = self.layout.width - self.layout.margin_right + 16.0;
        let mut y = self.layout.margin_top;

        writeln!(
            svg,
            r#"<text x="{x}" y="{y}" font-weight="bold">{t}</text>"#,
            x = x,
            y = y,
            t = escape_html(title)
        )
        .ok();
        for (label, color) in entries {
            y += 18.0;
            writeln!(
                svg,
                r#"<rect x="{x}" y="{ry}" width="12" height="12" fill="{c}"/><text x="{tx}" y="{y}">{l}</text>"#,
                x = x,
                ry = y - 10.0,
                c = color,
                tx = x + 18.0,
                y = y,
                l = escape_html(label)
            )
            .ok();
        }
    }
}

impl ChartRenderer for SvgRenderer {
    fn name(&self) -> &'static str {
        "SVG"
    }

    fn bar_chart(&self, id: &str, counts: &YearTypeCounts) -> Result<String> {
        let l = &self.layout;
        let years = counts.years();
        let types = counts.contract_types();
        let axis_max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0);

        let mut svg = self.open(id, BAR_TITLE);
        self.axes(&mut svg, axis_max, "Año", "Número de Contrataciones");

        let group_width = l.plot_width() / years.len().max(1) as f64;
        let bar_width = group_width * 0.8 / types.len().max(1) as f64;

        for (gi, year) in years.iter().enumerate() {
            let group_x = l.margin_left + gi as f64 * group_width;
            for (ti, contract_type) in types.iter().enumerate() {
                // 該年度沒有此類型就不畫
                let Some(count) = counts.get(&(*year, *contract_type)) else {
                    continue;
                };
                let y = l.y_for(count, axis_max);
                writeln!(
                    svg,
                    r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{c}"><title>{t}: {n}</title></rect>"#,
                    x = group_x + group_width * 0.1 + ti as f64 * bar_width,
                    y = y,
                    w = bar_width,
                    h = l.baseline() - y,
                    c = PALETTE[ti % PALETTE.len()],
                    t = escape_html(contract_type.label()),
                    n = count
                )
                .ok();
            }
            writeln!(
                svg,
                r#"<text x="{x:.1}" y="{y:.1}" text-anchor="middle">{year}</text>"#,
                x = group_x + group_width / 2.0,
                y = l.baseline() + 16.0,
                year = year
            )
            .ok();
        }

        let entries: Vec<(String, &str)> = types
            .iter()
            .enumerate()
            .map(|(i, t)| (t.label().to_string(), PALETTE[i % PALETTE.len()]))
            .collect();
        self.legend(&mut svg, "Tipo de Contratación", &entries);

        svg.push_str("</svg>");
        Ok(svg)
    }

    fn pie_chart(&self, id: &str, counts: &ProvinceCounts) -> Result<String> {
        let l = &self.layout;
        let cx = l.margin_left + l.plot_width() / 2.0;
        let cy = l.margin_top + l.plot_height() / 2.0 + 10.0;
        let radius = (l.plot_height() / 2.0).min(l.plot_width() / 2.0) - 10.0;
        let total = counts.total();

        let mut svg = self.open(id, PIE_TITLE);
        let ranked = counts.ranked();

        // 從 90 度開始逆時針繪製
        let mut start = PI / 2.0;
        for (i, (province, count)) in ranked.iter().enumerate() {
            let fraction = *count as f64 / total.max(1) as f64;
            let sweep = fraction * 2.0 * PI;
            let end = start + sweep;
            let color = PALETTE[i % PALETTE.len()];

            if ranked.len() == 1 {
                writeln!(
                    svg,
                    r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="{c}"/>"#,
                    cx = cx,
                    cy = cy,
                    r = radius,
                    c = color
                )
                .ok();
            } else {
                let (x0, y0) = polar(cx, cy, radius, start);
                let (x1, y1) = polar(cx, cy, radius, end);
                writeln!(
                    svg,
                    r##"<path d="M {cx:.1} {cy:.1} L {x0:.2} {y0:.2} A {r:.1} {r:.1} 0 {large} 0 {x1:.2} {y1:.2} Z" fill="{c}" stroke="#fff"/>"##,
                    cx = cx,
                    cy = cy,
                    x0 = x0,
                    y0 = y0,
                    r = radius,
                    large = u8::from(sweep > PI),
                    x1 = x1,
                    y1 = y1,
                    c = color
                )
                .ok();
            }

            let middle = start + sweep / 2.0;
            let (px, py) = polar(cx, cy, radius * 0.6, middle);
            let (lx, ly) = polar(cx, cy, radius * 1.1, middle);
            writeln!(
                svg,
                r#"<text x="{px:.1}" y="{py:.1}" text-anchor="middle">{pct:.1}%</text><text x="{lx:.1}" y="{ly:.1}" text-anchor="{anchor}">{label}</text>"#,
                px = px,
                py = py + 4.0,
                pct = counts.percentage(*province),
                lx = lx,
                ly = ly + 4.0,
                anchor = if middle.cos() < 0.0 { "end" } else { "start" },
                label = escape_html(province.label())
            )
            .ok();

            start = end;
        }

        svg.push_str("</svg>");
        Ok(svg)
    }

    fn line_chart(&self, id: &str, counts: &YearProvinceCounts) -> Result<String> {
        let l = &self.layout;
        let years = counts.years();
        let provinces = counts.provinces();
        let axis_max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0);

        let mut svg = self.open(id, LINE_TITLE);
        self.axes(&mut svg, axis_max, "Año", "Cantidad de Contrataciones");

        let step = l.plot_width() / years.len().max(1) as f64;
        let x_for = |index: usize| l.margin_left + step * (index as f64 + 0.5);

        for (i, year) in years.iter().enumerate() {
            writeln!(
                svg,
                r#"<text x="{x:.1}" y="{y:.1}" text-anchor="middle">{year}</text>"#,
                x = x_for(i),
                y = l.baseline() + 16.0,
                year = year
            )
            .ok();
        }

        for (pi, province) in provinces.iter().enumerate() {
            let color = PALETTE[pi % PALETTE.len()];
            let points: Vec<(f64, f64, usize)> = counts
                .series(*province)
                .iter()
                .map(|(year, count)| {
                    let index = years.iter().position(|y| y == year).unwrap_or(0);
                    (x_for(index), l.y_for(*count, axis_max), *count)
                })
                .collect();

            let path = points
                .iter()
                .map(|(x, y, _)| format!("{:.1},{:.1}", x, y))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(
                svg,
                r#"<polyline points="{p}" fill="none" stroke="{c}" stroke-width="2"/>"#,
                p = path,
                c = color
            )
            .ok();
            for (x, y, count) in &points {
                writeln!(
                    svg,
                    r#"<circle cx="{x:.1}" cy="{y:.1}" r="4" fill="{c}"><title>{p}: {n}</title></circle>"#,
                    x = x,
                    y = y,
                    c = color,
                    p = escape_html(province.label()),
                    n = count
                )
                .ok();
            }
        }

        let entries: Vec<(String, &str)> = provinces
            .iter()
            .enumerate()
            .map(|(i, p)| (p.label().to_string(), PALETTE[i % PALETTE.len()]))
            .collect();
        self.legend(&mut svg, "Provincia", &entries);

        svg.push_str("</svg>");
        Ok(svg)
    }
}

/// Point on a circle; angles are counterclockwise from the positive x axis.
fn polar(cx: f64, cy: f64, radius: f64, angle: f64) -> (f64, f64) {
    (cx + radius * angle.cos(), cy - radius * angle.sin())
}

/// Integer ticks from 0 to the axis maximum, at most six of them.
fn y_ticks(axis_max: usize) -> Vec<usize> {
    let max = axis_max.max(1);
    let step = max.div_ceil(5).max(1);
    (0..=max).step_by(step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate::{
        aggregate_by_province, aggregate_by_year_and_province, aggregate_by_year_and_type,
    };
    use crate::domain::model::{ContractType, Province, Record};

    fn records() -> Vec<Record> {
        vec![
            Record::new("2020".parse().unwrap(), Province::Azuay, ContractType::Licitacion, "a"),
            Record::new("2020".parse().unwrap(), Province::Loja, ContractType::Licitacion, "b"),
            Record::new("2021".parse().unwrap(), Province::Azuay, ContractType::MenorCuantia, "c"),
        ]
    }

    #[test]
    fn test_bar_chart_draws_only_present_pairs() {
        let svg = SvgRenderer::default()
            .bar_chart("bar", &aggregate_by_year_and_type(&records()))
            .unwrap();

        assert!(svg.starts_with(r#"<svg id="bar""#));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<rect x=").count() - 2, 2);
        assert!(svg.contains("<title>Licitación: 2</title>"));
    }

    #[test]
    fn test_pie_chart_labels_percentages() {
        let svg = SvgRenderer::default()
            .pie_chart("pie", &aggregate_by_province(&records()))
            .unwrap();

        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("66.7%"));
        assert!(svg.contains("33.3%"));
    }

    #[test]
    fn test_single_slice_pie_is_a_circle() {
        let svg = SvgRenderer::default()
            .pie_chart("pie", &aggregate_by_province(&records()[..1]))
            .unwrap();

        assert!(svg.contains("<circle"));
        assert!(svg.contains("100.0%"));
    }

    #[test]
    fn test_line_chart_has_one_marker_per_cell() {
        let all = [Province::Azuay, Province::Guayas, Province::Loja];
        let counts = aggregate_by_year_and_province(&records(), &all);
        let svg = SvgRenderer::default().line_chart("line", &counts).unwrap();

        assert_eq!(svg.matches("<polyline").count(), 3);
        assert_eq!(svg.matches("<circle").count(), counts.len());
    }

    #[test]
    fn test_y_ticks() {
        assert_eq!(y_ticks(0), vec![0, 1]);
        assert_eq!(y_ticks(4), vec![0, 1, 2, 3, 4]);
        assert_eq!(y_ticks(10), vec![0, 2, 4, 6, 8, 10]);
    }
}
