//! Interactive chart backend. Figures are serialized to JSON and drawn
//! client-side by plotly.js.

use crate::domain::aggregates::{ProvinceCounts, YearProvinceCounts, YearTypeCounts};
use crate::render::{ChartRenderer, BAR_TITLE, LINE_TITLE, PIE_TITLE};
use crate::utils::error::Result;
use serde_json::{json, Value};

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

#[derive(Debug, Default, Clone, Copy)]
pub struct PlotlyRenderer;

impl PlotlyRenderer {
    pub fn bar_figure(counts: &YearTypeCounts) -> Value {
        let traces: Vec<Value> = counts
            .contract_types()
            .into_iter()
            .map(|contract_type| {
                let (x, y): (Vec<String>, Vec<usize>) = counts
                    .series(contract_type)
                    .into_iter()
                    .map(|(year, count)| (year.to_string(), count))
                    .unzip();
                json!({
                    "type": "bar",
                    "name": contract_type.label(),
                    "x": x,
                    "y": y,
                })
            })
            .collect();

        json!({
            "data": traces,
            "layout": {
                "title": { "text": BAR_TITLE },
                "barmode": "group",
                "xaxis": { "title": { "text": "Año" }, "type": "category" },
                "yaxis": { "title": { "text": "Cantidad" } },
                "legend": { "title": { "text": "Tipo de Contratación" } },
            }
        })
    }

    pub fn pie_figure(counts: &ProvinceCounts) -> Value {
        let (labels, values): (Vec<&str>, Vec<usize>) = counts
            .ranked()
            .into_iter()
            .map(|(province, count)| (province.label(), count))
            .unzip();

        json!({
            "data": [{
                "type": "pie",
                "labels": labels,
                "values": values,
                "sort": false,
            }],
            "layout": {
                "title": { "text": PIE_TITLE },
            }
        })
    }

    pub fn line_figure(counts: &YearProvinceCounts) -> Value {
        let traces: Vec<Value> = counts
            .provinces()
            .into_iter()
            .map(|province| {
                let (x, y): (Vec<String>, Vec<usize>) = counts
                    .series(province)
                    .into_iter()
                    .map(|(year, count)| (year.to_string(), count))
                    .unzip();
                json!({
                    "type": "scatter",
                    "mode": "lines+markers",
                    "name": province.label(),
                    "x": x,
                    "y": y,
                })
            })
            .collect();

        json!({
            "data": traces,
            "layout": {
                "title": { "text": LINE_TITLE },
                "xaxis": { "title": { "text": "Año" }, "type": "category" },
                "yaxis": { "title": { "text": "Cantidad" } },
                "legend": { "title": { "text": "Provincia" } },
            }
        })
    }

    fn embed(id: &str, figure: &Value) -> Result<String> {
        // 避免 JSON 內容提前結束 <script>
        let data = serde_json::to_string(&figure["data"])?.replace("</", "<\\/");
        let layout = serde_json::to_string(&figure["layout"])?.replace("</", "<\\/");

        Ok(format!(
            r#"<div id="{id}" style="width:100%;height:450px;"></div>
<script>Plotly.newPlot("{id}", {data}, {layout}, {{"responsive": true}});</script>"#,
            id = id,
            data = data,
            layout = layout
        ))
    }
}

impl ChartRenderer for PlotlyRenderer {
    fn name(&self) -> &'static str {
        "Plotly"
    }

    fn head(&self) -> String {
        format!(
            r#"<script src="{}" charset="utf-8"></script>"#,
            PLOTLY_CDN
        )
    }

    fn bar_chart(&self, id: &str, counts: &YearTypeCounts) -> Result<String> {
        Self::embed(id, &Self::bar_figure(counts))
    }

    fn pie_chart(&self, id: &str, counts: &ProvinceCounts) -> Result<String> {
        Self::embed(id, &Self::pie_figure(counts))
    }

    fn line_chart(&self, id: &str, counts: &YearProvinceCounts) -> Result<String> {
        Self::embed(id, &Self::line_figure(counts))
    }
}
