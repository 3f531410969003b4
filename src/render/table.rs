use crate::domain::aggregates::PipelineOutput;
use crate::domain::model::Record;
use crate::render::{escape_html, EMPTY_MESSAGE};
use crate::utils::error::{DashError, Result};
use std::fmt::Write as FmtWrite;

const HEADERS: [&str; 4] = ["Año", "Provincia", "Tipo de Contratación", "Descripción"];

/// Tab separated rendering of the filtered rows for terminal display.
pub fn to_tsv(records: &[Record]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(Vec::new());

    // 空結果也輸出標題列
    writer.write_record(HEADERS)?;
    for record in records {
        writer.serialize(record)?;
    }

    let bytes = writer.into_inner().map_err(|e| DashError::RenderError {
        message: format!("Failed to flush table: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| DashError::RenderError {
        message: format!("Table is not valid UTF-8: {}", e),
    })
}

/// Terminal view of one pipeline run: the match count followed by the rows,
/// or the "no records" notice.
pub fn summary(output: &PipelineOutput) -> Result<String> {
    if output.is_empty() {
        return Ok(format!("⚠️ {}", EMPTY_MESSAGE));
    }
    Ok(format!(
        "✅ {} registros encontrados:\n{}",
        output.record_count(),
        to_tsv(&output.filtered)?
    ))
}

pub fn to_html_table(records: &[Record]) -> String {
    let mut html = String::from("<table>\n<thead><tr><th></th>");
    for header in HEADERS {
        write!(html, "<th>{}</th>", escape_html(header)).ok();
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for (index, record) in records.iter().enumerate() {
        writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            index,
            record.year,
            escape_html(record.province.label()),
            escape_html(record.contract_type.label()),
            escape_html(&record.description)
        )
        .ok();
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ContractType, Province};

    fn records() -> Vec<Record> {
        vec![
            Record::new(
                "2020".parse().unwrap(),
                Province::Manabi,
                ContractType::SubastaInversa,
                "Adquisición de equipos informáticos",
            ),
            Record::new(
                "2021".parse().unwrap(),
                Province::Loja,
                ContractType::Licitacion,
                "Servicio de limpieza",
            ),
        ]
    }

    #[test]
    fn test_tsv_has_header_and_labels() {
        let tsv = to_tsv(&records()).unwrap();
        let lines: Vec<&str> = tsv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Año\tProvincia\tTipo de Contratación\tDescripción");
        assert_eq!(
            lines[1],
            "2020\tMANABÍ\tSubasta Inversa Electrónica\tAdquisición de equipos informáticos"
        );
        assert_eq!(lines[2], "2021\tLOJA\tLicitación\tServicio de limpieza");
    }

    #[test]
    fn test_tsv_of_empty_table_is_header_only() {
        let tsv = to_tsv(&[]).unwrap();
        assert_eq!(tsv.lines().count(), 1);
    }

    #[test]
    fn test_summary_reports_count_or_empty_notice() {
        let dataset = crate::domain::model::Dataset::new(records());
        let all = crate::core::pipeline::run_pipeline(
            &dataset,
            &crate::domain::selection::FilterSelection::all(),
        );
        let text = summary(&all).unwrap();
        assert!(text.starts_with("✅ 2 registros encontrados:\n"));
        assert!(text.contains("LOJA"));

        let none = crate::core::pipeline::run_pipeline(
            &dataset,
            &crate::domain::selection::FilterSelection::all().with_year("1999".parse().unwrap()),
        );
        assert!(summary(&none).unwrap().contains(EMPTY_MESSAGE));
    }

    #[test]
    fn test_html_table_rows() {
        let html = to_html_table(&records());
        assert_eq!(html.matches("<tr>").count(), 3);
        assert!(html.contains("<td>MANABÍ</td>"));
    }
}
