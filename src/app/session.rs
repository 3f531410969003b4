//! Line-oriented dashboard session.
//!
//! Every accepted command recomputes the pipeline from the full dataset and
//! rewrites the page, the way a widget change reruns the whole dashboard.

use crate::core::pipeline::run_pipeline;
use crate::core::{ConfigProvider, Dataset, Storage};
use crate::domain::selection::{FilterSelection, ALL_LABEL};
use crate::render::{render_dashboard, table, ChartBackend, DashboardView};
use crate::utils::error::{DashError, Result};
use std::sync::Arc;

pub const HELP_TEXT: &str = "\
Commands:
  year=2020; province=AZUAY; type=Licitación   apply filters (omitted fields = Todos)
  reset                                        clear all filters
  backend svg|plotly                           switch chart backend
  options                                      list selectable values
  help                                         show this message
  quit                                         leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Filter(FilterSelection),
    Backend(ChartBackend),
    Options,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        match line {
            "quit" | "exit" | "salir" => return Ok(Command::Quit),
            "help" | "?" => return Ok(Command::Help),
            "options" | "opciones" => return Ok(Command::Options),
            "reset" => return Ok(Command::Filter(FilterSelection::all())),
            _ => {}
        }

        if let Some(name) = line.strip_prefix("backend") {
            let name = name.trim();
            return name
                .parse::<ChartBackend>()
                .map(Command::Backend)
                .map_err(|_| DashError::InvalidQuery {
                    query: line.to_string(),
                    reason: format!("unknown backend '{}', expected svg or plotly", name),
                });
        }

        FilterSelection::parse_query(line).map(Command::Filter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionReply {
    Rendered { summary: String, path: String },
    Text(String),
    Quit,
}

pub struct Session<S: Storage> {
    dataset: Arc<Dataset>,
    storage: S,
    title: String,
    output_path: String,
    filename: String,
    backend: ChartBackend,
    selection: FilterSelection,
}

impl<S: Storage> Session<S> {
    pub fn new<C: ConfigProvider>(dataset: Arc<Dataset>, storage: S, config: &C) -> Result<Self> {
        Ok(Self {
            dataset,
            storage,
            title: config.title().to_string(),
            output_path: config.output_path().to_string(),
            filename: config.output_filename().to_string(),
            backend: config.backend(),
            selection: config.selection()?,
        })
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn backend(&self) -> ChartBackend {
        self.backend
    }

    /// Runs the pipeline for the current state and rewrites the page.
    pub async fn render(&self) -> Result<SessionReply> {
        let output = run_pipeline(&self.dataset, &self.selection);
        let summary = table::summary(&output)?;

        let view = DashboardView::new(self.title.clone(), output);
        let html = render_dashboard(&view, self.backend)?;
        self.storage.write_file(&self.filename, html.as_bytes()).await?;

        Ok(SessionReply::Rendered {
            summary,
            path: format!("{}/{}", self.output_path, self.filename),
        })
    }

    pub async fn handle_line(&mut self, line: &str) -> Result<SessionReply> {
        match Command::parse(line)? {
            Command::Filter(selection) => {
                tracing::debug!("Selection changed to [{}]", selection);
                self.selection = selection;
                self.render().await
            }
            Command::Backend(backend) => {
                tracing::debug!("Backend changed to {}", backend);
                self.backend = backend;
                self.render().await
            }
            Command::Options => Ok(SessionReply::Text(self.options_text())),
            Command::Help => Ok(SessionReply::Text(HELP_TEXT.to_string())),
            Command::Quit => Ok(SessionReply::Quit),
        }
    }

    /// Selectable values per field, "Todos" first, like the dashboard's
    /// drop-downs.
    pub fn options_text(&self) -> String {
        fn line<T: ToString>(name: &str, values: Vec<T>) -> String {
            let mut labels = vec![ALL_LABEL.to_string()];
            labels.extend(values.iter().map(|v| v.to_string()));
            format!("{}: {}", name, labels.join(" | "))
        }

        [
            line("Año", self.dataset.year_options()),
            line("Provincia", self.dataset.province_options()),
            line("Tipo de Contratación", self.dataset.contract_type_options()),
        ]
        .join("\n")
    }
}
