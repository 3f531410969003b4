use crate::core::pipeline::run_pipeline;
use crate::core::{ConfigProvider, Dataset, DatasetSource, Pipeline, PipelineOutput, Storage};
use crate::render::{render_dashboard, DashboardView};
use crate::utils::error::Result;

/// Builds the dataset, runs the filter/aggregate pipeline for the configured
/// selection and writes the rendered page through `Storage`.
pub struct DashboardPipeline<S: Storage, C: ConfigProvider, D: DatasetSource> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) source: D,
}

impl<S: Storage, C: ConfigProvider, D: DatasetSource> DashboardPipeline<S, C, D> {
    pub fn new(storage: S, config: C, source: D) -> Self {
        Self {
            storage,
            config,
            source,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, D: DatasetSource> Pipeline for DashboardPipeline<S, C, D> {
    async fn extract(&self) -> Result<Dataset> {
        let dataset = self.source.load()?;
        tracing::debug!(
            "Dataset has {} records across {} provinces",
            dataset.len(),
            dataset.all_provinces().len()
        );
        Ok(dataset)
    }

    async fn transform(&self, dataset: &Dataset) -> Result<PipelineOutput> {
        let selection = self.config.selection()?;
        tracing::info!("🔎 Applying filters [{}]", selection);
        Ok(run_pipeline(dataset, &selection))
    }

    async fn load(&self, output: PipelineOutput) -> Result<String> {
        let backend = self.config.backend();
        let view = DashboardView::new(self.config.title(), output);

        tracing::debug!("Rendering dashboard with {} backend", backend);
        let html = render_dashboard(&view, backend)?;

        let filename = self.config.output_filename();
        self.storage.write_file(filename, html.as_bytes()).await?;

        Ok(format!("{}/{}", self.config.output_path(), filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SyntheticSource;
    use crate::config::DashboardConfig;
    use crate::domain::model::Province;
    use crate::render::ChartBackend;
    use crate::utils::error::DashError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                DashError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn config(toml: &str) -> DashboardConfig {
        DashboardConfig::from_toml_str(toml).unwrap()
    }

    #[tokio::test]
    async fn test_extract_builds_synthetic_dataset() {
        let pipeline = DashboardPipeline::new(
            MockStorage::new(),
            DashboardConfig::default(),
            SyntheticSource::default(),
        );

        let dataset = pipeline.extract().await.unwrap();
        assert_eq!(dataset.len(), 50);
    }

    #[tokio::test]
    async fn test_transform_applies_configured_filters() {
        let pipeline = DashboardPipeline::new(
            MockStorage::new(),
            config("[filters]\nprovince = \"LOJA\"\n"),
            SyntheticSource::default(),
        );

        let dataset = pipeline.extract().await.unwrap();
        let output = pipeline.transform(&dataset).await.unwrap();

        assert_eq!(output.record_count(), 10);
        assert!(output.filtered.iter().all(|r| r.province == Province::Loja));
        assert_eq!(output.by_province.len(), 1);
        // LOJA 只出現在 2018 與 2023，各年補齊五個省份
        assert_eq!(output.by_year_and_province.len(), 2 * 5);
    }

    #[tokio::test]
    async fn test_transform_rejects_unknown_labels() {
        let pipeline = DashboardPipeline::new(
            MockStorage::new(),
            config("[filters]\ncontract_type = \"Subasta\"\n"),
            SyntheticSource::default(),
        );

        let dataset = pipeline.extract().await.unwrap();
        assert!(matches!(
            pipeline.transform(&dataset).await,
            Err(DashError::UnknownContractType { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_writes_page_for_selected_backend() {
        let storage = MockStorage::new();
        let pipeline = DashboardPipeline::new(
            storage.clone(),
            config("[render]\nbackend = \"plotly\"\noutput_path = \"out\"\nfilename = \"page.html\"\n"),
            SyntheticSource::default(),
        );

        let dataset = pipeline.extract().await.unwrap();
        let output = pipeline.transform(&dataset).await.unwrap();
        let path = pipeline.load(output).await.unwrap();

        assert_eq!(path, "out/page.html");
        let page = String::from_utf8(storage.get_file("page.html").await.unwrap()).unwrap();
        assert!(page.contains("50 registros encontrados:"));
        assert!(page.contains("Plotly.newPlot"));
        assert_eq!(pipeline.config.backend(), ChartBackend::Plotly);
    }
}
