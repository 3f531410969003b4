use crate::domain::aggregates::PipelineOutput;
use crate::domain::model::Dataset;
use crate::domain::selection::FilterSelection;
use crate::render::ChartBackend;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Builds the in-memory dataset once at startup.
pub trait DatasetSource: Send + Sync {
    fn load(&self) -> Result<Dataset>;
}

pub trait ConfigProvider: Send + Sync {
    fn title(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_filename(&self) -> &str;
    fn backend(&self) -> ChartBackend;
    fn selection(&self) -> Result<FilterSelection>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Dataset>;
    async fn transform(&self, dataset: &Dataset) -> Result<PipelineOutput>;
    async fn load(&self, output: PipelineOutput) -> Result<String>;
}
