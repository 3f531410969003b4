use crate::core::Pipeline;
use crate::render::table;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct DashboardEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> DashboardEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting dashboard build...");

        // Extract: 建立資料集
        let dataset = self.pipeline.extract().await?;
        tracing::info!("📥 Dataset ready with {} records", dataset.len());
        self.monitor.log_stats("Extract");

        // Transform: 篩選與彙總
        let output = self.pipeline.transform(&dataset).await?;
        if output.is_empty() {
            tracing::warn!("⚠️ No records match [{}]", output.selection);
        } else {
            tracing::info!(
                "🔎 {} records match, {} year/type groups, {} provinces",
                output.record_count(),
                output.by_year_and_type.len(),
                output.by_province.len()
            );
        }
        println!("{}", table::summary(&output)?);
        self.monitor.log_stats("Transform");

        // Load: 繪製圖表並寫出
        let output_path = self.pipeline.load(output).await?;
        tracing::info!("📁 Dashboard saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
