use crate::config::toml_config::{DashboardConfig, MonitoringConfig};
use crate::render::ChartBackend;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "procurement-dash")]
#[command(about = "Filter public procurement records and render them as a chart dashboard")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Year to show (four digits, or "Todos")
    #[arg(long)]
    pub year: Option<String>,

    /// Province to show, e.g. AZUAY (or "Todos")
    #[arg(long)]
    pub province: Option<String>,

    /// Contract type to show, e.g. "Menor Cuantía" (or "Todos")
    #[arg(long)]
    pub contract_type: Option<String>,

    /// Chart backend
    #[arg(long, value_enum)]
    pub backend: Option<ChartBackend>,

    /// Directory the dashboard page is written to
    #[arg(long)]
    pub output_path: Option<String>,

    /// Read filter queries from stdin and re-render after each one
    #[arg(short, long)]
    pub interactive: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Log process CPU and memory usage")]
    pub monitor: bool,
}

impl CliConfig {
    /// 載入 TOML (若有指定)，再套用命令列覆蓋設定
    pub fn resolve(&self) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                DashboardConfig::from_file(path)?
            }
            None => DashboardConfig::default(),
        };

        if let Some(year) = &self.year {
            config.filters.year = Some(year.clone());
        }
        if let Some(province) = &self.province {
            config.filters.province = Some(province.clone());
        }
        if let Some(contract_type) = &self.contract_type {
            config.filters.contract_type = Some(contract_type.clone());
        }
        if let Some(backend) = self.backend {
            config.render.backend = backend;
        }
        if let Some(output_path) = &self.output_path {
            config.render.output_path = output_path.clone();
        }
        if self.monitor {
            config.monitoring = Some(MonitoringConfig { enabled: true });
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;
    use crate::domain::model::ContractType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_arguments() {
        let cli = CliConfig::parse_from([
            "procurement-dash",
            "--year",
            "2020",
            "--contract-type",
            "Menor Cuantía",
            "--backend",
            "plotly",
            "--verbose",
        ]);

        assert_eq!(cli.year.as_deref(), Some("2020"));
        assert_eq!(cli.backend, Some(ChartBackend::Plotly));
        assert!(cli.verbose);
        assert!(!cli.interactive);

        let config = cli.resolve().unwrap();
        let selection = config.selection().unwrap();
        assert_eq!(selection.contract_type, Some(ContractType::MenorCuantia));
        assert_eq!(config.backend(), ChartBackend::Plotly);
    }

    #[test]
    fn test_cli_overrides_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(
                br#"
[filters]
year = "2018"
province = "LOJA"

[render]
backend = "plotly"
output_path = "./from-toml"
"#,
            )
            .unwrap();

        let cli = CliConfig {
            config: Some(temp_file.path().to_str().unwrap().to_string()),
            year: Some("Todos".to_string()),
            backend: Some(ChartBackend::Svg),
            monitor: true,
            ..Default::default()
        };

        let config = cli.resolve().unwrap();
        assert_eq!(config.filters.year.as_deref(), Some("Todos"));
        assert_eq!(config.filters.province.as_deref(), Some("LOJA"));
        assert_eq!(config.backend(), ChartBackend::Svg);
        assert_eq!(config.output_path(), "./from-toml");
        assert!(config.monitoring_enabled());
    }

    #[test]
    fn test_missing_config_file_is_io_error() {
        let cli = CliConfig {
            config: Some("/definitely/not/here.toml".to_string()),
            ..Default::default()
        };
        assert!(cli.resolve().is_err());
    }
}
