use crate::adapters::synthetic::{
    SyntheticSource, DEFAULT_END_YEAR, DEFAULT_REPETITIONS, DEFAULT_START_YEAR,
};
use crate::core::ConfigProvider;
use crate::domain::selection::FilterSelection;
use crate::render::ChartBackend;
use crate::utils::error::{DashError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TITLE: &str = "Contrataciones Públicas";
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_FILENAME: &str = "dashboard.html";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub dashboard: DashboardSection,
    pub dataset: DatasetConfig,
    pub filters: FiltersConfig,
    pub render: RenderConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSection {
    pub title: String,
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub start_year: u16,
    pub end_year: u16,
    pub repetitions: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            repetitions: DEFAULT_REPETITIONS,
        }
    }
}

/// Filter labels as typed by the user; "Todos" or missing means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiltersConfig {
    pub year: Option<String>,
    pub province: Option<String>,
    pub contract_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub backend: ChartBackend,
    pub output_path: String,
    pub filename: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backend: ChartBackend::default(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            filename: DEFAULT_FILENAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl DashboardConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DashError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DASH_OUTPUT})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("dashboard.title", &self.dashboard.title)?;

        validation::validate_range("dataset.start_year", self.dataset.start_year, 1000, 9999)?;
        validation::validate_range("dataset.end_year", self.dataset.end_year, 1000, 9999)?;
        if self.dataset.end_year < self.dataset.start_year {
            return Err(DashError::InvalidConfigValueError {
                field: "dataset.end_year".to_string(),
                value: self.dataset.end_year.to_string(),
                reason: format!("must not be before start_year {}", self.dataset.start_year),
            });
        }
        validation::validate_positive_number("dataset.repetitions", self.dataset.repetitions, 1)?;

        validation::validate_path("render.output_path", &self.render.output_path)?;
        validation::validate_path("render.filename", &self.render.filename)?;
        validation::validate_file_extension("render.filename", &self.render.filename, &["html", "htm"])?;

        // 篩選條件的拼字錯誤在這裡就回報，而不是產生空結果
        self.selection()?;

        Ok(())
    }

    pub fn dataset_source(&self) -> SyntheticSource {
        SyntheticSource::new(
            self.dataset.start_year,
            self.dataset.end_year,
            self.dataset.repetitions,
        )
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for DashboardConfig {
    fn title(&self) -> &str {
        &self.dashboard.title
    }

    fn output_path(&self) -> &str {
        &self.render.output_path
    }

    fn output_filename(&self) -> &str {
        &self.render.filename
    }

    fn backend(&self) -> ChartBackend {
        self.render.backend
    }

    fn selection(&self) -> Result<FilterSelection> {
        FilterSelection::from_labels(
            self.filters.year.as_deref(),
            self.filters.province.as_deref(),
            self.filters.contract_type.as_deref(),
        )
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Province;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[dashboard]
title = "Contrataciones Azuay"

[dataset]
start_year = 2018
end_year = 2022
repetitions = 3

[filters]
year = "Todos"
province = "AZUAY"

[render]
backend = "plotly"
output_path = "./test-output"
filename = "azuay.html"

[monitoring]
enabled = true
"#;

        let config = DashboardConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.title(), "Contrataciones Azuay");
        assert_eq!(config.backend(), ChartBackend::Plotly);
        assert_eq!(config.output_filename(), "azuay.html");
        assert_eq!(config.dataset_source(), SyntheticSource::new(2018, 2022, 3));
        assert!(config.monitoring_enabled());

        let selection = config.selection().unwrap();
        assert_eq!(selection.year, None);
        assert_eq!(selection.province, Some(Province::Azuay));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();

        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.title(), DEFAULT_TITLE);
        assert_eq!(config.output_path(), DEFAULT_OUTPUT_PATH);
        assert_eq!(config.backend(), ChartBackend::Svg);
        assert!(!config.monitoring_enabled());
        assert!(config.selection().unwrap().is_unconstrained());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PROCUREMENT_DASH_TEST_OUTPUT", "/tmp/dash-test");

        let toml_content = r#"
[render]
output_path = "${PROCUREMENT_DASH_TEST_OUTPUT}"
filename = "${PROCUREMENT_DASH_UNSET_VAR}.html"
"#;

        let config = DashboardConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_path(), "/tmp/dash-test");
        assert_eq!(config.output_filename(), "${PROCUREMENT_DASH_UNSET_VAR}.html");

        std::env::remove_var("PROCUREMENT_DASH_TEST_OUTPUT");
    }

    #[test]
    fn test_config_validation_catches_typos_and_ranges() {
        let typo = DashboardConfig::from_toml_str("[filters]\nprovince = \"Azuay\"\n").unwrap();
        assert!(matches!(
            typo.validate(),
            Err(DashError::UnknownProvince { .. })
        ));

        let inverted =
            DashboardConfig::from_toml_str("[dataset]\nstart_year = 2024\nend_year = 2015\n").unwrap();
        assert!(inverted.validate().is_err());

        let bad_file = DashboardConfig::from_toml_str("[render]\nfilename = \"out.png\"\n").unwrap();
        assert!(bad_file.validate().is_err());

        let no_rows = DashboardConfig::from_toml_str("[dataset]\nrepetitions = 0\n").unwrap();
        assert!(no_rows.validate().is_err());
    }

    #[test]
    fn test_unknown_backend_is_parse_error() {
        let result = DashboardConfig::from_toml_str("[render]\nbackend = \"matplotlib\"\n");
        assert!(matches!(
            result,
            Err(DashError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[dashboard]\ntitle = \"Desde archivo\"\n")
            .unwrap();

        let config = DashboardConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.title(), "Desde archivo");
    }
}
