use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid year '{value}': expected exactly four digits")]
    InvalidYear { value: String },

    #[error("Unknown province '{value}'")]
    UnknownProvince { value: String },

    #[error("Unknown contract type '{value}'")]
    UnknownContractType { value: String },

    #[error("Invalid filter query '{query}': {reason}")]
    InvalidQuery { query: String, reason: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Rendering error: {message}")]
    RenderError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Rendering,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DashError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashError::InvalidYear { .. }
            | DashError::UnknownProvince { .. }
            | DashError::UnknownContractType { .. }
            | DashError::InvalidQuery { .. } => ErrorCategory::Input,
            DashError::ConfigValidationError { .. } | DashError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            DashError::RenderError { .. }
            | DashError::CsvError(_)
            | DashError::SerializationError(_) => ErrorCategory::Rendering,
            DashError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 輸入錯誤可以重新選擇篩選條件
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Rendering => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DashError::InvalidYear { .. } => {
                "Use a four digit year such as 2020, or 'Todos' for all years".to_string()
            }
            DashError::UnknownProvince { .. } => format!(
                "Valid provinces are: {}",
                crate::domain::model::Province::labels().join(", ")
            ),
            DashError::UnknownContractType { .. } => format!(
                "Valid contract types are: {}",
                crate::domain::model::ContractType::labels().join(", ")
            ),
            DashError::InvalidQuery { .. } => {
                "Write filters as 'year=2020; province=AZUAY; type=Licitación'".to_string()
            }
            DashError::ConfigValidationError { .. } | DashError::InvalidConfigValueError { .. } => {
                "Check the configuration file and command line arguments".to_string()
            }
            DashError::RenderError { .. }
            | DashError::CsvError(_)
            | DashError::SerializationError(_) => {
                "Try the other chart backend with --backend".to_string()
            }
            DashError::IoError(_) => {
                "Make sure the output directory exists and is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Invalid filter: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Rendering => format!("Could not render the dashboard: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashError>;
