use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Catalog request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error on {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("Catalog error: {message}")]
    CatalogError { message: String },

    #[error("Product not found: {id}")]
    ProductNotFound { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    Network,
    Storage,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CalcError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CalcError::ConfigError { .. }
            | CalcError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CalcError::ValidationError { .. } | CalcError::ProductNotFound { .. } => {
                ErrorCategory::Validation
            }
            CalcError::HttpError(_) | CalcError::CatalogError { .. } => ErrorCategory::Network,
            CalcError::IoError(_) | CalcError::ZipError(_) => ErrorCategory::Storage,
            CalcError::CsvError(_) | CalcError::SerializationError(_) => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "檢查設定檔與命令列參數是否正確",
            ErrorCategory::Validation => "確認產品價格大於 0，且用量與頻率至少為 1",
            ErrorCategory::Network => "檢查目錄網址是否可連線，或改用內建產品目錄",
            ErrorCategory::Storage => "檢查資料目錄是否存在且具有寫入權限",
            ErrorCategory::Data => "檢查 CSV 或 JSON 檔案格式",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CalcError::ValidationError { field, message } => {
                format!("Invalid {}: {}", field, message)
            }
            CalcError::ProductNotFound { id } => format!("No product with id {}", id),
            other => other.to_string(),
        }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        CalcError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
