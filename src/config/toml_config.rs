use crate::adapters::catalog::CatalogSource;
use crate::domain::model::LaundryStats;
use crate::utils::error::{CalcError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_EXPORT_PATH: &str = "./output";

/// 使用者設定檔（所有區塊皆為選填）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub habits: Option<HabitsConfig>,
    pub storage: Option<StorageConfig>,
    pub catalog: Option<CatalogConfig>,
    pub export: Option<ExportConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitsConfig {
    pub loads_per_week: Option<u32>,
    pub time_per_load: Option<f64>,
    pub water_per_load: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub directory: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub output_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl ProfileConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CalcError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CalcError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GECO_DATA_DIR})，未設定者保留原文
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// Habits from the profile, filling missing fields with the defaults.
    pub fn laundry_stats(&self) -> Option<LaundryStats> {
        self.habits.as_ref().map(|habits| {
            let defaults = LaundryStats::default();
            LaundryStats {
                loads_per_week: habits.loads_per_week.unwrap_or(defaults.loads_per_week),
                time_per_load: habits.time_per_load.unwrap_or(defaults.time_per_load),
                water_per_load: habits.water_per_load.unwrap_or(defaults.water_per_load),
            }
        })
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(
            self.storage
                .as_ref()
                .map(|s| s.data_dir.as_str())
                .unwrap_or(DEFAULT_DATA_DIR),
        )
    }

    pub fn export_path(&self) -> PathBuf {
        PathBuf::from(
            self.export
                .as_ref()
                .map(|e| e.output_path.as_str())
                .unwrap_or(DEFAULT_EXPORT_PATH),
        )
    }

    /// 遠端網址優先於本機目錄
    pub fn catalog_source(&self) -> CatalogSource {
        match &self.catalog {
            Some(CatalogConfig {
                base_url: Some(url),
                ..
            }) => CatalogSource::Remote(url.clone()),
            Some(CatalogConfig {
                directory: Some(dir),
                ..
            }) => CatalogSource::Directory(PathBuf::from(dir)),
            _ => CatalogSource::Builtin,
        }
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.json)
            .unwrap_or(false)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(stats) = self.laundry_stats() {
            stats.validate()?;
        }

        if let Some(storage) = &self.storage {
            crate::utils::validation::validate_path("storage.data_dir", &storage.data_dir)?;
        }

        if let Some(export) = &self.export {
            crate::utils::validation::validate_path("export.output_path", &export.output_path)?;
        }

        if let Some(catalog) = &self.catalog {
            if let Some(url) = &catalog.base_url {
                crate::utils::validation::validate_url("catalog.base_url", url)?;
            }
            if let Some(dir) = &catalog.directory {
                crate::utils::validation::validate_path("catalog.directory", dir)?;
            }
        }

        if let Some(level) = self.log_level() {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level) {
                return Err(CalcError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        Ok(())
    }
}

impl Validate for ProfileConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
