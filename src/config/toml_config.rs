use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub report: ReportConfig,
    pub source: SourceConfig,
    pub transform: Option<TransformConfig>,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: String,
    pub payout_column: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    pub period: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REPORT_PATH})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_path("source.path", &self.source.path)?;
        crate::utils::validation::validate_csv_extension("source.path", &self.source.path)?;
        crate::utils::validation::validate_path("load.output_path", &self.load.output_path)?;
        crate::utils::validation::validate_output_formats(
            "load.output_formats",
            &self.load.output_formats,
        )?;

        if let Some(column) = &self.source.payout_column {
            crate::utils::validation::validate_non_empty_string("source.payout_column", column)?;
        }

        if let Some(transform) = &self.transform {
            if let Some(period) = &transform.period {
                crate::utils::validation::validate_period("transform.period", period)?;
            }
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn compression_enabled(&self) -> bool {
        self.load
            .compression
            .as_ref()
            .map(|c| c.enabled)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn source_path(&self) -> &str {
        &self.source.path
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn payout_column(&self) -> &str {
        self.source.payout_column.as_deref().unwrap_or("payout")
    }

    fn period(&self) -> &str {
        self.transform
            .as_ref()
            .and_then(|t| t.period.as_deref())
            .unwrap_or("all")
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn compress_output(&self) -> bool {
        self.compression_enabled()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[report]
name = "weekly-earnings"
description = "Weekly earnings rollup"
version = "1.0.0"

[source]
path = "./uploads/earnings.csv"

[transform]
period = "weekly"

[load]
output_path = "./test-output"
output_formats = ["csv", "json"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.report.name, "weekly-earnings");
        assert_eq!(config.source_path(), "./uploads/earnings.csv");
        assert_eq!(config.payout_column(), "payout");
        assert_eq!(config.period(), "weekly");
        assert!(!config.compress_output());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_REPORT_PATH", "./uploads/from_env.csv");

        let toml_content = r#"
[report]
name = "test"
description = "test"
version = "1.0"

[source]
path = "${TEST_REPORT_PATH}"

[load]
output_path = "./output"
output_formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.path, "./uploads/from_env.csv");

        std::env::remove_var("TEST_REPORT_PATH");
    }

    #[test]
    fn test_config_validation_rejects_bad_period() {
        let toml_content = r#"
[report]
name = "test"
description = "test"
version = "1.0"

[source]
path = "./uploads/earnings.csv"

[transform]
period = "fortnightly"

[load]
output_path = "./output"
output_formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[report]
name = "file-test"
description = "File test"
version = "1.0"

[source]
path = "./uploads/earnings.csv"
payout_column = "rateApplied"

[load]
output_path = "./output"
output_formats = ["csv", "json"]

[load.compression]
enabled = true

[monitoring]
enabled = true
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.report.name, "file-test");
        assert_eq!(config.payout_column(), "rateApplied");
        assert!(config.compress_output());
        assert!(config.monitoring_enabled());
    }
}
