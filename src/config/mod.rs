pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_csv_extension, validate_non_empty_string, validate_output_formats, validate_path,
    validate_period, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "earnings-etl"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Aggregates a CSV earnings report into totals and synthesized tasks")
)]
pub struct CliConfig {
    /// Path to the earnings report CSV
    #[cfg_attr(
        feature = "cli",
        arg(long, default_value = "./uploads/Outlier_Earnings_Report (3).csv")
    )]
    pub input: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "./output"))]
    pub output_path: String,

    /// Header name of the column holding the hourly rate strings
    #[cfg_attr(feature = "cli", arg(long, default_value = "payout"))]
    pub payout_column: String,

    /// Date window for the aggregation: daily, weekly, monthly or all
    #[cfg_attr(feature = "cli", arg(long, default_value = "all"))]
    pub period: String,

    #[cfg_attr(
        feature = "cli",
        arg(long, value_delimiter = ',', default_value = "csv,json")
    )]
    pub output_formats: Vec<String>,

    /// Bundle the report files into a single ZIP archive
    #[cfg_attr(feature = "cli", arg(long))]
    pub compress: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Log system resource usage per phase"))]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn source_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn payout_column(&self) -> &str {
        &self.payout_column
    }

    fn period(&self) -> &str {
        &self.period
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn compress_output(&self) -> bool {
        self.compress
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        validate_csv_extension("input", &self.input)?;
        validate_path("output_path", &self.output_path)?;
        validate_non_empty_string("payout_column", &self.payout_column)?;
        validate_period("period", &self.period)?;
        validate_output_formats("output_formats", &self.output_formats)?;
        Ok(())
    }
}
