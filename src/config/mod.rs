#[cfg(feature = "cli")]
pub mod cli;
pub mod schema;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "sales-etl")]
#[command(about = "A small ETL tool that cleans tabular store sales data")]
pub struct CliConfig {
    /// Directory the input is read from and the output written to
    #[arg(long, default_value = ".")]
    pub data_dir: String,

    #[arg(long, default_value = "Sales.csv")]
    pub input: String,

    #[arg(long, default_value = "Stores_fully_cleaned.csv")]
    pub output: String,

    /// Seed for the demo-column synthesizer; omit for a non-reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip synthesizing demo columns entirely
    #[arg(long)]
    pub no_synth: bool,

    /// Write cleaning_report.json next to the output
    #[arg(long)]
    pub report: bool,

    /// TOML file overriding the built-in cleaning schema
    #[arg(long)]
    pub schema: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log system stats per stage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn input_file(&self) -> &str {
        &self.input
    }

    fn output_file(&self) -> &str {
        &self.output
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn synthesize(&self) -> bool {
        !self.no_synth
    }

    fn emit_report(&self) -> bool {
        self.report
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("data_dir", &self.data_dir)?;
        validation::validate_non_empty_string("input", &self.input)?;
        validation::validate_non_empty_string("output", &self.output)?;
        validation::validate_file_extensions("input", std::slice::from_ref(&self.input), &["csv"])?;
        validation::validate_file_extensions(
            "output",
            std::slice::from_ref(&self.output),
            &["csv"],
        )?;
        if let Some(path) = &self.schema {
            validation::validate_file_extensions("schema", std::slice::from_ref(path), &["toml"])?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    fn default_config() -> CliConfig {
        CliConfig {
            data_dir: ".".to_string(),
            input: "Sales.csv".to_string(),
            output: "Stores_fully_cleaned.csv".to_string(),
            seed: None,
            no_synth: false,
            report: false,
            schema: None,
            verbose: false,
            monitor: false,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(default_config().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_csv_input() {
        let mut config = default_config();
        config.input = "Sales.parquet".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_toml_schema() {
        let mut config = default_config();
        config.schema = Some("schema.yaml".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_no_synth_flag_disables_synthesis() {
        let mut config = default_config();
        assert!(config.synthesize());
        config.no_synth = true;
        assert!(!config.synthesize());
    }
}
