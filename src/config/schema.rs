use crate::core::clean;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// The cleaning schema: which columns the Cleaner touches and the exact
/// substitution tables applied after case folding. The defaults reproduce the
/// store sales dataset; a TOML file passed via `--schema` can override any
/// field. Column names are matched post-rename, so they must already be in
/// normalized (trimmed, lowercase, underscored) form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningSchema {
    #[serde(default = "default_date_column")]
    pub date_column: String,

    #[serde(default = "default_age_column")]
    pub age_column: String,

    /// Business columns coerced to non-null integers when present.
    #[serde(default = "default_numeric_columns")]
    pub numeric_columns: Vec<String>,

    #[serde(default = "default_gender_column")]
    pub gender_column: String,

    #[serde(default = "default_country_column")]
    pub country_column: String,

    #[serde(default = "default_name_column")]
    pub name_column: String,

    /// Exact-match substitutions applied after trim + lowercase, so keys must
    /// already be folded ("m", not "M ").
    #[serde(default = "default_gender_map")]
    pub gender_map: HashMap<String, String>,

    /// Exact-match substitutions applied after trim + title-case, so keys
    /// must already be title-cased ("Usa", not "usa ").
    #[serde(default = "default_country_map")]
    pub country_map: HashMap<String, String>,
}

impl Default for CleaningSchema {
    fn default() -> Self {
        Self {
            date_column: default_date_column(),
            age_column: default_age_column(),
            numeric_columns: default_numeric_columns(),
            gender_column: default_gender_column(),
            country_column: default_country_column(),
            name_column: default_name_column(),
            gender_map: default_gender_map(),
            country_map: default_country_map(),
        }
    }
}

impl CleaningSchema {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| EtlError::ConfigError {
            message: format!("cannot read schema file '{}': {}", path.display(), e),
        })?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        let schema: Self = toml::from_str(content)?;
        schema.validate()?;
        Ok(schema)
    }
}

impl Validate for CleaningSchema {
    fn validate(&self) -> Result<()> {
        let columns = self
            .numeric_columns
            .iter()
            .chain([
                &self.date_column,
                &self.age_column,
                &self.gender_column,
                &self.country_column,
                &self.name_column,
            ]);
        for name in columns {
            if *name != clean::normalize_header(name) {
                return Err(EtlError::ValidationError {
                    message: format!(
                        "schema column '{}' is not in normalized form (expected '{}')",
                        name,
                        clean::normalize_header(name)
                    ),
                });
            }
        }

        for key in self.gender_map.keys() {
            if *key != key.trim().to_lowercase() {
                return Err(EtlError::ValidationError {
                    message: format!(
                        "gender_map key '{}' would never match; keys are looked up after trim + lowercase",
                        key
                    ),
                });
            }
        }

        for key in self.country_map.keys() {
            if *key != clean::title_case(key.trim()) {
                return Err(EtlError::ValidationError {
                    message: format!(
                        "country_map key '{}' would never match; keys are looked up after trim + title-case",
                        key
                    ),
                });
            }
        }

        Ok(())
    }
}

fn default_date_column() -> String {
    "date".to_string()
}

fn default_age_column() -> String {
    "age".to_string()
}

fn default_numeric_columns() -> Vec<String> {
    [
        "store_id",
        "store_area",
        "items_available",
        "daily_customer_count",
        "store_sales",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_gender_column() -> String {
    "gender".to_string()
}

fn default_country_column() -> String {
    "country_name".to_string()
}

fn default_name_column() -> String {
    "name".to_string()
}

fn default_gender_map() -> HashMap<String, String> {
    [("m", "male"), ("f", "female")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn default_country_map() -> HashMap<String, String> {
    [("Usa", "United States"), ("Uk", "United Kingdom")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
