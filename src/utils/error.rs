use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Schema parse error: {0}")]
    SchemaParseError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Header collision: '{first}' and '{second}' both normalize to '{normalized}'")]
    HeaderCollisionError {
        first: String,
        second: String,
        normalized: String,
    },
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ProcessingError { .. }
            | EtlError::HeaderCollisionError { .. } => ErrorCategory::Data,
            EtlError::SchemaParseError(_)
            | EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ValidationError { .. } => ErrorCategory::Config,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Io => ErrorSeverity::Critical,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Config => ErrorSeverity::Medium,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("File access failed: {}", self),
            ErrorCategory::Data => format!("Data could not be processed: {}", self),
            ErrorCategory::Config => format!("Configuration problem: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::IoError(_) => {
                "Check that the input file exists and the output directory is writable".to_string()
            }
            EtlError::CsvError(_) => {
                "Check the input CSV for ragged rows or a malformed header".to_string()
            }
            EtlError::SerializationError(_) => {
                "The run report could not be serialized; rerun without --report".to_string()
            }
            EtlError::SchemaParseError(_) | EtlError::ConfigError { .. } => {
                "Check the cleaning schema TOML against the documented fields".to_string()
            }
            EtlError::InvalidConfigValueError { field, .. } => {
                format!("Correct the '{}' argument and retry", field)
            }
            EtlError::ProcessingError { .. } => {
                "Inspect the input data around the reported column".to_string()
            }
            EtlError::ValidationError { .. } => {
                "Adjust the cleaning schema so every column name is already normalized".to_string()
            }
            EtlError::HeaderCollisionError { first, second, .. } => {
                format!(
                    "Rename '{}' or '{}' in the source file so they stay distinct after normalization",
                    first, second
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_are_critical() {
        let err = EtlError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_collision_is_a_data_error() {
        let err = EtlError::HeaderCollisionError {
            first: "Store ID".to_string(),
            second: " store id".to_string(),
            normalized: "store_id".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("Store ID"));
    }
}
