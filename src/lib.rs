pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, CliConfig};

pub use config::schema::CleaningSchema;
pub use crate::core::{etl::EtlEngine, pipeline::CleaningPipeline};
pub use utils::error::{EtlError, Result};
