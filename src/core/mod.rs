pub mod clean;
pub mod etl;
pub mod pipeline;
pub mod synth;

pub use crate::domain::model::{CleanResult, CleaningReport, Table, Value};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
