use crate::domain::model::{CleanResult, Table};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &str;
    fn input_file(&self) -> &str;
    fn output_file(&self) -> &str;
    /// Seed for the demo-column synthesizer; `None` means a fresh run.
    fn seed(&self) -> Option<u64>;
    fn synthesize(&self) -> bool;
    fn emit_report(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Table>;
    async fn transform(&self, table: Table) -> Result<CleanResult>;
    async fn load(&self, result: CleanResult) -> Result<String>;
}
