use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        println!("Starting ETL process...");

        // Extract
        println!("Loading data...");
        let table = self.pipeline.extract().await?;
        println!(
            "Loaded {} rows x {} columns",
            table.n_rows(),
            table.n_columns()
        );
        self.monitor.log_stats("extract");

        // Transform
        println!("Cleaning data...");
        let result = self.pipeline.transform(table).await?;
        println!(
            "{} rows remain after cleaning ({} duplicates removed)",
            result.table.n_rows(),
            result.report.duplicates_removed
        );
        self.monitor.log_stats("transform");

        // Load
        println!("Writing output...");
        let output_path = self.pipeline.load(result).await?;
        println!("Output saved to: {}", output_path);
        self.monitor.log_stats("load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
