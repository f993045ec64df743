use crate::config::schema::CleaningSchema;
use crate::core::{clean, synth};
use crate::core::{CleanResult, CleaningReport, ConfigProvider, Pipeline, Storage, Table, Value};
use crate::utils::error::{EtlError, Result};

/// JSON run summary written next to the output when reporting is on.
pub const REPORT_FILE: &str = "cleaning_report.json";

pub struct CleaningPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) schema: CleaningSchema,
}

impl<S: Storage, C: ConfigProvider> CleaningPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self::with_schema(storage, config, CleaningSchema::default())
    }

    pub fn with_schema(storage: S, config: C, schema: CleaningSchema) -> Self {
        Self {
            storage,
            config,
            schema,
        }
    }

    fn log_value_counts(&self, table: &Table, column: &str) {
        if let Some(counts) = table.value_counts(column) {
            let rendered: Vec<String> = counts
                .iter()
                .map(|(value, count)| format!("{}={}", value, count))
                .collect();
            tracing::info!("'{}' value counts: {}", column, rendered.join(", "));
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CleaningPipeline<S, C> {
    async fn extract(&self) -> Result<Table> {
        tracing::debug!("Reading input file: {}", self.config.input_file());
        let bytes = self.storage.read_file(self.config.input_file()).await?;

        let mut reader = csv::ReaderBuilder::new().from_reader(bytes.as_slice());
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        // 逐列讀入，空欄位視為缺值
        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record?;
            for (i, field) in record.iter().enumerate() {
                columns[i].push(if field.is_empty() {
                    Value::Null
                } else {
                    Value::Str(field.to_string())
                });
            }
        }

        let mut table = Table::new();
        for (name, values) in headers.into_iter().zip(columns) {
            table.push_column(name, values)?;
        }

        tracing::info!(
            "Loaded {} rows from '{}'",
            table.n_rows(),
            self.config.input_file()
        );
        Ok(table)
    }

    async fn transform(&self, mut table: Table) -> Result<CleanResult> {
        let schema = &self.schema;
        let mut report = CleaningReport {
            rows_loaded: table.n_rows(),
            ..Default::default()
        };

        // 合成示範欄位（只補缺的欄位，不覆蓋真實資料）
        if self.config.synthesize() {
            let mut rng = synth::rng_from_seed(self.config.seed());
            let added = synth::add_demo_columns(&mut table, &mut rng)?;
            if !added.is_empty() {
                tracing::info!("Synthesized demo columns: {}", added.join(", "));
            }
            report.synthesized_columns = added;
        }

        // 年齡補值：轉數值、中位數填補、轉整數
        if let Some(nulls) = table.null_count(&schema.age_column) {
            tracing::debug!(
                "'{}' null count before imputation: {}",
                schema.age_column,
                nulls
            );
        }
        match clean::fix_numeric_column(&mut table, &schema.age_column) {
            Some(outcome) => {
                tracing::info!(
                    "Imputed '{}': {} unparseable, {} nulls filled with {}",
                    schema.age_column,
                    outcome.coerced_to_null,
                    outcome.nulls_filled,
                    outcome.fill_value
                );
                record_outcome(&mut report, &schema.age_column, outcome);
            }
            None => {
                tracing::info!(
                    "No '{}' column found, skipping age imputation",
                    schema.age_column
                );
                report.skipped_columns.push(schema.age_column.clone());
            }
        }

        // 去除完全重複的列
        report.duplicates_removed = clean::drop_duplicates(&mut table);
        tracing::info!(
            "{} rows after removing {} duplicate rows",
            table.n_rows(),
            report.duplicates_removed
        );

        // 欄名正規化（小寫、底線），同名衝突直接回報錯誤
        report.renamed_headers = clean::normalize_headers(&mut table)?;
        tracing::info!("Columns: {}", table.headers().join(", "));

        // 日期轉型
        match clean::normalize_dates(&mut table, &schema.date_column) {
            Some(coerced) => {
                tracing::info!(
                    "Converted '{}' to dates ({} unparseable)",
                    schema.date_column,
                    coerced
                );
                if coerced > 0 {
                    report
                        .coerced_to_null
                        .insert(schema.date_column.clone(), coerced);
                }
            }
            None => tracing::info!(
                "No '{}' column found for date conversion",
                schema.date_column
            ),
        }

        // 業務數值欄位：轉數值、填補、轉整數；缺少的欄位跳過
        for name in &schema.numeric_columns {
            match clean::fix_numeric_column(&mut table, name) {
                Some(outcome) => {
                    tracing::info!(
                        "Column '{}' data type fixed to int ({} nulls filled)",
                        name,
                        outcome.nulls_filled
                    );
                    record_outcome(&mut report, name, outcome);
                }
                None => {
                    tracing::info!("Column '{}' not present, skipped", name);
                    report.skipped_columns.push(name.clone());
                }
            }
        }

        // 文字標準化：性別、國名、姓名
        if clean::standardize_gender(&mut table, &schema.gender_column, &schema.gender_map) {
            self.log_value_counts(&table, &schema.gender_column);
        } else {
            tracing::info!("No '{}' column found for standardization", schema.gender_column);
        }

        if clean::standardize_country(&mut table, &schema.country_column, &schema.country_map) {
            self.log_value_counts(&table, &schema.country_column);
        } else {
            tracing::info!(
                "No '{}' column found for standardization",
                schema.country_column
            );
        }

        if !clean::standardize_name(&mut table, &schema.name_column) {
            tracing::info!("No '{}' column found for standardization", schema.name_column);
        }

        report.rows_written = table.n_rows();
        Ok(CleanResult { table, report })
    }

    async fn load(&self, result: CleanResult) -> Result<String> {
        // 輸出不含索引欄，表頭即目前欄名
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(result.table.headers())?;
        for i in 0..result.table.n_rows() {
            let row: Vec<String> = result
                .table
                .columns()
                .iter()
                .map(|c| c.values[i].render())
                .collect();
            writer.write_record(&row)?;
        }
        let data = writer
            .into_inner()
            .map_err(|e| EtlError::ProcessingError {
                message: format!("CSV writer flush failed: {}", e),
            })?;

        tracing::debug!(
            "Writing {} bytes to '{}'",
            data.len(),
            self.config.output_file()
        );
        self.storage
            .write_file(self.config.output_file(), &data)
            .await?;

        if self.config.emit_report() {
            let json = serde_json::to_string_pretty(&result.report)?;
            self.storage.write_file(REPORT_FILE, json.as_bytes()).await?;
            tracing::debug!("Run report written to '{}'", REPORT_FILE);
        }

        Ok(format!(
            "{}/{}",
            self.config.data_dir(),
            self.config.output_file()
        ))
    }
}

fn record_outcome(report: &mut CleaningReport, column: &str, outcome: clean::FillOutcome) {
    if outcome.coerced_to_null > 0 {
        report
            .coerced_to_null
            .insert(column.to_string(), outcome.coerced_to_null);
    }
    if outcome.nulls_filled > 0 {
        report
            .nulls_filled
            .insert(column.to_string(), outcome.nulls_filled);
    }
}
