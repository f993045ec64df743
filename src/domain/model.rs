use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::utils::error::{EtlError, Result};

/// A single cell. Loaded CSV fields start out as `Str` (or `Null` for empty
/// fields); the cleaning steps re-type them in place.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
    Date(NaiveDate),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view. Strings never qualify, even when they would parse;
    /// coercion is an explicit cleaning step.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// CSV rendering. Null becomes an empty field, dates use ISO format.
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.clone(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

/// An in-memory table: ordered named columns, rows positionally aligned.
/// Row `i` of every column belongs to the same logical record, so every
/// mutation keeps all columns the same length.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    /// Appends a column. Rejects duplicate names and, on a non-empty table,
    /// any length that breaks row alignment.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(EtlError::ProcessingError {
                message: format!("column '{}' already exists", name),
            });
        }
        if !self.columns.is_empty() && values.len() != self.n_rows() {
            return Err(EtlError::ProcessingError {
                message: format!(
                    "column '{}' has {} values, table has {} rows",
                    name,
                    values.len(),
                    self.n_rows()
                ),
            });
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Keeps only the rows whose flag is `true`. `keep` must cover every row.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        for col in &mut self.columns {
            let mut it = keep.iter();
            col.values.retain(|_| *it.next().unwrap_or(&false));
        }
    }

    pub fn null_count(&self, name: &str) -> Option<usize> {
        self.column(name)
            .map(|c| c.values.iter().filter(|v| v.is_null()).count())
    }

    /// Frequency table for one column, most frequent first (ties by value).
    pub fn value_counts(&self, name: &str) -> Option<Vec<(String, usize)>> {
        let col = self.column(name)?;
        let mut counts: HashMap<String, usize> = HashMap::new();
        for v in &col.values {
            *counts.entry(v.render()).or_insert(0) += 1;
        }
        let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Some(counts)
    }
}

/// Summary of one cleaning run, serialized to JSON under `--report`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleaningReport {
    pub rows_loaded: usize,
    pub rows_written: usize,
    pub duplicates_removed: usize,
    pub synthesized_columns: Vec<String>,
    pub renamed_headers: HashMap<String, String>,
    pub coerced_to_null: HashMap<String, usize>,
    pub nulls_filled: HashMap<String, usize>,
    pub skipped_columns: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CleanResult {
    pub table: Table,
    pub report: CleaningReport,
}
