//! The cleaning steps. Each function is one pass over the table, guards on
//! column presence, and returns the counts the run report records. Inside a
//! step nothing hard-fails: unparseable values coerce to null and all-null
//! columns fall back to zero-fill. The only error surfaced here is a header
//! collision after normalization.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::domain::model::{Table, Value};
use crate::utils::error::{EtlError, Result};

/// What one numeric fix did to its column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillOutcome {
    pub coerced_to_null: usize,
    pub nulls_filled: usize,
    pub fill_value: f64,
}

/// Coerces a column to numeric, fills nulls with the column median (zero when
/// every value is null), then truncate-casts to integer. Used for `age` and
/// for each configured business column. Returns `None` when the column is
/// absent so the caller can skip the step.
pub fn fix_numeric_column(table: &mut Table, name: &str) -> Option<FillOutcome> {
    let col = table.column_mut(name)?;

    let mut coerced_to_null = 0;
    for v in &mut col.values {
        let (num, lossy) = to_numeric(v);
        if lossy {
            coerced_to_null += 1;
        }
        *v = num;
    }

    let non_null: Vec<f64> = col.values.iter().filter_map(Value::as_f64).collect();
    let fill_value = if non_null.is_empty() {
        if !col.values.is_empty() {
            tracing::warn!(
                "All '{}' values are null after coercion, cannot compute median. Filling with 0.",
                name
            );
        }
        0.0
    } else {
        median(non_null)
    };

    let mut nulls_filled = 0;
    for v in &mut col.values {
        let x = match v.as_f64() {
            Some(x) => x,
            None => {
                nulls_filled += 1;
                fill_value
            }
        };
        *v = Value::Int(x as i64);
    }

    Some(FillOutcome {
        coerced_to_null,
        nulls_filled,
        fill_value,
    })
}

/// Keeps the first occurrence of each fully identical row, preserving order.
/// Returns the number of rows dropped. Equality is typed: `Int(1)` and
/// `Str("1")` are different cells.
pub fn drop_duplicates(table: &mut Table) -> usize {
    let n = table.n_rows();
    let mut seen = HashSet::with_capacity(n);
    let mut keep = Vec::with_capacity(n);
    for i in 0..n {
        let row: Vec<Key> = table
            .columns()
            .iter()
            .map(|c| Key::of(&c.values[i]))
            .collect();
        keep.push(seen.insert(row));
    }
    table.retain_rows(&keep);
    keep.iter().filter(|kept| !**kept).count()
}

pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Trims, lowercases, and underscores every header. Two headers normalizing
/// to the same name is an error rather than a silent overwrite. Returns the
/// headers that actually changed, original name to new name.
pub fn normalize_headers(table: &mut Table) -> Result<HashMap<String, String>> {
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut renamed = HashMap::new();
    for col in table.columns_mut() {
        let normalized = normalize_header(&col.name);
        if let Some(first) = seen.get(&normalized) {
            return Err(EtlError::HeaderCollisionError {
                first: first.clone(),
                second: col.name.clone(),
                normalized,
            });
        }
        seen.insert(normalized.clone(), col.name.clone());
        if normalized != col.name {
            renamed.insert(col.name.clone(), normalized.clone());
            col.name = normalized;
        }
    }
    Ok(renamed)
}

/// Parses every value of the date column into a date, unparseable entries
/// becoming null. Nulls are left in place, dates get no imputation. Returns
/// `None` when the column is absent, otherwise the coerced-to-null count.
pub fn normalize_dates(table: &mut Table, date_column: &str) -> Option<usize> {
    let col = table.column_mut(date_column)?;
    let mut coerced = 0;
    for v in &mut col.values {
        let parsed = match &*v {
            Value::Date(d) => Value::Date(*d),
            Value::Null => Value::Null,
            Value::Str(s) => match parse_date(s) {
                Some(d) => Value::Date(d),
                None => {
                    coerced += 1;
                    Value::Null
                }
            },
            // Numeric cells carry no calendar meaning here.
            Value::Int(_) | Value::Float(_) => {
                coerced += 1;
                Value::Null
            }
        };
        *v = parsed;
    }
    Some(coerced)
}

/// Trim + lowercase, then exact-match substitution. Trimming runs before the
/// lookup, so the map only needs already-folded keys ("m", "f").
pub fn standardize_gender(
    table: &mut Table,
    column: &str,
    map: &HashMap<String, String>,
) -> bool {
    let Some(col) = table.column_mut(column) else {
        return false;
    };
    for v in &mut col.values {
        if let Value::Str(s) = v {
            let folded = s.trim().to_lowercase();
            *s = map.get(&folded).cloned().unwrap_or(folded);
        }
    }
    true
}

/// Trim + title-case, then exact-match substitution ("Usa" -> "United
/// States"). Unmapped values pass through title-cased.
pub fn standardize_country(
    table: &mut Table,
    column: &str,
    map: &HashMap<String, String>,
) -> bool {
    let Some(col) = table.column_mut(column) else {
        return false;
    };
    for v in &mut col.values {
        if let Value::Str(s) = v {
            let folded = title_case(s.trim());
            *s = map.get(&folded).cloned().unwrap_or(folded);
        }
    }
    true
}

/// Trim + title-case, no substitution table.
pub fn standardize_name(table: &mut Table, column: &str) -> bool {
    let Some(col) = table.column_mut(column) else {
        return false;
    };
    for v in &mut col.values {
        if let Value::Str(s) = v {
            *s = title_case(s.trim());
        }
    }
    true
}

/// First letter of each whitespace-separated word uppercased, the rest
/// lowercased.
pub(crate) fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Hashable view of a cell for row-level deduplication.
#[derive(Hash, PartialEq, Eq)]
enum Key {
    Null,
    Int(i64),
    Float(u64),
    Str(String),
    Date(NaiveDate),
}

impl Key {
    fn of(v: &Value) -> Self {
        match v {
            Value::Null => Key::Null,
            Value::Int(i) => Key::Int(*i),
            Value::Float(f) => Key::Float(f.to_bits()),
            Value::Str(s) => Key::Str(s.clone()),
            Value::Date(d) => Key::Date(*d),
        }
    }
}

fn to_numeric(v: &Value) -> (Value, bool) {
    match v {
        Value::Null => (Value::Null, false),
        Value::Int(i) => (Value::Int(*i), false),
        Value::Float(f) => (Value::Float(*f), false),
        Value::Str(s) => {
            let t = s.trim();
            if let Ok(i) = t.parse::<i64>() {
                (Value::Int(i), false)
            } else {
                match t.parse::<f64>() {
                    // "nan"/"inf" parse but carry no usable magnitude.
                    Ok(f) if f.is_finite() => (Value::Float(f), false),
                    _ => (Value::Null, true),
                }
            }
        }
        Value::Date(_) => (Value::Null, true),
    }
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d/%m/%Y",
];

fn parse_date(s: &str) -> Option<NaiveDate> {
    let t = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(t, fmt).ok())
}

fn median(mut xs: Vec<f64>) -> f64 {
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = xs.len() / 2;
    if xs.len() % 2 == 0 {
        (xs[mid - 1] + xs[mid]) / 2.0
    } else {
        xs[mid]
    }
}
