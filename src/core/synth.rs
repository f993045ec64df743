//! Demo-column synthesizer. The raw store dataset has no dates, names,
//! gender, country, or age, so the pipeline fabricates them to give the text
//! and date cleaning steps something to chew on. The token pools deliberately
//! contain inconsistent casing and stray whitespace. Randomness goes through
//! one seedable `StdRng` so runs can be reproduced.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::clean;
use crate::domain::model::{Table, Value};
use crate::utils::error::Result;

const GENDER_TOKENS: &[&str] = &["Male", "Female", "MALE ", "FEMALE ", "m", "f"];

const COUNTRY_TOKENS: &[&str] = &[
    "USA",
    "Canada",
    "UK",
    "Australia",
    "Germany",
    "France",
    "India",
    "Japan",
    "China",
    "Brazil",
    "usa ",
    " united kingdom",
];

const AGE_RANGE: std::ops::Range<f64> = 18.0..71.0;

pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid epoch date")
}

/// Appends the demo columns: sequential `DATE`s from a fixed epoch,
/// `Customer <i>` names, messy gender and country tokens, and uniform ages
/// with a bounded number of injected nulls (min of 5% of the rows and 5).
/// Columns the input already carries are left untouched, so real datasets
/// pass through without scaffolding on top. Existing values are never read.
/// Returns the names of the columns actually added.
pub fn add_demo_columns(table: &mut Table, rng: &mut StdRng) -> Result<Vec<String>> {
    let n = table.n_rows();
    let mut added = Vec::new();

    if !has_demo_column(table, "date") {
        let start = start_date();
        let dates = (0..n)
            .map(|i| Value::Date(start + Duration::days(i as i64)))
            .collect();
        table.push_column("DATE", dates)?;
        added.push("DATE".to_string());
    }

    if !has_demo_column(table, "name") {
        let names = (0..n)
            .map(|i| Value::Str(format!("Customer {}", i + 1)))
            .collect();
        table.push_column("name", names)?;
        added.push("name".to_string());
    }

    if !has_demo_column(table, "gender") {
        let genders = (0..n)
            .map(|_| Value::Str(pick(rng, GENDER_TOKENS)))
            .collect();
        table.push_column("gender", genders)?;
        added.push("gender".to_string());
    }

    if !has_demo_column(table, "country_name") {
        let countries = (0..n)
            .map(|_| Value::Str(pick(rng, COUNTRY_TOKENS)))
            .collect();
        table.push_column("country_name", countries)?;
        added.push("country_name".to_string());
    }

    if !has_demo_column(table, "age") {
        let mut ages: Vec<Value> = (0..n)
            .map(|_| Value::Float(rng.gen_range(AGE_RANGE)))
            .collect();
        let holes = (n / 20).min(5);
        for idx in rand::seq::index::sample(rng, n, holes) {
            ages[idx] = Value::Null;
        }
        table.push_column("age", ages)?;
        added.push("age".to_string());
    }

    Ok(added)
}

fn pick(rng: &mut StdRng, tokens: &[&str]) -> String {
    tokens[rng.gen_range(0..tokens.len())].to_string()
}

// Presence is checked on normalized names, so an input "Date" column blocks
// the synthesized "DATE" instead of colliding with it at rename time.
fn has_demo_column(table: &Table, normalized: &str) -> bool {
    table
        .columns()
        .iter()
        .any(|c| clean::normalize_header(&c.name) == normalized)
}
