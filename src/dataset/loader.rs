//! CSV loader for the sales dataset
//!
//! Performed once at startup:
//! - mandatory columns (year, month, sales value, store id) must exist
//! - period `YYYY-MM` and quarter `YYYY-Q#` keys are derived per row
//! - rows with unresolvable year or month are dropped, not errored
//! - unparseable sales values are coerced to 0.0
//! - the column mapping is resolved from the headers actually present

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::observability::Logger;

use super::errors::{LoadError, LoadResult};
use super::mapping::{ColumnMapping, Dimension};
use super::table::{Dataset, Row};

const YEAR_COLUMN: &str = "Year";
const MONTH_COLUMN: &str = "Month";
const SALES_COLUMN: &str = "Value";
const STORE_COLUMN: &str = "Customer Account Number";

/// Month abbreviation table used to normalize raw month cells.
const MONTH_ABBREVIATIONS: [(&str, u32); 12] = [
    ("JAN", 1),
    ("FEB", 2),
    ("MAR", 3),
    ("APR", 4),
    ("MAY", 5),
    ("JUN", 6),
    ("JUL", 7),
    ("AUG", 8),
    ("SEP", 9),
    ("OCT", 10),
    ("NOV", 11),
    ("DEC", 12),
];

/// Expected physical header per logical dimension.
fn expected_header(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Brand => "Brand",
        Dimension::Category => "Category",
        Dimension::Product => "Item Description",
        Dimension::Country => "Country",
        Dimension::City => "City",
        Dimension::Area => "Area",
        Dimension::Channel => "Channel",
        Dimension::SubChannel => "Sub Channel",
        Dimension::Salesman => "Salesmen",
        Dimension::Customer => "Customer",
        Dimension::CustomerAccountName => "Customer Account Name",
        Dimension::RetailerGroup => "Retailer Group",
        Dimension::RetailerSubGroup => "Retailer Sub Group",
        Dimension::MasterDistributor => "Master Distributor",
        Dimension::Distributor => "Distributor",
        Dimension::LineOfBusiness => "Line of Business",
        Dimension::Supplier => "Supplier",
        Dimension::Agency => "Agency",
        Dimension::Segment => "Segment",
        Dimension::SubBrand => "Sub Brand",
        Dimension::Promo => "Promo Item",
    }
}

/// Loads the dataset from a CSV file on disk.
pub fn load_dataset(path: &Path) -> LoadResult<Dataset> {
    let located = path.display().to_string();
    let dataset = File::open(path)
        .map_err(|source| LoadError::Unreadable {
            path: located.clone(),
            source,
        })
        .and_then(load_from_reader)
        .inspect_err(|error| {
            Logger::error(
                "dataset_load_failed",
                &[("path", &located), ("reason", &error.to_string())],
            );
        })?;
    let mapping = dataset.mapping();
    Logger::info(
        "dataset_loaded",
        &[
            ("dimensions", &mapping.present_dimensions().count().to_string()),
            ("path", &located),
            ("rows", &dataset.len().to_string()),
            ("store_column", mapping.store_column()),
        ],
    );
    Ok(dataset)
}

/// Loads the dataset from any reader yielding CSV with a header row.
pub fn load_from_reader<R: Read>(reader: R) -> LoadResult<Dataset> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect();

    let position = |name: &str| headers.iter().position(|h| h == name);

    let mandatory = [YEAR_COLUMN, MONTH_COLUMN, SALES_COLUMN, STORE_COLUMN];
    let resolved = mandatory.map(|name| position(name));
    let missing: Vec<String> = mandatory
        .iter()
        .zip(&resolved)
        .filter(|(_, idx)| idx.is_none())
        .map(|(name, _)| name.to_string())
        .collect();
    let [Some(year_idx), Some(month_idx), Some(sales_idx), Some(store_idx)] = resolved else {
        return Err(LoadError::MissingColumns(missing));
    };

    // Dimensions resolve to a physical column only when the header is present.
    let mut dimension_columns: BTreeMap<Dimension, String> = BTreeMap::new();
    let mut dimension_indices: Vec<(Dimension, usize)> = Vec::new();
    for dimension in Dimension::ALL {
        let header = expected_header(dimension);
        if let Some(idx) = position(header) {
            dimension_columns.insert(dimension, header.to_string());
            dimension_indices.push((dimension, idx));
        }
    }

    let mapping = ColumnMapping::new(
        Some(SALES_COLUMN.to_string()),
        STORE_COLUMN,
        dimension_columns,
    );

    let mut rows = Vec::new();
    let mut total = 0usize;
    let mut dropped = 0usize;

    for record in csv_reader.records() {
        let record = record?;
        total += 1;

        let year = match parse_year(record.get(year_idx).unwrap_or("")) {
            Some(y) => y,
            None => {
                dropped += 1;
                continue;
            }
        };
        let month = match normalize_month(record.get(month_idx).unwrap_or("")) {
            Some(m) => m,
            None => {
                dropped += 1;
                continue;
            }
        };

        let period = format!("{year:04}-{month:02}");
        let quarter = format!("{year:04}-Q{}", (month - 1) / 3 + 1);
        let sales = parse_sales(record.get(sales_idx).unwrap_or(""));
        let store_id = record.get(store_idx).unwrap_or("").trim().to_string();

        let mut attrs = HashMap::with_capacity(dimension_indices.len());
        for (dimension, idx) in &dimension_indices {
            let cell = record.get(*idx).unwrap_or("").to_string();
            attrs.insert(expected_header(*dimension).to_string(), cell);
        }

        rows.push(Row::new(period, year, quarter, sales, store_id, attrs));
    }

    if total == 0 {
        return Err(LoadError::EmptyTable);
    }
    if dropped > 0 {
        Logger::warn(
            "rows_dropped_unresolved_time",
            &[("dropped", &dropped.to_string()), ("total", &total.to_string())],
        );
    }

    Ok(Dataset::new(rows, mapping))
}

/// Parses a year cell; accepts integral floats ("2024.0") as 2024.
fn parse_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(year) = trimmed.parse::<i32>() {
        return Some(year);
    }
    let as_float = trimmed.parse::<f64>().ok()?;
    if as_float.is_finite() && as_float.fract() == 0.0 {
        return Some(as_float as i32);
    }
    None
}

/// Normalizes a raw month cell to 1..=12, or None when unresolvable.
///
/// Order: numeric value in range, then first-3-letter lookup against the
/// abbreviation table, then substring search over the full table.
fn normalize_month(raw: &str) -> Option<u32> {
    let cleaned: String = raw
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    if cleaned.chars().all(|c| c.is_ascii_digit()) {
        let month = cleaned.parse::<u32>().ok()?;
        return (1..=12).contains(&month).then_some(month);
    }

    let prefix: String = cleaned.chars().take(3).collect();
    if let Some((_, month)) = MONTH_ABBREVIATIONS.iter().find(|(abbr, _)| *abbr == prefix) {
        return Some(*month);
    }

    MONTH_ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| cleaned.contains(abbr))
        .map(|(_, month)| *month)
}

/// Parses a sales cell, coercing anything unparseable to 0.0.
fn parse_sales(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0)
}
