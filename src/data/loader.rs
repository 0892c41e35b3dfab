//! Data loading utilities
//!
//! Two entry points feed the pipeline: CSV files on disk (training) and
//! raw value rows arriving with a request (inference). Request rows are
//! framed using a fixed, externally defined column ordering.

use crate::error::{PrepError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;

/// A single raw cell in a request record.
///
/// Untagged so a JSON request body (`[11, 3, "male", null, 9.22, "S"]`)
/// deserializes directly into a row of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
}

impl CellValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(v) => Some(*v as f64),
            CellValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    fn to_string_opt(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Int(v) => Some(v.to_string()),
            CellValue::Float(v) => Some(v.to_string()),
            CellValue::Str(s) => Some(s.clone()),
        }
    }
}

/// Loader for raw tabular data.
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    infer_schema_length: Option<usize>,
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            infer_schema_length: Some(100),
        }
    }

    /// Read all rows from a delimited file with a header row.
    pub fn load_csv(&self, path: &str) -> Result<DataFrame> {
        let file = File::open(path)?;

        let reader = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .into_reader_with_file_handle(file);

        reader
            .finish()
            .map_err(|e| PrepError::DataError(e.to_string()))
    }

    /// Frame a list of raw value rows using a fixed column ordering.
    ///
    /// Column dtype is inferred per column: all-integer cells become
    /// `Int64`, any float promotes to `Float64`, any string turns the
    /// whole column into strings. Nulls stay null.
    pub fn from_records(records: &[Vec<CellValue>], column_names: &[String]) -> Result<DataFrame> {
        let n_cols = column_names.len();
        for (i, record) in records.iter().enumerate() {
            if record.len() != n_cols {
                return Err(PrepError::SchemaError(format!(
                    "record {} has {} values, expected {}",
                    i,
                    record.len(),
                    n_cols
                )));
            }
        }

        let mut columns: Vec<Column> = Vec::with_capacity(n_cols);
        for (j, name) in column_names.iter().enumerate() {
            let cells: Vec<&CellValue> = records.iter().map(|r| &r[j]).collect();

            let has_str = cells.iter().any(|c| matches!(c, CellValue::Str(_)));
            let has_float = cells.iter().any(|c| matches!(c, CellValue::Float(_)));

            let column = if has_str {
                let values: Vec<Option<String>> = cells.iter().map(|c| c.to_string_opt()).collect();
                Column::new(name.as_str().into(), values)
            } else if has_float {
                let values: Vec<Option<f64>> = cells.iter().map(|c| c.as_f64()).collect();
                Column::new(name.as_str().into(), values)
            } else {
                let values: Vec<Option<i64>> = cells.iter().map(|c| c.as_i64()).collect();
                Column::new(name.as_str().into(), values)
            };
            columns.push(column);
        }

        DataFrame::new(columns).map_err(|e| PrepError::DataError(e.to_string()))
    }
}
