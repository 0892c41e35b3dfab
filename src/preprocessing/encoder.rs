//! Categorical one-hot encoding with a persisted column schema
//!
//! Training fits the encoder on train and test together: both frames are
//! one-hot encoded independently, then reduced to their column
//! intersection so neither side carries a dummy column the other lacks.
//! The surviving column list is the schema that guarantees inference-time
//! frames line up column-for-column with whatever was trained.
//!
//! The intersection silently discards categories present on only one side
//! of the split, and the inference reindex drops categories unseen at
//! training time. Both are intentional and pinned by tests.

use crate::error::{PrepError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// One-hot encoder keyed by an ordered encoded-column schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DummyEncoder {
    encoded_columns: Vec<String>,
    is_fitted: bool,
}

impl Default for DummyEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyEncoder {
    pub fn new() -> Self {
        Self {
            encoded_columns: Vec::new(),
            is_fitted: false,
        }
    }

    /// Reconstruct an apply-mode encoder from a persisted schema.
    pub fn from_schema(encoded_columns: Vec<String>) -> Self {
        Self {
            encoded_columns,
            is_fitted: true,
        }
    }

    /// The ordered column schema produced by the last fit.
    pub fn encoded_columns(&self) -> &[String] {
        &self.encoded_columns
    }

    /// Fit mode: one-hot encode train and test independently, keep only
    /// the columns present in both (train's order), and record that
    /// column list as the schema.
    ///
    /// Both frames must already have the target separated out.
    pub fn fit_align(
        &mut self,
        train: &DataFrame,
        test: &DataFrame,
    ) -> Result<(DataFrame, DataFrame)> {
        let train_enc = one_hot(train)?;
        let test_enc = one_hot(test)?;

        let test_cols: HashSet<&str> = test_enc
            .get_column_names()
            .iter()
            .map(|n| n.as_str())
            .collect();

        let shared: Vec<String> = train_enc
            .get_column_names()
            .iter()
            .filter(|n| test_cols.contains(n.as_str()))
            .map(|n| n.to_string())
            .collect();

        let train_aligned = select_columns(&train_enc, &shared)?;
        let test_aligned = select_columns(&test_enc, &shared)?;

        self.encoded_columns = shared;
        self.is_fitted = true;

        Ok((train_aligned, test_aligned))
    }

    /// Apply mode: one-hot encode, then reindex to exactly the schema.
    /// Schema columns absent from the input are zero-filled; input
    /// columns not in the schema are dropped. The output has exactly the
    /// schema's columns, in order.
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PrepError::NotFitted);
        }

        let encoded = one_hot(df)?;
        let height = encoded.height();

        let mut columns = Vec::with_capacity(self.encoded_columns.len());
        for name in &self.encoded_columns {
            match encoded.column(name) {
                Ok(col) => columns.push(col.clone()),
                Err(_) => columns.push(Column::new(name.as_str().into(), vec![0.0f64; height])),
            }
        }

        DataFrame::new(columns).map_err(|e| PrepError::DataError(e.to_string()))
    }
}

/// One-hot encode every string-typed column, leaving the rest in place.
///
/// Dummy columns are named `"{column}_{category}"` with categories in
/// sorted order; null cells encode to zero in every dummy. Non-string
/// columns keep their original order, dummies follow.
fn one_hot(df: &DataFrame) -> Result<DataFrame> {
    let mut passthrough: Vec<Column> = Vec::new();
    let mut dummies: Vec<Column> = Vec::new();

    for col in df.get_columns() {
        if col.dtype() != &DataType::String {
            passthrough.push(col.clone());
            continue;
        }

        let ca = col.as_materialized_series().str()?;
        let values: Vec<Option<&str>> = ca.into_iter().collect();
        let categories: BTreeSet<&str> = values.iter().flatten().copied().collect();

        for category in categories {
            let name = format!("{}_{}", col.name(), category);
            let indicator: Vec<i32> = values
                .iter()
                .map(|v| i32::from(*v == Some(category)))
                .collect();
            dummies.push(Column::new(name.into(), indicator));
        }
    }

    passthrough.extend(dummies);
    DataFrame::new(passthrough).map_err(|e| PrepError::DataError(e.to_string()))
}

fn select_columns(df: &DataFrame, names: &[String]) -> Result<DataFrame> {
    let columns: Vec<Column> = names
        .iter()
        .map(|name| df.column(name).map(|c| c.clone()))
        .collect::<PolarsResult<_>>()?;
    DataFrame::new(columns).map_err(|e| PrepError::DataError(e.to_string()))
}
