//! Median imputation of missing values

use crate::error::{PrepError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Imputer that fills nulls with per-column medians fit on training data.
///
/// The fitted artifact is serializable so a training run can persist it
/// and inference can apply the exact same medians later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedianImputer {
    columns: Vec<String>,
    medians: HashMap<String, f64>,
    is_fitted: bool,
}

impl Default for MedianImputer {
    fn default() -> Self {
        Self::new()
    }
}

impl MedianImputer {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            medians: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Compute the median of every column from training data only.
    ///
    /// A column with no non-null values has no defined median and fails
    /// with `AllNullColumn`; dropping such columns is the caller's call.
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        self.columns.clear();
        self.medians.clear();

        for col in df.get_columns() {
            let name = col.name().to_string();
            let casted = col.as_materialized_series().cast(&DataType::Float64)?;
            let median = casted
                .f64()
                .map_err(|e| PrepError::DataError(e.to_string()))?
                .median()
                .ok_or_else(|| PrepError::AllNullColumn(name.clone()))?;

            self.columns.push(name.clone());
            self.medians.insert(name, median);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Fill nulls with the fitted medians.
    ///
    /// The frame's column set must equal the fitted column set; any
    /// divergence between fit and apply fails with `SchemaMismatch`.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PrepError::NotFitted);
        }

        self.check_schema(df)?;

        let mut columns = Vec::with_capacity(df.width());
        for col in df.get_columns() {
            let median = self.medians[col.name().as_str()];
            let casted = col.as_materialized_series().cast(&DataType::Float64)?;
            let ca = casted
                .f64()
                .map_err(|e| PrepError::DataError(e.to_string()))?;

            let filled: Float64Chunked = ca
                .into_iter()
                .map(|opt| Some(opt.unwrap_or(median)))
                .collect();

            columns.push(filled.with_name(col.name().clone()).into_series().into());
        }

        DataFrame::new(columns).map_err(|e| PrepError::DataError(e.to_string()))
    }

    /// Fit on train and apply to both train and test in one step.
    pub fn fit_transform_pair(
        &mut self,
        train: &DataFrame,
        test: &DataFrame,
    ) -> Result<(DataFrame, DataFrame)> {
        self.fit(train)?;
        Ok((self.transform(train)?, self.transform(test)?))
    }

    /// Column names the imputer was fitted on, in fit order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn check_schema(&self, df: &DataFrame) -> Result<()> {
        let expected: BTreeSet<&str> = self.columns.iter().map(|s| s.as_str()).collect();
        let actual: BTreeSet<&str> = df
            .get_column_names()
            .iter()
            .map(|n| n.as_str())
            .collect();

        if expected != actual {
            return Err(PrepError::SchemaMismatch {
                expected: expected.into_iter().collect::<Vec<_>>().join(", "),
                actual: actual.into_iter().collect::<Vec<_>>().join(", "),
            });
        }
        Ok(())
    }
}
