//! Min-max feature scaling

use crate::error::{PrepError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameters for one fitted column
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalerParams {
    min: f64,
    range: f64,
}

/// Scaler that normalizes each column to [0, 1] using train-derived
/// min/max. Test and inference values outside the train range fall
/// outside [0, 1]; that is expected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    params: HashMap<String, ScalerParams>,
    is_fitted: bool,
}

impl Default for MinMaxScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl MinMaxScaler {
    pub fn new() -> Self {
        Self {
            params: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Fit per-column min/max from training data only.
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        self.params.clear();

        for col in df.get_columns() {
            let casted = col.as_materialized_series().cast(&DataType::Float64)?;
            let ca = casted
                .f64()
                .map_err(|e| PrepError::DataError(e.to_string()))?;

            let min = ca.min().unwrap_or(0.0);
            let max = ca.max().unwrap_or(1.0);
            let range = max - min;

            self.params.insert(
                col.name().to_string(),
                ScalerParams {
                    min,
                    range: if range == 0.0 { 1.0 } else { range },
                },
            );
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Scale every fitted column; columns the scaler was not fitted on
    /// pass through unchanged.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PrepError::NotFitted);
        }

        let mut columns = Vec::with_capacity(df.width());
        for col in df.get_columns() {
            let Some(params) = self.params.get(col.name().as_str()) else {
                columns.push(col.clone());
                continue;
            };

            let casted = col.as_materialized_series().cast(&DataType::Float64)?;
            let ca = casted
                .f64()
                .map_err(|e| PrepError::DataError(e.to_string()))?;

            let scaled: Float64Chunked = ca
                .into_iter()
                .map(|opt| opt.map(|v| (v - params.min) / params.range))
                .collect();

            columns.push(scaled.with_name(col.name().clone()).into_series().into());
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minmax_unit_range() {
        let df = df!("a" => &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

        let mut scaler = MinMaxScaler::new();
        let out = scaler.fit(&df).unwrap().transform(&df).unwrap();

        let col = out.column("a").unwrap().f64().unwrap();
        assert!((col.min().unwrap() - 0.0).abs() < 1e-10);
        assert!((col.max().unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_test_data_uses_train_bounds() {
        let train = df!("a" => &[0.0, 10.0]).unwrap();
        let test = df!("a" => &[20.0]).unwrap();

        let mut scaler = MinMaxScaler::new();
        let (_, test_out) = scaler.fit_transform_pair(&train, &test).unwrap();

        let value = test_out.column("a").unwrap().f64().unwrap().get(0).unwrap();
        // Outside the train range lands outside [0, 1].
        assert_eq!(value, 2.0);
    }

    #[test]
    fn test_constant_column_guard() {
        let df = df!("a" => &[5.0, 5.0, 5.0]).unwrap();

        let mut scaler = MinMaxScaler::new();
        let out = scaler.fit(&df).unwrap().transform(&df).unwrap();

        let col = out.column("a").unwrap().f64().unwrap();
        assert!(col.into_iter().flatten().all(|v| v == 0.0));
    }

    #[test]
    fn test_transform_unfitted_fails() {
        let df = df!("a" => &[1.0]).unwrap();
        let scaler = MinMaxScaler::new();
        assert!(matches!(scaler.transform(&df), Err(PrepError::NotFitted)));
    }
}
