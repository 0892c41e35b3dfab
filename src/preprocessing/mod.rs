//! Data preparation transforms
//!
//! Fitted transformers (encoder, imputer, scaler) separate fitting from
//! applying: statistics come from training data only, and inference data
//! is only ever transformed. Shared column-level helpers live here.

mod config;
mod encoder;
mod imputer;
mod pipeline;
mod scaler;
mod split;

pub use config::{ModelType, PipelineConfig};
pub use encoder::DummyEncoder;
pub use imputer::MedianImputer;
pub use pipeline::DatasetPipeline;
pub use scaler::MinMaxScaler;
pub use split::train_test_split;

use crate::error::{PrepError, Result};
use polars::prelude::*;

/// Drop a caller-specified set of columns. Strict: any absent name fails.
pub fn remove_columns(df: &DataFrame, names: &[String]) -> Result<DataFrame> {
    let mut result = df.clone();
    for name in names {
        if result.column(name).is_err() {
            return Err(PrepError::ColumnNotFound(name.clone()));
        }
        result = result.drop(name)?;
    }
    Ok(result)
}

/// Remove every row whose target value is null, preserving the order of
/// the kept rows.
pub fn drop_null_targets(df: &DataFrame, target: &str) -> Result<DataFrame> {
    let column = df
        .column(target)
        .map_err(|_| PrepError::ColumnNotFound(target.to_string()))?;
    let mask = column.as_materialized_series().is_not_null();
    Ok(df.filter(&mask)?)
}

/// Cast the named columns to string type so they one-hot encode as
/// categoricals (e.g. an integer class discriminator like `Pclass`).
pub fn cast_columns_to_string(df: &DataFrame, names: &[String]) -> Result<DataFrame> {
    let mut result = df.clone();
    for name in names {
        let column = result
            .column(name)
            .map_err(|_| PrepError::ColumnNotFound(name.clone()))?;
        let casted = column.as_materialized_series().cast(&DataType::String)?;
        result.replace(name, casted)?;
    }
    Ok(result)
}

/// Separate the target column from the feature frame.
pub fn split_target(df: &DataFrame, target: &str) -> Result<(DataFrame, Column)> {
    let column = df
        .column(target)
        .map_err(|_| PrepError::ColumnNotFound(target.to_string()))?
        .clone();
    let features = df.drop(target)?;
    Ok((features, column))
}

/// Rejoin a previously separated target column to the feature frame.
pub fn rejoin_target(df: &DataFrame, target: &Column) -> Result<DataFrame> {
    Ok(df.hstack(&[target.clone()])?)
}
