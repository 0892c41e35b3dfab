//! Feature engineering seam
//!
//! Feature derivation is an external collaborator: the pipeline only
//! depends on this trait and never assumes anything about what features
//! get added, beyond train and inference producing the same columns.

use crate::error::Result;
use polars::prelude::*;

/// Table-to-table feature derivation.
///
/// `engineer_train` receives the paired train/test frames (target still
/// attached); `engineer_infer` receives a single inference frame. Both
/// must derive the same feature columns so fitted artifacts line up
/// across train and inference.
pub trait FeatureEngineer {
    fn engineer_train(&self, train: DataFrame, test: DataFrame) -> Result<(DataFrame, DataFrame)>;

    fn engineer_infer(&self, df: DataFrame) -> Result<DataFrame>;
}

/// No-op collaborator used when no feature engineering is injected.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFeatures;

impl FeatureEngineer for PassthroughFeatures {
    fn engineer_train(&self, train: DataFrame, test: DataFrame) -> Result<(DataFrame, DataFrame)> {
        Ok((train, test))
    }

    fn engineer_infer(&self, df: DataFrame) -> Result<DataFrame> {
        Ok(df)
    }
}
