//! Dataset preparation orchestration
//!
//! Two entry points with mirrored stages but distinct fit/apply roles:
//! [`DatasetPipeline::make_dataset`] fits every transformer on training
//! data and persists the artifacts; [`DatasetPipeline::extract_dataset`]
//! retrieves those artifacts and only ever applies them.

use crate::data::{CellValue, DataLoader};
use crate::error::Result;
use crate::features::{FeatureEngineer, PassthroughFeatures};
use crate::store::{get_object, save_object, ModelInfo, ObjectStore};
use polars::prelude::*;
use tracing::{debug, info};

use super::{
    cast_columns_to_string, drop_null_targets, rejoin_target, remove_columns, split_target,
    train_test_split, DummyEncoder, MedianImputer, MinMaxScaler, PipelineConfig,
};

const PASSTHROUGH: &PassthroughFeatures = &PassthroughFeatures;

/// Orchestrates the train and inference data preparation flows over an
/// injected object store and feature-engineering collaborator.
pub struct DatasetPipeline<'a> {
    config: PipelineConfig,
    store: &'a dyn ObjectStore,
    features: &'a dyn FeatureEngineer,
}

impl<'a> DatasetPipeline<'a> {
    pub fn new(config: PipelineConfig, store: &'a dyn ObjectStore) -> Self {
        Self {
            config,
            store,
            features: PASSTHROUGH,
        }
    }

    /// Inject a feature-engineering collaborator.
    pub fn with_features(mut self, features: &'a dyn FeatureEngineer) -> Self {
        self.features = features;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Training entry point: build the train/test datasets from a raw
    /// file and persist the fitted artifacts under `timestamp`-based keys.
    pub fn make_dataset(&self, path: &str, timestamp: i64) -> Result<(DataFrame, DataFrame)> {
        info!(path, "getting data");
        let df = DataLoader::new().load_csv(path)?;

        info!(rows = df.height(), "train/test split");
        let (train, test) = train_test_split(&df, self.config.test_fraction, self.config.seed)?;

        info!("transforming data");
        let (train, test) = self.transform_data(train, test, timestamp)?;

        info!("feature engineering");
        let (train, test) = self.features.engineer_train(train, test)?;

        info!("preparing data for training");
        self.pre_train_prep(train, test, timestamp)
    }

    /// Inference entry point: build a model-ready frame from raw request
    /// records using the artifacts referenced by `model_info`.
    pub fn extract_dataset(
        &self,
        records: &[Vec<CellValue>],
        model_info: &ModelInfo,
    ) -> Result<DataFrame> {
        info!(rows = records.len(), "getting data");
        let df = DataLoader::from_records(records, &self.config.init_cols)?;

        info!("transforming data");
        let df = remove_columns(&df, &self.config.cols_to_remove)?;
        let df = cast_columns_to_string(&df, &self.config.cast_to_string)?;

        debug!("getting encoded columns from store");
        let schema: Vec<String> = get_object(self.store, model_info.object_key("encoders")?)?;
        let df = DummyEncoder::from_schema(schema).apply(&df)?;

        info!("feature engineering");
        let df = self.features.engineer_infer(df)?;

        debug!("getting imputer from store");
        let imputer: MedianImputer = get_object(self.store, model_info.object_key("imputer")?)?;
        let df = imputer.transform(&df)?;

        // The scaler is applied only when the model needs it and a
        // training run actually persisted one.
        if self.config.model_type.requires_scaling() {
            if let Some(key) = model_info.objects.get("scaler") {
                debug!("getting scaler from store");
                let scaler: MinMaxScaler = get_object(self.store, key)?;
                return scaler.transform(&df);
            }
        }

        Ok(df)
    }

    /// First transformation block: column removal, target cleaning,
    /// categorical casting, and schema-aligned encoding.
    fn transform_data(
        &self,
        train: DataFrame,
        test: DataFrame,
        timestamp: i64,
    ) -> Result<(DataFrame, DataFrame)> {
        let target = &self.config.target;

        debug!("removing unnecessary columns");
        let train = remove_columns(&train, &self.config.cols_to_remove)?;
        let test = remove_columns(&test, &self.config.cols_to_remove)?;

        debug!("removing missing targets");
        let train = drop_null_targets(&train, target)?;
        let test = drop_null_targets(&test, target)?;

        let train = cast_columns_to_string(&train, &self.config.cast_to_string)?;
        let test = cast_columns_to_string(&test, &self.config.cast_to_string)?;

        // The target never participates in encoding.
        let (train, train_target) = split_target(&train, target)?;
        let (test, test_target) = split_target(&test, target)?;

        debug!("encoding data");
        let mut encoder = DummyEncoder::new();
        let (train, test) = encoder.fit_align(&train, &test)?;

        let key = save_object(
            self.store,
            &encoder.encoded_columns().to_vec(),
            "encoded_columns",
            timestamp,
        )?;
        debug!(key, columns = encoder.encoded_columns().len(), "saved encoded columns");

        let train = rejoin_target(&train, &train_target)?;
        let test = rejoin_target(&test, &test_target)?;

        Ok((train, test))
    }

    /// Final block before training: imputation and conditional scaling,
    /// fit on train only and applied to both frames.
    fn pre_train_prep(
        &self,
        train: DataFrame,
        test: DataFrame,
        timestamp: i64,
    ) -> Result<(DataFrame, DataFrame)> {
        let target = &self.config.target;

        let (train, train_target) = split_target(&train, target)?;
        let (test, test_target) = split_target(&test, target)?;

        debug!("imputing missing values");
        let mut imputer = MedianImputer::new();
        let (mut train, mut test) = imputer.fit_transform_pair(&train, &test)?;

        let key = save_object(self.store, &imputer, "imputer", timestamp)?;
        debug!(key, "saved imputer");

        if self.config.model_type.requires_scaling() {
            debug!("scaling features");
            let mut scaler = MinMaxScaler::new();
            let (scaled_train, scaled_test) = scaler.fit_transform_pair(&train, &test)?;
            train = scaled_train;
            test = scaled_test;

            let key = save_object(self.store, &scaler, "scaler", timestamp)?;
            debug!(key, "saved scaler");
        }

        let train = rejoin_target(&train, &train_target)?;
        let test = rejoin_target(&test, &test_target)?;

        Ok((train, test))
    }
}
