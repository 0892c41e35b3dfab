//! Integration test: dataset preparation end-to-end
//!
//! Runs the training flow on a Titanic-shaped CSV, then feeds raw
//! request records through the inference flow using the persisted
//! artifacts, checking the train/inference schema alignment contract.

use polars::prelude::*;
use std::io::Write;
use tabprep::prelude::*;
use tempfile::NamedTempFile;

fn titanic_csv() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "PassengerId,Pclass,Sex,Age,Fare,Embarked,Survived").unwrap();
    writeln!(file, "1,3,male,22,7.25,S,0").unwrap();
    writeln!(file, "2,1,female,38,71.28,C,1").unwrap();
    writeln!(file, "3,3,female,26,7.92,S,1").unwrap();
    writeln!(file, "4,1,female,35,53.1,S,1").unwrap();
    writeln!(file, "5,3,male,,8.05,S,0").unwrap();
    writeln!(file, "6,3,male,27,8.46,Q,0").unwrap();
    writeln!(file, "7,1,male,54,51.86,S,0").unwrap();
    writeln!(file, "8,3,male,2,21.07,S,").unwrap();
    writeln!(file, "9,2,female,27,11.13,S,1").unwrap();
    writeln!(file, "10,2,female,14,30.07,C,1").unwrap();
    file
}

fn titanic_config() -> PipelineConfig {
    PipelineConfig::new("Survived")
        .with_cols_to_remove(vec!["PassengerId".to_string()])
        .with_cast_to_string(vec!["Pclass".to_string()])
        .with_init_cols(
            ["PassengerId", "Pclass", "Sex", "Age", "Fare", "Embarked"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect()
}

fn model_info(timestamp: i64) -> ModelInfo {
    ModelInfo::new()
        .with_object("encoders", format!("encoded_columns_{timestamp}"))
        .with_object("imputer", format!("imputer_{timestamp}"))
}

#[test]
fn test_make_dataset_outputs_aligned_frames() {
    let file = titanic_csv();
    let store = MemoryStore::new();
    let pipeline = DatasetPipeline::new(titanic_config(), &store);

    let (train, test) = pipeline
        .make_dataset(file.path().to_str().unwrap(), 1700000000)
        .unwrap();

    // One row has a null target; it is dropped from whichever split it
    // landed in.
    assert_eq!(train.height() + test.height(), 9);

    // Train and test end with identical columns, target last.
    let train_cols = column_names(&train);
    let test_cols = column_names(&test);
    assert_eq!(train_cols, test_cols);
    assert_eq!(train_cols.last().unwrap(), "Survived");

    // No categorical column survives encoding.
    for col in train.get_columns() {
        assert_ne!(col.dtype(), &DataType::String, "{} is still a string", col.name());
    }

    // All feature nulls were imputed; only the target may carry nulls.
    for col in train.get_columns().iter().chain(test.get_columns()) {
        if col.name().as_str() != "Survived" {
            assert_eq!(col.null_count(), 0, "{} still has nulls", col.name());
        }
    }
}

#[test]
fn test_make_dataset_is_deterministic() {
    let file = titanic_csv();
    let store = MemoryStore::new();
    let pipeline = DatasetPipeline::new(titanic_config(), &store);
    let path = file.path().to_str().unwrap();

    let (train_a, test_a) = pipeline.make_dataset(path, 1).unwrap();
    let (train_b, test_b) = pipeline.make_dataset(path, 1).unwrap();

    assert!(train_a.equals_missing(&train_b));
    assert!(test_a.equals_missing(&test_b));
}

#[test]
fn test_persisted_schema_matches_training_features() {
    let file = titanic_csv();
    let store = MemoryStore::new();
    let pipeline = DatasetPipeline::new(titanic_config(), &store);

    let (train, _) = pipeline
        .make_dataset(file.path().to_str().unwrap(), 42)
        .unwrap();

    let schema: Vec<String> = get_object(&store, "encoded_columns_42").unwrap();
    let feature_cols: Vec<String> = column_names(&train)
        .into_iter()
        .filter(|n| n != "Survived")
        .collect();
    assert_eq!(schema, feature_cols);
}

#[test]
fn test_extract_dataset_reindexes_to_schema() {
    let file = titanic_csv();
    let store = MemoryStore::new();
    let pipeline = DatasetPipeline::new(titanic_config(), &store);

    let (train, _) = pipeline
        .make_dataset(file.path().to_str().unwrap(), 7)
        .unwrap();

    // A request record with a null age; Pclass arrives as an integer and
    // must encode against the same dummy names the training run produced.
    let records = vec![vec![
        CellValue::Int(11),
        CellValue::Int(3),
        CellValue::Str("male".to_string()),
        CellValue::Null,
        CellValue::Float(9.22),
        CellValue::Str("S".to_string()),
    ]];

    let out = pipeline.extract_dataset(&records, &model_info(7)).unwrap();

    let feature_cols: Vec<String> = column_names(&train)
        .into_iter()
        .filter(|n| n != "Survived")
        .collect();
    assert_eq!(column_names(&out), feature_cols);
    assert_eq!(out.height(), 1);

    for col in out.get_columns() {
        assert_eq!(col.null_count(), 0, "{} still has nulls", col.name());
    }
}

#[test]
fn test_extract_dataset_missing_artifact_fails() {
    let file = titanic_csv();
    let store = MemoryStore::new();
    let pipeline = DatasetPipeline::new(titanic_config(), &store);
    pipeline
        .make_dataset(file.path().to_str().unwrap(), 3)
        .unwrap();

    let records = vec![vec![
        CellValue::Int(11),
        CellValue::Int(3),
        CellValue::Str("male".to_string()),
        CellValue::Null,
        CellValue::Float(9.22),
        CellValue::Str("S".to_string()),
    ]];

    // Model Info without an imputer key cannot complete the flow.
    let incomplete = ModelInfo::new().with_object("encoders", "encoded_columns_3");
    let result = pipeline.extract_dataset(&records, &incomplete);
    assert!(matches!(result, Err(PrepError::ArtifactNotFound(_))));
}

#[test]
fn test_distance_model_scales_features() {
    let file = titanic_csv();
    let store = MemoryStore::new();
    let config = titanic_config().with_model_type(ModelType::KNN);
    let pipeline = DatasetPipeline::new(config, &store);

    let (train, _) = pipeline
        .make_dataset(file.path().to_str().unwrap(), 99)
        .unwrap();

    // Train features land in [0, 1] after min-max scaling.
    for col in train.get_columns() {
        if col.name().as_str() == "Survived" {
            continue;
        }
        let ca = col
            .as_materialized_series()
            .cast(&DataType::Float64)
            .unwrap();
        let ca = ca.f64().unwrap();
        assert!(ca.min().unwrap() >= -1e-12, "{} below 0", col.name());
        assert!(ca.max().unwrap() <= 1.0 + 1e-12, "{} above 1", col.name());
    }

    // The scaler was persisted and inference applies it.
    let info = model_info(99).with_object("scaler", "scaler_99");
    let records = vec![vec![
        CellValue::Int(11),
        CellValue::Int(1),
        CellValue::Str("female".to_string()),
        CellValue::Float(29.0),
        CellValue::Float(26.55),
        CellValue::Str("C".to_string()),
    ]];
    let out = pipeline.extract_dataset(&records, &info).unwrap();
    assert_eq!(out.height(), 1);
}

#[test]
fn test_tree_model_skips_scaling() {
    let file = titanic_csv();
    let store = MemoryStore::new();
    let pipeline = DatasetPipeline::new(titanic_config(), &store);

    pipeline
        .make_dataset(file.path().to_str().unwrap(), 5)
        .unwrap();

    // No scaler artifact is written for a RandomForest run.
    let result: tabprep::Result<MinMaxScaler> = get_object(&store, "scaler_5");
    assert!(matches!(result, Err(PrepError::ArtifactNotFound(_))));
}

/// Collaborator that derives one feature on both paths, checking the
/// seam keeps fitted artifacts aligned across train and inference.
struct DoubledFare;

impl DoubledFare {
    fn add(df: DataFrame) -> tabprep::Result<DataFrame> {
        let fare = df
            .column("Fare")?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        let doubled: Float64Chunked = fare
            .f64()
            .unwrap()
            .into_iter()
            .map(|opt| opt.map(|v| v * 2.0))
            .collect();
        Ok(df.hstack(&[doubled
            .with_name("FareDoubled".into())
            .into_series()
            .into()])?)
    }
}

impl FeatureEngineer for DoubledFare {
    fn engineer_train(
        &self,
        train: DataFrame,
        test: DataFrame,
    ) -> tabprep::Result<(DataFrame, DataFrame)> {
        Ok((Self::add(train)?, Self::add(test)?))
    }

    fn engineer_infer(&self, df: DataFrame) -> tabprep::Result<DataFrame> {
        Self::add(df)
    }
}

#[test]
fn test_injected_feature_engineering_stays_aligned() {
    let file = titanic_csv();
    let store = MemoryStore::new();
    let features = DoubledFare;
    let pipeline = DatasetPipeline::new(titanic_config(), &store).with_features(&features);

    let (train, _) = pipeline
        .make_dataset(file.path().to_str().unwrap(), 11)
        .unwrap();
    assert!(train.column("FareDoubled").is_ok());

    let records = vec![vec![
        CellValue::Int(11),
        CellValue::Int(2),
        CellValue::Str("female".to_string()),
        CellValue::Float(30.0),
        CellValue::Float(12.35),
        CellValue::Str("S".to_string()),
    ]];
    let out = pipeline.extract_dataset(&records, &model_info(11)).unwrap();

    // Imputer was fitted with the derived column present, so inference
    // only succeeds because the engineered schema matches.
    assert!(out.column("FareDoubled").is_ok());
    let doubled = out.column("FareDoubled").unwrap().f64().unwrap().get(0).unwrap();
    assert_eq!(doubled, 24.7);
}
