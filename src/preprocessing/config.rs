//! Pipeline configuration

use serde::{Deserialize, Serialize};

/// Downstream model family the data is being prepared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    /// Random Forest
    RandomForest,
    /// Gradient Boosted Trees
    GradientBoosting,
    /// Logistic Regression
    LogisticRegression,
    /// Support Vector Machine
    SVM,
    /// K-Nearest Neighbors
    KNN,
    /// Naive Bayes
    NaiveBayes,
}

impl ModelType {
    /// Distance-sensitive models get min-max scaled features; tree
    /// ensembles do not.
    pub fn requires_scaling(&self) -> bool {
        matches!(self, ModelType::SVM | ModelType::KNN | ModelType::NaiveBayes)
    }
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::RandomForest
    }
}

/// Configuration for a dataset preparation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Dependent variable name
    pub target: String,

    /// Columns dropped before any transformation (strict: all must exist)
    pub cols_to_remove: Vec<String>,

    /// Columns cast to string so they one-hot encode as categoricals
    pub cast_to_string: Vec<String>,

    /// Fixed column ordering of inference request records
    pub init_cols: Vec<String>,

    /// Downstream model family
    pub model_type: ModelType,

    /// Fraction of rows held out for test
    pub test_fraction: f64,

    /// Seed for the row-random split
    pub seed: u64,
}

impl PipelineConfig {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            cols_to_remove: Vec::new(),
            cast_to_string: Vec::new(),
            init_cols: Vec::new(),
            model_type: ModelType::default(),
            test_fraction: 0.2,
            seed: 42,
        }
    }

    pub fn with_cols_to_remove(mut self, cols: Vec<String>) -> Self {
        self.cols_to_remove = cols;
        self
    }

    pub fn with_cast_to_string(mut self, cols: Vec<String>) -> Self {
        self.cast_to_string = cols;
        self
    }

    pub fn with_init_cols(mut self, cols: Vec<String>) -> Self {
        self.init_cols = cols;
        self
    }

    pub fn with_model_type(mut self, model_type: ModelType) -> Self {
        self.model_type = model_type;
        self
    }

    pub fn with_test_fraction(mut self, fraction: f64) -> Self {
        self.test_fraction = fraction;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
