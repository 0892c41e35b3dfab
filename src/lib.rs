//! tabprep - Tabular data preparation for training and inference
//!
//! Prepares raw tabular data (illustratively, Titanic survival records)
//! for a classification model, keeping train-time and inference-time
//! transformations consistent:
//!
//! - [`data`] - CSV and request-record ingestion
//! - [`preprocessing`] - splitting, column filtering, target cleaning,
//!   one-hot encoding with a persisted column schema, median imputation,
//!   conditional min-max scaling, and the pipeline orchestration
//! - [`features`] - the feature-engineering collaborator seam
//! - [`store`] - persistence of fitted artifacts and Model Info lookup
//!
//! Every fitted transformer is fit on training data only and persisted
//! once per training run; inference retrieves and applies those exact
//! artifacts, reindexing encoded frames to the persisted column schema.

pub mod data;
pub mod error;
pub mod features;
pub mod preprocessing;
pub mod store;

pub use error::{PrepError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::data::{CellValue, DataLoader};
    pub use crate::error::{PrepError, Result};
    pub use crate::features::{FeatureEngineer, PassthroughFeatures};
    pub use crate::preprocessing::{
        DatasetPipeline, DummyEncoder, MedianImputer, MinMaxScaler, ModelType, PipelineConfig,
    };
    pub use crate::store::{
        get_object, save_object, timestamp_now, LocalStore, MemoryStore, ModelInfo, ObjectStore,
    };
}
