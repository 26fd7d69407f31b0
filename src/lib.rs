//! Titanic survival modelling
//!
//! Loads the passenger manifest, derives title, ticket and family features,
//! and trains a random forest behind a column-wise preprocessing pipeline.
//!
//! # Modules
//!
//! - [`utils`] - CSV loading and saving
//! - [`feature_engineering`] - Derived passenger features
//! - [`preprocessing`] - Imputation, scaling, one-hot encoding, column transformer
//! - [`pipeline`] - Preprocessor plus classifier as one estimator
//! - [`training`] - Trees, forests, splitting, metrics and the trainer
//! - [`cli`] - Command-line interface
//!
//! ```no_run
//! use titanic::prelude::*;
//!
//! let df = load_data("train.csv")?;
//! let df = clean_data(df)?;
//! let trained = train_model(&df)?;
//! println!("{}", trained.report);
//! # Ok::<(), titanic::TitanicError>(())
//! ```

// Core error handling
pub mod error;

// Data
pub mod utils;
pub mod feature_engineering;

// Model
pub mod preprocessing;
pub mod pipeline;
pub mod training;

// Services
pub mod cli;

pub use error::{Result, TitanicError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Result, TitanicError};

    pub use crate::utils::{load_data, DataLoader, DataSaver};

    pub use crate::feature_engineering::{clean_data, FamilyType, FeatureBuilder};

    pub use crate::preprocessing::{Branch, ColumnTransformer, ImputeStrategy, OneHotEncoder, Scaler};

    pub use crate::pipeline::{build_pipeline, make_pipeline, ModelPipeline};

    pub use crate::training::{
        train_model, train_model_with_config, ModelMetrics, RandomForest, TrainedPipeline,
        Trainer, TrainingConfig, TrainingReport,
    };
}
