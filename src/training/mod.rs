//! Model training module
//!
//! Provides:
//! - Decision trees and Random Forests for classification
//! - Seeded train/test splitting
//! - Accuracy and mean absolute error reporting
//! - The end-to-end [`Trainer`]

mod config;
mod metrics;
mod split;
mod trainer;
pub mod decision_tree;
pub mod random_forest;

pub use config::TrainingConfig;
pub use decision_tree::{DecisionTree, TreeNode};
pub use metrics::{accuracy, mean_absolute_error, ModelMetrics, TrainingReport};
pub use random_forest::{MaxFeatures, RandomForest};
pub use split::{take_rows, train_test_split, TrainTestIndices};
pub use trainer::{train_model, train_model_with_config, TrainedPipeline, Trainer};
