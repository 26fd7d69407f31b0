//! End-to-end training: split, fit, evaluate

use super::config::TrainingConfig;
use super::metrics::{ModelMetrics, TrainingReport};
use super::split::{take_rows, train_test_split};
use crate::error::{Result, TitanicError};
use crate::pipeline::{build_pipeline, ModelPipeline};
use ndarray::Array1;
use polars::prelude::*;
use std::time::Instant;
use tracing::info;

/// A fitted pipeline and its train/test metrics
#[derive(Debug, Clone)]
pub struct TrainedPipeline {
    pub pipeline: ModelPipeline,
    pub report: TrainingReport,
}

/// Runs the split, fit and evaluation for one configuration
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train on a frame that already carries the engineered feature columns
    pub fn train(&self, df: &DataFrame) -> Result<TrainedPipeline> {
        self.config.validate()?;
        let start = Instant::now();

        let labels = extract_labels(df, &self.config.target_column)?;
        let split = train_test_split(df.height(), self.config.test_size, self.config.split_seed)?;

        let train_df = take_rows(df, &split.train)?;
        let test_df = take_rows(df, &split.test)?;
        let y_train = labels.select(ndarray::Axis(0), &split.train);
        let y_test = labels.select(ndarray::Axis(0), &split.test);

        info!(
            train_rows = train_df.height(),
            test_rows = test_df.height(),
            seed = self.config.split_seed,
            "Split data"
        );

        let mut pipeline = build_pipeline(self.config.n_estimators, self.config.forest_seed);
        pipeline.fit(&train_df, &y_train)?;

        let train_data = ModelMetrics::compute(&y_train, &pipeline.predict(&train_df)?)?;
        let test_data = ModelMetrics::compute(&y_test, &pipeline.predict(&test_df)?)?;
        let report = TrainingReport {
            train_data,
            test_data,
        };

        info!(
            train_score = train_data.score,
            train_mae = train_data.mae,
            test_score = test_data.score,
            test_mae = test_data.mae,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Training complete"
        );

        Ok(TrainedPipeline { pipeline, report })
    }
}

/// Train with the default configuration
pub fn train_model(df: &DataFrame) -> Result<TrainedPipeline> {
    train_model_with_config(df, &TrainingConfig::default())
}

pub fn train_model_with_config(df: &DataFrame, config: &TrainingConfig) -> Result<TrainedPipeline> {
    Trainer::new(config.clone()).train(df)
}

fn extract_labels(df: &DataFrame, target: &str) -> Result<Array1<f64>> {
    let column = df
        .column(target)
        .map_err(|_| TitanicError::FeatureNotFound(target.to_string()))?;

    if column.null_count() > 0 {
        return Err(TitanicError::Validation(format!(
            "Label column {} has {} null values",
            target,
            column.null_count()
        )));
    }

    let values = column
        .as_materialized_series()
        .strict_cast(&DataType::Float64)
        .map_err(|e| TitanicError::Data(format!("column {}: {}", target, e)))?;

    Ok(values.f64()?.into_no_null_iter().collect())
}
