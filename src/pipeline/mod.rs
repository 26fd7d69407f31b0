//! Preprocessing plus classifier as one estimator
//!
//! [`make_pipeline`] assembles the survival model: a numeric branch for
//! `Fare` (median impute, standard scale) and a categorical branch for the
//! class, title, port, family and ticket columns (constant `"missing"` impute,
//! one-hot ignoring unseen values), feeding a seeded random forest.

use crate::error::{Result, TitanicError};
use crate::feature_engineering::columns;
use crate::preprocessing::{Branch, ColumnTransformer};
use crate::training::{MaxFeatures, RandomForest};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Numeric inputs, in output order
pub const NUMERIC_FEATURES: [&str; 1] = [columns::FARE];

/// Categorical inputs, in output order
pub const CATEGORICAL_FEATURES: [&str; 6] = [
    columns::PCLASS,
    columns::TITLE,
    columns::EMBARKED,
    columns::FAM_TYPE,
    columns::TICKET_LEN,
    columns::TICKET_2LETTER,
];

pub const DEFAULT_N_ESTIMATORS: usize = 100;
pub const DEFAULT_RANDOM_STATE: u64 = 42;

/// Column transformer followed by a random forest classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPipeline {
    preprocessor: ColumnTransformer,
    classifier: RandomForest,
}

/// Fresh, unfitted survival pipeline with the default forest
pub fn make_pipeline() -> ModelPipeline {
    build_pipeline(DEFAULT_N_ESTIMATORS, DEFAULT_RANDOM_STATE)
}

/// Fresh, unfitted survival pipeline with a custom forest size and seed
pub fn build_pipeline(n_estimators: usize, random_state: u64) -> ModelPipeline {
    let preprocessor = ColumnTransformer::new(vec![
        Branch::numeric("num", &NUMERIC_FEATURES),
        Branch::categorical("cat", &CATEGORICAL_FEATURES),
    ]);

    let classifier = RandomForest::new(n_estimators)
        .with_max_features(MaxFeatures::Sqrt)
        .with_bootstrap(true)
        .with_random_state(random_state);

    ModelPipeline::new(preprocessor, classifier)
}

impl ModelPipeline {
    pub fn new(preprocessor: ColumnTransformer, classifier: RandomForest) -> Self {
        Self {
            preprocessor,
            classifier,
        }
    }

    pub fn preprocessor(&self) -> &ColumnTransformer {
        &self.preprocessor
    }

    pub fn classifier(&self) -> &RandomForest {
        &self.classifier
    }

    pub fn is_fitted(&self) -> bool {
        self.preprocessor.is_fitted() && self.classifier.is_fitted()
    }

    /// Encoded feature names, available after fit
    pub fn feature_names(&self) -> Vec<String> {
        self.preprocessor.feature_names()
    }

    /// Fit the preprocessor on `df`, then the forest on the encoded matrix
    pub fn fit(&mut self, df: &DataFrame, y: &Array1<f64>) -> Result<&mut Self> {
        if df.height() != y.len() {
            return Err(TitanicError::Shape {
                expected: format!("{} labels", df.height()),
                actual: format!("{} labels", y.len()),
            });
        }

        let start = Instant::now();
        let x = self.preprocessor.fit_transform(df)?;
        debug!(rows = x.nrows(), features = x.ncols(), "Encoded training matrix");

        self.classifier.fit(&x, y)?;

        info!(
            rows = x.nrows(),
            features = x.ncols(),
            trees = self.classifier.n_trees(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Pipeline fitted"
        );
        Ok(self)
    }

    /// Encode `df` with the fitted preprocessor
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted() {
            return Err(TitanicError::ModelNotFitted);
        }
        self.preprocessor.transform(df)
    }

    pub fn predict(&self, df: &DataFrame) -> Result<Array1<f64>> {
        let x = self.transform(df)?;
        self.classifier.predict(&x)
    }

    /// Per-class probabilities, columns ordered as [`RandomForest::classes`]
    pub fn predict_proba(&self, df: &DataFrame) -> Result<Array2<f64>> {
        let x = self.transform(df)?;
        self.classifier.predict_proba(&x)
    }

    /// Mean accuracy on `df` against `y`
    pub fn score(&self, df: &DataFrame, y: &Array1<f64>) -> Result<f64> {
        let predictions = self.predict(df)?;
        crate::training::accuracy(y, &predictions)
    }
}
