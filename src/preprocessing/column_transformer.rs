//! Column-wise preprocessing branches
//!
//! A [`ColumnTransformer`] routes named columns through independent
//! [`Branch`]es and concatenates their outputs, in branch order, into a single
//! feature matrix. Columns no branch names are dropped.

use super::encoder::{HandleUnknown, OneHotEncoder};
use super::imputer::{ImputeStrategy, Imputer};
use super::scaler::Scaler;
use crate::error::{Result, TitanicError};
use ndarray::{concatenate, Array2, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a branch reads its input columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Cast to Float64
    Numeric,
    /// Cast to String; integers become their decimal text
    Categorical,
}

/// One step of a branch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Step {
    Impute(Imputer),
    Scale(Scaler),
    Encode(OneHotEncoder),
}

impl Step {
    fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        match self {
            Step::Impute(imputer) => imputer.fit_transform(df, columns),
            Step::Scale(scaler) => scaler.fit_transform(df, columns),
            Step::Encode(encoder) => encoder.fit_transform(df, columns),
        }
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        match self {
            Step::Impute(imputer) => imputer.transform(df),
            Step::Scale(scaler) => scaler.transform(df),
            Step::Encode(encoder) => encoder.transform(df),
        }
    }

    fn is_fitted(&self) -> bool {
        match self {
            Step::Impute(imputer) => imputer.is_fitted(),
            Step::Scale(scaler) => scaler.is_fitted(),
            Step::Encode(encoder) => encoder.is_fitted(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Step::Impute(_) => "imputer",
            Step::Scale(_) => "scaler",
            Step::Encode(_) => "onehot",
        }
    }
}

/// A named list of columns and the steps applied to them in sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    name: String,
    kind: ColumnKind,
    columns: Vec<String>,
    steps: Vec<Step>,
    output_names: Vec<String>,
}

impl Branch {
    pub fn new(name: impl Into<String>, kind: ColumnKind, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            steps: Vec::new(),
            output_names: Vec::new(),
        }
    }

    /// Median imputation followed by standard scaling
    pub fn numeric(name: impl Into<String>, columns: &[&str]) -> Self {
        Self::new(name, ColumnKind::Numeric, columns)
            .with_step(Step::Impute(Imputer::new(ImputeStrategy::Median)))
            .with_step(Step::Scale(Scaler::new()))
    }

    /// Constant `"missing"` imputation followed by one-hot encoding that
    /// ignores unseen categories
    pub fn categorical(name: impl Into<String>, columns: &[&str]) -> Self {
        Self::new(name, ColumnKind::Categorical, columns)
            .with_step(Step::Impute(Imputer::new(ImputeStrategy::ConstantString(
                "missing".to_string(),
            ))))
            .with_step(Step::Encode(OneHotEncoder::new(HandleUnknown::Ignore)))
    }

    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_fitted(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(Step::is_fitted)
    }

    /// Output feature names, available after fit
    pub fn feature_names(&self) -> &[String] {
        &self.output_names
    }

    /// Fit every step on the branch's columns, each step seeing the previous
    /// step's output
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<Array2<f64>> {
        let mut current = self.select(df)?;
        let mut names: Vec<String> = self.columns.clone();

        for step in &mut self.steps {
            let cols: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
            current = step.fit_transform(&current, &cols)?;
            if let Step::Encode(encoder) = step {
                names = encoder.feature_names();
            }
            debug!(branch = %self.name, step = step.name(), width = current.width(), "Fitted step");
        }

        self.output_names = names;
        columns_to_array2(&current, &self.output_names)
    }

    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted() {
            return Err(TitanicError::ModelNotFitted);
        }

        let mut current = self.select(df)?;
        for step in &self.steps {
            current = step.transform(&current)?;
        }

        columns_to_array2(&current, &self.output_names)
    }

    /// Sub-frame holding only this branch's columns, cast to the branch kind
    fn select(&self, df: &DataFrame) -> Result<DataFrame> {
        let target = match self.kind {
            ColumnKind::Numeric => DataType::Float64,
            ColumnKind::Categorical => DataType::String,
        };

        let columns = self
            .columns
            .iter()
            .map(|name| {
                let column = df
                    .column(name)
                    .map_err(|_| TitanicError::FeatureNotFound(name.clone()))?;
                column
                    .as_materialized_series()
                    .strict_cast(&target)
                    .map(Column::from)
                    .map_err(|e| TitanicError::Data(format!("column {}: {}", name, e)))
            })
            .collect::<Result<Vec<Column>>>()?;

        Ok(DataFrame::new(columns)?)
    }
}

/// Applies branches side by side and concatenates their outputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnTransformer {
    branches: Vec<Branch>,
    is_fitted: bool,
}

impl ColumnTransformer {
    pub fn new(branches: Vec<Branch>) -> Self {
        Self {
            branches,
            is_fitted: false,
        }
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Every input column any branch reads
    pub fn input_columns(&self) -> Vec<&str> {
        self.branches
            .iter()
            .flat_map(|b| b.columns().iter().map(|c| c.as_str()))
            .collect()
    }

    /// Concatenated output feature names, available after fit
    pub fn feature_names(&self) -> Vec<String> {
        self.branches
            .iter()
            .flat_map(|b| {
                b.feature_names()
                    .iter()
                    .map(move |f| format!("{}__{}", b.name(), f))
            })
            .collect()
    }

    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<Array2<f64>> {
        let blocks = self
            .branches
            .iter_mut()
            .map(|b| b.fit_transform(df))
            .collect::<Result<Vec<_>>>()?;

        self.is_fitted = true;
        hstack(&blocks, df.height())
    }

    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        self.fit_transform(df)?;
        Ok(self)
    }

    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(TitanicError::ModelNotFitted);
        }

        let blocks = self
            .branches
            .iter()
            .map(|b| b.transform(df))
            .collect::<Result<Vec<_>>>()?;

        hstack(&blocks, df.height())
    }
}

fn hstack(blocks: &[Array2<f64>], n_rows: usize) -> Result<Array2<f64>> {
    if blocks.is_empty() {
        return Ok(Array2::zeros((n_rows, 0)));
    }
    let views: Vec<_> = blocks.iter().map(|b| b.view()).collect();
    Ok(concatenate(Axis(1), &views)?)
}

/// Extract named columns into a row-major `Array2<f64>`; nulls become 0.
pub fn columns_to_array2(df: &DataFrame, col_names: &[String]) -> Result<Array2<f64>> {
    let n_rows = df.height();
    let n_cols = col_names.len();

    let col_data: Vec<Vec<f64>> = col_names
        .iter()
        .map(|col_name| {
            let column = df
                .column(col_name)
                .map_err(|_| TitanicError::FeatureNotFound(col_name.clone()))?;
            let values = column.cast(&DataType::Float64)?;
            Ok(values
                .f64()?
                .into_iter()
                .map(|v| v.unwrap_or(0.0))
                .collect())
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    Ok(Array2::from_shape_fn((n_rows, n_cols), |(r, c)| col_data[c][r]))
}
