//! Missing value imputation strategies

use crate::error::{Result, TitanicError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Strategy for imputing missing values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace with median (numeric only)
    Median,
    /// Replace with the most frequent value
    MostFrequent,
    /// Replace with a constant category
    ConstantString(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum ImputeValue {
    Numeric(f64),
    String(String),
}

/// Imputer for handling missing values.
///
/// Fill values are learned per column at fit time and reused unchanged by
/// every later `transform`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Imputer {
    strategy: ImputeStrategy,
    fill_values: HashMap<String, ImputeValue>,
    is_fitted: bool,
}

impl Imputer {
    /// Create a new imputer with the specified strategy
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            strategy,
            fill_values: HashMap::new(),
            is_fitted: false,
        }
    }

    pub fn strategy(&self) -> &ImputeStrategy {
        &self.strategy
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Fit the imputer to the data
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        self.fill_values.clear();

        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| TitanicError::FeatureNotFound(col_name.to_string()))?;

            let fill_value = self.compute_fill_value(column.as_materialized_series())?;
            self.fill_values.insert(col_name.to_string(), fill_value);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Transform the data by imputing missing values
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(TitanicError::ModelNotFitted);
        }

        let mut result = df.clone();

        for (col_name, fill_value) in &self.fill_values {
            let column = df
                .column(col_name)
                .map_err(|_| TitanicError::FeatureNotFound(col_name.clone()))?;
            let filled = Self::fill_series(column.as_materialized_series(), fill_value)?;
            result.with_column(filled)?;
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Learned fill value for a numeric column
    pub fn numeric_fill(&self, column: &str) -> Option<f64> {
        match self.fill_values.get(column) {
            Some(ImputeValue::Numeric(v)) => Some(*v),
            _ => None,
        }
    }

    /// Learned fill value for a categorical column
    pub fn string_fill(&self, column: &str) -> Option<&str> {
        match self.fill_values.get(column) {
            Some(ImputeValue::String(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    fn compute_fill_value(&self, series: &Series) -> Result<ImputeValue> {
        match &self.strategy {
            ImputeStrategy::Median => {
                let median = float_values(series)?.median().unwrap_or(0.0);
                Ok(ImputeValue::Numeric(median))
            }
            ImputeStrategy::MostFrequent => {
                if is_numeric_dtype(series.dtype()) {
                    Ok(ImputeValue::Numeric(Self::compute_mode_numeric(series)?))
                } else {
                    Ok(ImputeValue::String(Self::compute_mode_string(series)?))
                }
            }
            ImputeStrategy::ConstantString(val) => Ok(ImputeValue::String(val.clone())),
        }
    }

    /// Most frequent value; ties resolve to the smallest value
    fn compute_mode_numeric(series: &Series) -> Result<f64> {
        let values = float_values(series)?;
        let mut sorted: Vec<f64> = values.into_iter().flatten().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mut best: Option<(f64, usize)> = None;
        for run in sorted.chunk_by(|a, b| a == b) {
            if best.map_or(true, |(_, count)| run.len() > count) {
                best = Some((run[0], run.len()));
            }
        }

        Ok(best.map(|(v, _)| v).unwrap_or(0.0))
    }

    /// Most frequent category; ties resolve to the lexically smallest
    fn compute_mode_string(series: &Series) -> Result<String> {
        let ca = series
            .str()
            .map_err(|e| TitanicError::Data(e.to_string()))?;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for val in ca.into_iter().flatten() {
            *counts.entry(val).or_insert(0) += 1;
        }

        let mode = counts
            .into_iter()
            .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| b.cmp(a)))
            .map(|(k, _)| k.to_string())
            .unwrap_or_default();

        Ok(mode)
    }

    fn fill_series(series: &Series, fill_value: &ImputeValue) -> Result<Series> {
        match fill_value {
            ImputeValue::Numeric(val) => {
                let ca = float_values(series)?;
                let filled: Float64Chunked = ca
                    .into_iter()
                    .map(|opt| Some(opt.unwrap_or(*val)))
                    .collect();

                Ok(filled.with_name(series.name().clone()).into_series())
            }
            ImputeValue::String(val) => {
                let ca = series
                    .str()
                    .map_err(|e| TitanicError::Data(e.to_string()))?;
                let filled: StringChunked = ca
                    .into_iter()
                    .map(|opt| Some(opt.unwrap_or(val.as_str())))
                    .collect();

                Ok(filled.with_name(series.name().clone()).into_series())
            }
        }
    }
}

/// Check if dtype is numeric
fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

fn float_values(series: &Series) -> Result<Float64Chunked> {
    let cast = series
        .strict_cast(&DataType::Float64)
        .map_err(|e| TitanicError::Data(format!("column {}: {}", series.name(), e)))?;
    Ok(cast.f64()?.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imputer_creation() {
        let imputer = Imputer::new(ImputeStrategy::Median);
        assert!(!imputer.is_fitted());
    }

    #[test]
    fn test_median_imputation() {
        let df = DataFrame::new(vec![
            Column::new("a".into(), &[Some(1.0), None, Some(3.0), Some(10.0)]),
        ])
        .unwrap();

        let mut imputer = Imputer::new(ImputeStrategy::Median);
        let result = imputer.fit_transform(&df, &["a"]).unwrap();

        let col = result.column("a").unwrap().f64().unwrap();
        assert_eq!(col.get(1), Some(3.0));
        assert_eq!(col.null_count(), 0);
    }

    #[test]
    fn test_median_imputation_of_integers() {
        let df = DataFrame::new(vec![
            Column::new("a".into(), &[Some(1i64), None, Some(3), Some(4)]),
        ])
        .unwrap();

        let mut imputer = Imputer::new(ImputeStrategy::Median);
        let result = imputer.fit_transform(&df, &["a"]).unwrap();

        let col = result.column("a").unwrap().f64().unwrap();
        assert_eq!(col.get(1), Some(3.0));
    }

    #[test]
    fn test_constant_string_imputation() {
        let df = DataFrame::new(vec![
            Column::new("embarked".into(), &[Some("S"), None, Some("C")]),
        ])
        .unwrap();

        let mut imputer = Imputer::new(ImputeStrategy::ConstantString("missing".into()));
        let result = imputer.fit_transform(&df, &["embarked"]).unwrap();

        let col = result.column("embarked").unwrap().str().unwrap();
        assert_eq!(col.get(1), Some("missing"));
        assert_eq!(imputer.string_fill("embarked"), Some("missing"));
    }

    #[test]
    fn test_most_frequent_string() {
        let df = DataFrame::new(vec![
            Column::new("c".into(), &[Some("b"), Some("a"), None, Some("b"), Some("a")]),
        ])
        .unwrap();

        let mut imputer = Imputer::new(ImputeStrategy::MostFrequent);
        imputer.fit(&df, &["c"]).unwrap();
        assert_eq!(imputer.string_fill("c"), Some("a"));
    }

    #[test]
    fn test_most_frequent_numeric() {
        let df = DataFrame::new(vec![
            Column::new("n".into(), &[Some(2.0), Some(5.0), Some(5.0), None]),
        ])
        .unwrap();

        let mut imputer = Imputer::new(ImputeStrategy::MostFrequent);
        imputer.fit(&df, &["n"]).unwrap();
        assert_eq!(imputer.numeric_fill("n"), Some(5.0));
    }

    #[test]
    fn test_learned_values_reused_on_new_data() {
        let train = df!("a" => &[Some(2.0), Some(4.0), None]).unwrap();
        let test = df!("a" => &[None::<f64>, Some(100.0)]).unwrap();

        let mut imputer = Imputer::new(ImputeStrategy::Median);
        imputer.fit(&train, &["a"]).unwrap();
        let result = imputer.transform(&test).unwrap();
        assert_eq!(result.column("a").unwrap().f64().unwrap().get(0), Some(3.0));
    }

    #[test]
    fn test_transform_before_fit() {
        let df = df!("a" => &[1.0]).unwrap();
        let imputer = Imputer::new(ImputeStrategy::Median);
        assert!(matches!(imputer.transform(&df), Err(TitanicError::ModelNotFitted)));
    }

    #[test]
    fn test_missing_column() {
        let df = df!("a" => &[1.0]).unwrap();
        let mut imputer = Imputer::new(ImputeStrategy::Median);
        assert!(matches!(
            imputer.fit(&df, &["b"]),
            Err(TitanicError::FeatureNotFound(_))
        ));
    }
}
