//! Standard (z-score) feature scaling

use crate::error::{Result, TitanicError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameters for a fitted scaler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    /// Column mean
    pub center: f64,
    /// Population standard deviation; never zero
    pub scale: f64,
}

/// Standard scaler: `(x - mean) / std`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scaler {
    params: HashMap<String, ScalerParams>,
    is_fitted: bool,
}

impl Scaler {
    /// Create a new scaler
    pub fn new() -> Self {
        Self {
            params: HashMap::new(),
            is_fitted: false,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Fitted parameters for a column
    pub fn params(&self, column: &str) -> Option<&ScalerParams> {
        self.params.get(column)
    }

    /// Fit the scaler to the data
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        self.params.clear();

        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| TitanicError::FeatureNotFound(col_name.to_string()))?;

            let params = Self::compute_params(column.as_materialized_series())?;
            self.params.insert(col_name.to_string(), params);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Transform the data.
    /// Builds all replacement columns first, then applies them in a single pass.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(TitanicError::ModelNotFitted);
        }

        let replacements: Vec<Series> = self
            .params
            .iter()
            .map(|(col_name, params)| {
                let column = df
                    .column(col_name)
                    .map_err(|_| TitanicError::FeatureNotFound(col_name.clone()))?;
                Self::scale_series(column.as_materialized_series(), params)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut result = df.clone();
        for scaled in replacements {
            result.with_column(scaled)?;
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    fn compute_params(series: &Series) -> Result<ScalerParams> {
        let cast = series
            .strict_cast(&DataType::Float64)
            .map_err(|e| TitanicError::Data(format!("column {}: {}", series.name(), e)))?;
        let ca = cast.f64()?;

        let mean = ca.mean().unwrap_or(0.0);
        let std = ca.std(0).unwrap_or(1.0);
        Ok(ScalerParams {
            center: mean,
            scale: non_zero(std),
        })
    }

    fn scale_series(series: &Series, params: &ScalerParams) -> Result<Series> {
        let cast = series
            .strict_cast(&DataType::Float64)
            .map_err(|e| TitanicError::Data(format!("column {}: {}", series.name(), e)))?;
        let ca = cast.f64()?;

        let scaled: Float64Chunked = ca
            .into_iter()
            .map(|opt| opt.map(|v| (v - params.center) / params.scale))
            .collect();

        Ok(scaled.with_name(series.name().clone()).into_series())
    }
}

fn non_zero(scale: f64) -> f64 {
    if scale == 0.0 || !scale.is_finite() {
        1.0
    } else {
        scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_scaler() {
        let df = DataFrame::new(vec![
            Series::new("a".into(), &[1.0, 2.0, 3.0, 4.0, 5.0]).into(),
        ])
        .unwrap();

        let mut scaler = Scaler::new();
        let result = scaler.fit_transform(&df, &["a"]).unwrap();

        let col = result.column("a").unwrap().f64().unwrap();
        assert!(col.mean().unwrap().abs() < 1e-10);
        // population variance is exactly one after scaling
        assert!((col.std(0).unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_standard_scaler_constant_column() {
        let df = df!("a" => &[7.0, 7.0, 7.0]).unwrap();

        let mut scaler = Scaler::new();
        let result = scaler.fit_transform(&df, &["a"]).unwrap();

        assert_eq!(scaler.params("a").unwrap().scale, 1.0);
        let col = result.column("a").unwrap().f64().unwrap();
        assert!(col.into_iter().all(|v| v == Some(0.0)));
    }

    #[test]
    fn test_uses_fit_statistics_on_new_data() {
        let train = df!("a" => &[0.0, 2.0]).unwrap();
        let test = df!("a" => &[4.0]).unwrap();

        let mut scaler = Scaler::new();
        scaler.fit(&train, &["a"]).unwrap();
        let result = scaler.transform(&test).unwrap();

        // mean 1, population std 1
        assert_eq!(result.column("a").unwrap().f64().unwrap().get(0), Some(3.0));
    }

    #[test]
    fn test_transform_before_fit() {
        let df = df!("a" => &[1.0]).unwrap();
        let scaler = Scaler::new();
        assert!(matches!(scaler.transform(&df), Err(TitanicError::ModelNotFitted)));
    }
}
