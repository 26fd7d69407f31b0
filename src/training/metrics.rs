//! Fit-quality metrics

use crate::error::{Result, TitanicError};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Accuracy and mean absolute error on one partition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    /// Fraction of exactly matching labels
    pub score: f64,
    /// Mean absolute difference between predicted and true labels
    pub mae: f64,
    /// Rows scored
    pub n_samples: usize,
}

impl ModelMetrics {
    /// Compute both metrics
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self> {
        Ok(Self {
            score: accuracy(y_true, y_pred)?,
            mae: mean_absolute_error(y_true, y_pred)?,
            n_samples: y_true.len(),
        })
    }
}

/// Metrics on the training and held-out partitions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub train_data: ModelMetrics,
    pub test_data: ModelMetrics,
}

impl TrainingReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "train: score={:.4} mae={:.4} (n={}); test: score={:.4} mae={:.4} (n={})",
            self.train_data.score,
            self.train_data.mae,
            self.train_data.n_samples,
            self.test_data.score,
            self.test_data.mae,
            self.test_data.n_samples,
        )
    }
}

/// Fraction of predictions equal to the true label
pub fn accuracy(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Mean of `|y_true - y_pred|`
pub fn mean_absolute_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let total: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).abs())
        .sum();
    Ok(total / y_true.len() as f64)
}

fn check_lengths(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(TitanicError::Shape {
            expected: format!("{} predictions", y_true.len()),
            actual: format!("{} predictions", y_pred.len()),
        });
    }
    if y_true.is_empty() {
        return Err(TitanicError::Validation(
            "Cannot score an empty partition".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_classification_metrics() {
        let y_true = array![1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 0.0];
        let y_pred = array![1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0];

        let metrics = ModelMetrics::compute(&y_true, &y_pred).unwrap();
        assert_eq!(metrics.score, 0.75);
        assert_eq!(metrics.mae, 0.25);
        assert_eq!(metrics.n_samples, 8);
    }

    #[test]
    fn test_binary_mae_complements_accuracy() {
        let y_true = array![1.0, 0.0, 0.0];
        let y_pred = array![0.0, 0.0, 1.0];

        let acc = accuracy(&y_true, &y_pred).unwrap();
        let mae = mean_absolute_error(&y_true, &y_pred).unwrap();
        assert!((acc + mae - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_length_mismatch() {
        let err = accuracy(&array![1.0], &array![1.0, 0.0]).unwrap_err();
        assert!(matches!(err, TitanicError::Shape { .. }));
    }

    #[test]
    fn test_empty_partition() {
        let empty: Array1<f64> = Array1::zeros(0);
        assert!(mean_absolute_error(&empty, &empty).is_err());
    }

    #[test]
    fn test_report_json_shape() {
        let m = ModelMetrics { score: 1.0, mae: 0.0, n_samples: 2 };
        let report = TrainingReport { train_data: m, test_data: m };
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["train_data"]["score"], 1.0);
        assert_eq!(value["test_data"]["mae"], 0.0);
    }
}
