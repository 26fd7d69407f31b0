//! Training configuration

use crate::error::{Result, TitanicError};
use crate::feature_engineering::columns;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a train/evaluate run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Label column
    pub target_column: String,

    /// Fraction of rows held out for evaluation
    pub test_size: f64,

    /// Seed for the train/test shuffle
    pub split_seed: u64,

    /// Number of trees in the forest
    pub n_estimators: usize,

    /// Seed for bootstrap and feature sampling
    pub forest_seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            target_column: columns::SURVIVED.to_string(),
            test_size: 0.3,
            split_seed: 1,
            n_estimators: 100,
            forest_seed: 42,
        }
    }
}

impl TrainingConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the label column
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_column = target.into();
        self
    }

    /// Builder method to set the held-out fraction
    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    /// Builder method to set the split seed
    pub fn with_split_seed(mut self, seed: u64) -> Self {
        self.split_seed = seed;
        self
    }

    /// Builder method to set the forest size
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Builder method to set the forest seed
    pub fn with_forest_seed(mut self, seed: u64) -> Self {
        self.forest_seed = seed;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(TitanicError::Validation(format!(
                "test_size must lie in (0, 1), got {}",
                self.test_size
            )));
        }
        if self.n_estimators == 0 {
            return Err(TitanicError::Validation(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if self.target_column.is_empty() {
            return Err(TitanicError::Validation(
                "target_column must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrainingConfig::default();
        assert_eq!(config.target_column, "Survived");
        assert_eq!(config.test_size, 0.3);
        assert_eq!(config.split_seed, 1);
        assert_eq!(config.n_estimators, 100);
        assert_eq!(config.forest_seed, 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = TrainingConfig::new()
            .with_target("label")
            .with_test_size(0.25)
            .with_n_estimators(10)
            .with_split_seed(7)
            .with_forest_seed(9);

        assert_eq!(config.target_column, "label");
        assert_eq!(config.test_size, 0.25);
        assert_eq!(config.n_estimators, 10);
        assert_eq!(config.split_seed, 7);
        assert_eq!(config.forest_seed, 9);
    }

    #[test]
    fn test_validate_rejects_bad_test_size() {
        assert!(TrainingConfig::new().with_test_size(0.0).validate().is_err());
        assert!(TrainingConfig::new().with_test_size(1.0).validate().is_err());
        assert!(TrainingConfig::new().with_n_estimators(0).validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TrainingConfig = serde_json::from_str(r#"{"n_estimators": 20}"#).unwrap();
        assert_eq!(config.n_estimators, 20);
        assert_eq!(config.target_column, "Survived");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = TrainingConfig::new().with_n_estimators(5);

        config.save(&path).unwrap();
        assert_eq!(TrainingConfig::load(&path).unwrap(), config);
    }
}
