//! Error types for the Titanic pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, TitanicError>;

/// Main error type for loading, feature derivation, and training
#[derive(Error, Debug)]
pub enum TitanicError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Malformed value in column {column} at row {row}: {value:?} ({reason})")]
    MalformedValue {
        column: String,
        row: usize,
        value: String,
        reason: String,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Invalid shape: expected {expected}, got {actual}")]
    Shape { expected: String, actual: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TitanicError {
    /// Build a `MalformedValue` error for a single cell
    pub fn malformed(
        column: impl Into<String>,
        row: usize,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        TitanicError::MalformedValue {
            column: column.into(),
            row,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl From<polars::error::PolarsError> for TitanicError {
    fn from(err: polars::error::PolarsError) -> Self {
        match err {
            polars::error::PolarsError::ColumnNotFound(name) => {
                TitanicError::FeatureNotFound(name.to_string())
            }
            polars::error::PolarsError::IO { error, .. } => match std::sync::Arc::try_unwrap(error) {
                Ok(io) => TitanicError::Io(io),
                Err(shared) => TitanicError::Io(std::io::Error::new(shared.kind(), shared.to_string())),
            },
            other => TitanicError::Data(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for TitanicError {
    fn from(err: serde_json::Error) -> Self {
        TitanicError::Serialization(err.to_string())
    }
}

impl From<ndarray::ShapeError> for TitanicError {
    fn from(err: ndarray::ShapeError) -> Self {
        TitanicError::Shape {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TitanicError::Data("test error".to_string());
        assert_eq!(err.to_string(), "Data error: test error");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TitanicError = io_err.into();
        assert!(matches!(err, TitanicError::Io(_)));
    }

    #[test]
    fn test_malformed_display() {
        let err = TitanicError::malformed("Name", 3, "Nobody", "no comma");
        assert_eq!(
            err.to_string(),
            "Malformed value in column Name at row 3: \"Nobody\" (no comma)"
        );
    }

    #[test]
    fn test_column_not_found_maps_to_feature_not_found() {
        let polars_err = polars::error::PolarsError::ColumnNotFound("Fare".into());
        let err: TitanicError = polars_err.into();
        assert!(matches!(err, TitanicError::FeatureNotFound(ref c) if c == "Fare"));
    }
}
