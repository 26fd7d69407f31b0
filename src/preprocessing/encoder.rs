//! Categorical encoding

use crate::error::{Result, TitanicError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// What to do with a category that was not seen during fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleUnknown {
    /// Fail the transform
    Error,
    /// Encode as an all-zero block
    Ignore,
}

/// One-hot encoder over string columns.
///
/// Each fitted column expands into one indicator column per training category,
/// in sorted category order, named `{column}_{category}`. The original column
/// is dropped from the output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    handle_unknown: HandleUnknown,
    // Fitted columns in input order
    columns: Vec<String>,
    // column name -> sorted categories
    categories: HashMap<String, Vec<String>>,
    is_fitted: bool,
}

impl OneHotEncoder {
    /// Create a new encoder
    pub fn new(handle_unknown: HandleUnknown) -> Self {
        Self {
            handle_unknown,
            columns: Vec::new(),
            categories: HashMap::new(),
            is_fitted: false,
        }
    }

    pub fn handle_unknown(&self) -> HandleUnknown {
        self.handle_unknown
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Learned categories for a column
    pub fn categories(&self, column: &str) -> Option<&[String]> {
        self.categories.get(column).map(|c| c.as_slice())
    }

    /// Names of the indicator columns produced by `transform`, in order
    pub fn feature_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .flat_map(|col| {
                self.categories[col]
                    .iter()
                    .map(move |cat| format!("{}_{}", col, cat))
            })
            .collect()
    }

    /// Fit the encoder to the data
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        self.columns.clear();
        self.categories.clear();

        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| TitanicError::FeatureNotFound(col_name.to_string()))?;
            let ca = column
                .str()
                .map_err(|e| TitanicError::Data(format!("column {}: {}", col_name, e)))?;

            let categories: BTreeSet<&str> = ca.into_iter().flatten().collect();
            self.columns.push(col_name.to_string());
            self.categories.insert(
                col_name.to_string(),
                categories.into_iter().map(String::from).collect(),
            );
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Replace each fitted column by its indicator columns
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(TitanicError::ModelNotFitted);
        }

        let mut result = df.clone();

        for col_name in &self.columns {
            let column = df
                .column(col_name)
                .map_err(|_| TitanicError::FeatureNotFound(col_name.clone()))?;
            let ca = column
                .str()
                .map_err(|e| TitanicError::Data(format!("column {}: {}", col_name, e)))?;
            let categories = &self.categories[col_name];

            let positions: Vec<Option<usize>> = ca
                .into_iter()
                .enumerate()
                .map(|(row, value)| {
                    let position = value.and_then(|v| categories.binary_search_by(|c| c.as_str().cmp(v)).ok());
                    if position.is_none() && self.handle_unknown == HandleUnknown::Error {
                        return Err(TitanicError::malformed(
                            col_name.as_str(),
                            row,
                            value.unwrap_or("null"),
                            "category not seen during fit",
                        ));
                    }
                    Ok(position)
                })
                .collect::<Result<Vec<_>>>()?;

            for (idx, category) in categories.iter().enumerate() {
                let values: Vec<i32> = positions
                    .iter()
                    .map(|p| if *p == Some(idx) { 1 } else { 0 })
                    .collect();
                let name = format!("{}_{}", col_name, category);
                result.with_column(Series::new(name.into(), values))?;
            }

            result = result.drop(col_name)?;
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        DataFrame::new(vec![Series::new(
            "category".into(),
            &["b", "a", "c", "a", "b"],
        )
        .into()])
        .unwrap()
    }

    #[test]
    fn test_onehot_encoding() {
        let df = sample_df();

        let mut encoder = OneHotEncoder::new(HandleUnknown::Ignore);
        let result = encoder.fit_transform(&df, &["category"]).unwrap();

        assert!(result.column("category").is_err());
        assert_eq!(result.width(), 3);
        assert_eq!(
            encoder.feature_names(),
            vec!["category_a", "category_b", "category_c"]
        );
        let b = result.column("category_b").unwrap().i32().unwrap();
        assert_eq!(b.into_iter().collect::<Vec<_>>(), vec![Some(1), Some(0), Some(0), Some(0), Some(1)]);
    }

    #[test]
    fn test_unknown_category_ignored() {
        let mut encoder = OneHotEncoder::new(HandleUnknown::Ignore);
        encoder.fit(&sample_df(), &["category"]).unwrap();

        let test = df!("category" => &["z"]).unwrap();
        let result = encoder.transform(&test).unwrap();

        assert_eq!(result.width(), 3);
        for name in encoder.feature_names() {
            assert_eq!(result.column(&name).unwrap().i32().unwrap().get(0), Some(0));
        }
    }

    #[test]
    fn test_unknown_category_error() {
        let mut encoder = OneHotEncoder::new(HandleUnknown::Error);
        encoder.fit(&sample_df(), &["category"]).unwrap();

        let test = df!("category" => &["a", "z"]).unwrap();
        let err = encoder.transform(&test).unwrap_err();
        assert!(matches!(err, TitanicError::MalformedValue { row: 1, .. }));
    }

    #[test]
    fn test_categories_sorted() {
        let mut encoder = OneHotEncoder::new(HandleUnknown::Ignore);
        encoder.fit(&sample_df(), &["category"]).unwrap();
        assert_eq!(encoder.categories("category").unwrap(), &["a", "b", "c"]);
    }
}
