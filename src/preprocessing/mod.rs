//! Data preprocessing module
//!
//! Provides the building blocks of the feature matrix:
//! - Missing value imputation (median, most frequent, constant category)
//! - Standard feature scaling
//! - One-hot encoding that tolerates unseen categories
//! - Column-wise branches concatenated into one matrix

mod column_transformer;
mod encoder;
mod imputer;
mod scaler;

pub use column_transformer::{columns_to_array2, Branch, ColumnKind, ColumnTransformer, Step};
pub use encoder::{HandleUnknown, OneHotEncoder};
pub use imputer::{ImputeStrategy, Imputer};
pub use scaler::{Scaler, ScalerParams};
