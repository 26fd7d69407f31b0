//! Per-row passenger features

use super::columns;
use crate::error::{Result, TitanicError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Largest family size covered by the bucket bins
const MAX_FAMILY_SIZE: i64 = 11;

/// Family-size bucket using half-open bins (0,1], (1,4], (4,7], (7,11]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FamilyType {
    Solo,
    Small,
    Big,
    VeryBig,
}

impl FamilyType {
    /// Bucket a family size; `None` outside (0, 11]
    pub fn from_size(size: i64) -> Option<Self> {
        match size {
            1 => Some(FamilyType::Solo),
            2..=4 => Some(FamilyType::Small),
            5..=7 => Some(FamilyType::Big),
            8..=MAX_FAMILY_SIZE => Some(FamilyType::VeryBig),
            _ => None,
        }
    }

    /// Label written to the `Fam_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            FamilyType::Solo => "Solo",
            FamilyType::Small => "Small",
            FamilyType::Big => "Big",
            FamilyType::VeryBig => "Very big",
        }
    }
}

impl fmt::Display for FamilyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Honorific between the first comma and the following period.
///
/// Only the segment up to the next comma is considered, so
/// `"Braund, Mr. Owen Harris"` gives `"Mr"`. Returns `None` when the name has
/// no comma.
pub fn extract_title(name: &str) -> Option<&str> {
    let segment = name.split(',').nth(1)?;
    let title = segment.split('.').next().unwrap_or(segment);
    Some(title.trim())
}

/// First two characters of a ticket
pub fn ticket_prefix(ticket: &str) -> String {
    ticket.chars().take(2).collect()
}

/// Ticket length in characters
pub fn ticket_len(ticket: &str) -> i64 {
    ticket.chars().count() as i64
}

/// Siblings/spouses plus parents/children plus the passenger; `None` on overflow
pub fn family_size(sibsp: i64, parch: i64) -> Option<i64> {
    sibsp.checked_add(parch)?.checked_add(1)
}

/// Appends derived feature columns to a passenger table
#[derive(Debug, Clone, Default)]
pub struct FeatureBuilder;

impl FeatureBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Append `Title`, `Ticket_2letter`, `Ticket_len`, `Fam_size` and `Fam_type`.
    ///
    /// Existing columns are left untouched; derived columns already present are
    /// replaced. Null inputs produce null features, while present values that
    /// cannot be parsed are reported as [`TitanicError::MalformedValue`].
    pub fn transform<'a>(&self, df: &'a mut DataFrame) -> Result<&'a mut DataFrame> {
        for name in columns::REQUIRED_INPUTS {
            if df.column(name).is_err() {
                return Err(TitanicError::FeatureNotFound(name.to_string()));
            }
        }

        let titles = self.titles(df)?;
        let (prefixes, lengths) = self.ticket_features(df)?;
        let (sizes, types) = self.family_features(df)?;

        df.with_column(Series::new(columns::TITLE.into(), titles))?;
        df.with_column(Series::new(columns::TICKET_2LETTER.into(), prefixes))?;
        df.with_column(Series::new(columns::TICKET_LEN.into(), lengths))?;
        df.with_column(Series::new(columns::FAM_SIZE.into(), sizes))?;
        df.with_column(Series::new(columns::FAM_TYPE.into(), types))?;

        info!(rows = df.height(), cols = df.width(), "Derived passenger features");
        Ok(df)
    }

    fn titles(&self, df: &DataFrame) -> Result<Vec<Option<String>>> {
        let names = string_column(df, columns::NAME)?;

        names
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, name)| match name {
                None => Ok(None),
                Some(name) => extract_title(name)
                    .map(|t| Some(t.to_string()))
                    .ok_or_else(|| {
                        TitanicError::malformed(columns::NAME, row, name, "expected \"Surname, Title. Given\"")
                    }),
            })
            .collect()
    }

    fn ticket_features(&self, df: &DataFrame) -> Result<(Vec<Option<String>>, Vec<Option<i64>>)> {
        let tickets = string_column(df, columns::TICKET)?;
        let tickets = tickets.str()?;

        let prefixes = tickets.into_iter().map(|t| t.map(ticket_prefix)).collect();
        let lengths = tickets.into_iter().map(|t| t.map(ticket_len)).collect();

        Ok((prefixes, lengths))
    }

    fn family_features(&self, df: &DataFrame) -> Result<(Vec<Option<i64>>, Vec<Option<&'static str>>)> {
        let sibsp = int_column(df, columns::SIBSP)?;
        let parch = int_column(df, columns::PARCH)?;
        let sibsp = sibsp.i64()?;
        let parch = parch.i64()?;

        let sizes: Vec<Option<i64>> = sibsp
            .into_iter()
            .zip(parch.into_iter())
            .enumerate()
            .map(|(row, pair)| match pair {
                (Some(s), Some(p)) => family_size(s, p).map(Some).ok_or_else(|| {
                    TitanicError::malformed(
                        columns::FAM_SIZE,
                        row,
                        format!("{} + {} + 1", s, p),
                        "family size overflows",
                    )
                }),
                _ => Ok(None),
            })
            .collect::<Result<_>>()?;

        let types = sizes
            .iter()
            .enumerate()
            .map(|(row, size)| match size {
                None => Ok(None),
                Some(size) => FamilyType::from_size(*size)
                    .map(|t| Some(t.as_str()))
                    .ok_or_else(|| {
                        TitanicError::malformed(
                            columns::FAM_SIZE,
                            row,
                            size.to_string(),
                            format!("family size must lie in 1..={}", MAX_FAMILY_SIZE),
                        )
                    }),
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            nulls = sizes.iter().filter(|s| s.is_none()).count(),
            "Computed family sizes"
        );
        Ok((sizes, types))
    }
}

/// Derive features on an owned table and hand it back
pub fn clean_data(mut df: DataFrame) -> Result<DataFrame> {
    FeatureBuilder::new().transform(&mut df)?;
    Ok(df)
}

fn string_column(df: &DataFrame, name: &str) -> Result<Series> {
    df.column(name)?
        .as_materialized_series()
        .strict_cast(&DataType::String)
        .map_err(|e| TitanicError::Data(format!("column {}: {}", name, e)))
}

fn int_column(df: &DataFrame, name: &str) -> Result<Series> {
    df.column(name)?
        .as_materialized_series()
        .strict_cast(&DataType::Int64)
        .map_err(|e| TitanicError::Data(format!("column {}: {}", name, e)))
}
