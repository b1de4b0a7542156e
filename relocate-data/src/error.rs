use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading source tables.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// Structural CSV failure: bad quoting, wrong column count, missing
    /// column, or a number that does not parse.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A cell held a value outside its closed set (country, currency, tax
    /// type, ...). `row` is 1-based, not counting the header.
    #[error("invalid {field} '{value}' on row {row}")]
    InvalidValue {
        field: &'static str,
        value: String,
        row: usize,
    },

    #[error("in {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<DataLoadError>,
    },
}

impl DataLoadError {
    pub(crate) fn invalid(
        field: &'static str,
        value: impl Into<String>,
        row: usize,
    ) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
            row,
        }
    }
}
