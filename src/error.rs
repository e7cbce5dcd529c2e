//! Error types for RateWatch

use crate::currency::Currency;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for RateWatch
#[derive(Error, Debug)]
pub enum RateWatchError {
    #[error("Insufficient data for {currency}: need at least 2 rates, got {points}")]
    InsufficientData { currency: Currency, points: usize },

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("No currency selected")]
    MissingSelection,

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Fetch error: {0}")]
    FetchError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Failure category reported by the request boundary.
///
/// Every [`RateWatchError`] folds into one of these; the end user only ever
/// sees a generic message, the kind is kept for logs and callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InsufficientData,
    DegenerateInput,
    MissingSelection,
    Unexpected,
}

impl RateWatchError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RateWatchError::InsufficientData { .. } | RateWatchError::MissingData(_) => {
                ErrorKind::InsufficientData
            }
            RateWatchError::DegenerateInput(_) => ErrorKind::DegenerateInput,
            RateWatchError::MissingSelection => ErrorKind::MissingSelection,
            _ => ErrorKind::Unexpected,
        }
    }
}

/// Result type alias for RateWatch operations
pub type Result<T> = std::result::Result<T, RateWatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err = RateWatchError::InsufficientData {
            currency: Currency::EUR,
            points: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("EUR"));
        assert!(msg.contains("got 1"));
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            RateWatchError::DegenerateInput("same ordinal".into()).kind(),
            ErrorKind::DegenerateInput
        );
        assert_eq!(
            RateWatchError::MissingSelection.kind(),
            ErrorKind::MissingSelection
        );
        assert_eq!(
            RateWatchError::MissingData("no EUR rows".into()).kind(),
            ErrorKind::InsufficientData
        );
        assert_eq!(
            RateWatchError::ParseError("bad date".into()).kind(),
            ErrorKind::Unexpected
        );
        assert_eq!(
            RateWatchError::Unexpected("boom".into()).kind(),
            ErrorKind::Unexpected
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "rates.csv");
        let err: RateWatchError = io.into();
        assert!(err.to_string().contains("rates.csv"));
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }
}
