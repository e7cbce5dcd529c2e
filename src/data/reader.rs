//! Rate reader trait - the seam between data sources and the forecast engine

use super::series::Series;
use crate::currency::Currency;
use crate::error::{RateWatchError, Result};

/// Trait for reading per-currency rate history
pub trait RateReader: Send + Sync {
    /// Rate history for one currency, ascending, absent rows dropped
    fn series(&self, currency: Currency) -> Result<Series>;

    /// Most recent observed rate for a currency
    fn latest_rate(&self, currency: Currency) -> Result<f64> {
        self.series(currency)?.latest_rate().ok_or_else(|| {
            RateWatchError::MissingData(format!("No {} rates observed", currency))
        })
    }

    /// Check if any rate is available
    fn has_rates(&self, currency: Currency) -> bool {
        self.series(currency).map(|s| !s.is_empty()).unwrap_or(false)
    }
}
