//! Frankfurter exchange-rate API integration
//!
//! Fetches a trailing window of daily rates (no API key required).

use super::loader::FrankfurterTimeSeries;
use super::store::TimeSeriesStore;
use crate::currency::Currency;
use crate::error::{RateWatchError, Result};
use chrono::{Duration, NaiveDate, Utc};
use reqwest::Client;
use std::time::Duration as StdDuration;

pub const FRANKFURTER_BASE_URL: &str = "https://api.frankfurter.app";

/// Frankfurter data source
pub struct FrankfurterSource {
    client: Client,
    base_url: String,
}

impl FrankfurterSource {
    /// Create a source against the public API
    pub fn new() -> Result<Self> {
        Self::with_base_url(FRANKFURTER_BASE_URL)
    }

    /// Create a source against a custom endpoint
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(30))
            .build()
            .map_err(|e| RateWatchError::FetchError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Request URL for a date range
    pub fn range_url(
        &self,
        base: Currency,
        symbols: &[Currency],
        start: NaiveDate,
        end: NaiveDate,
    ) -> String {
        let to = symbols
            .iter()
            .filter(|c| **c != base)
            .map(|c| c.code())
            .collect::<Vec<_>>()
            .join(",");

        format!(
            "{}/{}..{}?from={}&to={}",
            self.base_url, start, end, base, to
        )
    }

    /// Fetch rates between `start` and `end` inclusive
    pub async fn fetch_range(
        &self,
        base: Currency,
        symbols: &[Currency],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeriesStore> {
        let url = self.range_url(base, symbols, start, end);
        log::info!("Fetching rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RateWatchError::FetchError(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(RateWatchError::FetchError(format!(
                "Frankfurter returned error: {}",
                response.status()
            )));
        }

        let document: FrankfurterTimeSeries = response
            .json()
            .await
            .map_err(|e| RateWatchError::FetchError(format!("Failed to decode response: {}", e)))?;

        document.into_store()
    }

    /// Fetch the trailing `window_days` ending today
    pub async fn fetch_window(
        &self,
        base: Currency,
        symbols: &[Currency],
        window_days: i64,
    ) -> Result<TimeSeriesStore> {
        let end = Utc::now().date_naive();
        let start = end - Duration::days(window_days);
        self.fetch_range(base, symbols, start, end).await
    }
}
