//! In-memory time-series store
//!
//! Holds dated observations, each carrying one optional rate per quoted
//! currency. The store is append-only for the length of a session and is
//! rebuilt from scratch on refresh.

use super::reader::RateReader;
use super::series::{RatePoint, Series};
use crate::currency::Currency;
use crate::error::{RateWatchError, Result};
use chrono::NaiveDate;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One dated row of rates against the base currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    /// `None` means the source published no rate for that currency on `date`
    pub rates: HashMap<Currency, Option<f64>>,
}

impl Observation {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            rates: HashMap::new(),
        }
    }

    /// Builder-style rate setter
    pub fn with_rate(mut self, currency: Currency, rate: Option<f64>) -> Self {
        self.rates.insert(currency, rate);
        self
    }

    pub fn rate(&self, currency: Currency) -> Option<f64> {
        self.rates.get(&currency).copied().flatten()
    }
}

/// Time-series store keyed by date
///
/// # Example
/// ```
/// use ratewatch::data::{Observation, RateReader, TimeSeriesStore};
/// use ratewatch::currency::Currency;
/// use chrono::NaiveDate;
///
/// let mut store = TimeSeriesStore::new();
/// let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
/// store
///     .add_observation(Observation::new(date).with_rate(Currency::EUR, Some(0.91)))
///     .unwrap();
///
/// assert_eq!(store.latest_rate(Currency::EUR).unwrap(), 0.91);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeriesStore {
    base: Currency,
    observations: BTreeMap<NaiveDate, Observation>,
}

impl TimeSeriesStore {
    /// Create an empty store quoted against USD
    pub fn new() -> Self {
        Self::with_base(Currency::USD)
    }

    /// Create an empty store quoted against `base`
    pub fn with_base(base: Currency) -> Self {
        Self {
            base,
            observations: BTreeMap::new(),
        }
    }

    pub fn base(&self) -> Currency {
        self.base
    }

    /// Add an observation
    ///
    /// An observation for an existing date replaces the old one, keeping
    /// dates unique.
    pub fn add_observation(&mut self, observation: Observation) -> Result<()> {
        for (currency, rate) in &observation.rates {
            if let Some(rate) = rate {
                validate_rate(*currency, observation.date, *rate)?;
            }
        }

        if self
            .observations
            .insert(observation.date, observation)
            .is_some()
        {
            log::debug!("Replaced existing observation");
        }
        Ok(())
    }

    /// Add multiple observations (batch insert)
    ///
    /// Validates everything before inserting anything.
    pub fn add_observations(&mut self, observations: Vec<Observation>) -> Result<()> {
        for observation in &observations {
            for (currency, rate) in &observation.rates {
                if let Some(rate) = rate {
                    validate_rate(*currency, observation.date, *rate)?;
                }
            }
        }

        for observation in observations {
            self.observations.insert(observation.date, observation);
        }
        Ok(())
    }

    /// Set a single rate, creating the observation for `date` if needed
    pub fn add_rate(&mut self, date: NaiveDate, currency: Currency, rate: Option<f64>) -> Result<()> {
        if let Some(rate) = rate {
            validate_rate(currency, date, rate)?;
        }

        self.observations
            .entry(date)
            .or_insert_with(|| Observation::new(date))
            .rates
            .insert(currency, rate);
        Ok(())
    }

    /// Clear all observations
    pub fn clear(&mut self) {
        self.observations.clear();
    }

    /// Number of distinct dates
    pub fn num_dates(&self) -> usize {
        self.observations.len()
    }

    /// Number of present (non-absent) rate entries across all dates
    pub fn num_entries(&self) -> usize {
        self.observations
            .values()
            .map(|o| o.rates.values().filter(|r| r.is_some()).count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Observations in ascending date order
    pub fn observations(&self) -> impl Iterator<Item = &Observation> {
        self.observations.values()
    }

    /// First and last stored dates
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.observations.keys().next()?;
        let last = self.observations.keys().next_back()?;
        Some((*first, *last))
    }

    /// Currencies with at least one present rate, sorted
    pub fn currencies(&self) -> Vec<Currency> {
        let mut currencies: Vec<Currency> = self
            .observations
            .values()
            .flat_map(|o| o.rates.iter())
            .filter(|(_, rate)| rate.is_some())
            .map(|(currency, _)| *currency)
            .collect();
        currencies.sort();
        currencies.dedup();
        currencies
    }
}

impl Default for TimeSeriesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RateReader for TimeSeriesStore {
    fn series(&self, currency: Currency) -> Result<Series> {
        // The base is worth exactly one of itself on every stored date
        let points = if currency == self.base {
            self.observations
                .keys()
                .map(|date| RatePoint::new(*date, 1.0))
                .collect()
        } else {
            self.observations
                .values()
                .filter_map(|o| o.rate(currency).map(|rate| RatePoint::new(o.date, rate)))
                .collect()
        };

        Series::new(currency, points)
    }
}

fn validate_rate(currency: Currency, date: NaiveDate, rate: f64) -> Result<()> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(RateWatchError::InvalidData(format!(
            "{} rate on {} must be a non-negative number, got: {}",
            currency, date, rate
        )));
    }
    Ok(())
}
