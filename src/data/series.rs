//! Per-currency rate series
//!
//! A [`Series`] is the slice of the time-series store for one currency:
//! `(date, rate)` points, ascending by date, with absent rates dropped.

use crate::currency::Currency;
use crate::error::{RateWatchError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A single dated rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub rate: f64,
}

impl RatePoint {
    pub fn new(date: NaiveDate, rate: f64) -> Self {
        Self { date, rate }
    }
}

/// Ordered rate history for one currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    currency: Currency,
    points: Vec<RatePoint>,
}

impl Series {
    /// Build a series, sorting points ascending by date
    ///
    /// Fails with `InvalidData` if two points share a date.
    pub fn new(currency: Currency, mut points: Vec<RatePoint>) -> Result<Self> {
        points.sort_by_key(|p| p.date);

        if let Some(pair) = points.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(RateWatchError::InvalidData(format!(
                "Duplicate date {} in {} series",
                pair[0].date, currency
            )));
        }

        Ok(Self { currency, points })
    }

    /// Build from `(date, rate)` tuples
    pub fn from_pairs<I>(currency: Currency, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::new(
            currency,
            pairs
                .into_iter()
                .map(|(date, rate)| RatePoint::new(date, rate))
                .collect(),
        )
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn points(&self) -> &[RatePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn rates(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.rate)
    }

    /// First (oldest) observed date
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    /// Last (most recent) observed date
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Most recent observation, found by sorting a copy descending by date
    /// and taking its head.
    ///
    /// This always agrees with the tail of the ascending series; it is
    /// derived independently so the "current" rate never depends on the
    /// ordering of `points`.
    pub fn latest(&self) -> Option<RatePoint> {
        let mut descending = self.points.clone();
        descending.sort_by(|a, b| b.date.cmp(&a.date));
        descending.into_iter().next()
    }

    /// Latest rate value
    pub fn latest_rate(&self) -> Option<f64> {
        self.latest().map(|p| p.rate)
    }

    /// Content hash over the currency and every `(date, rate)` point
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.currency.hash(&mut hasher);
        for point in &self.points {
            point.date.hash(&mut hasher);
            point.rate.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}
