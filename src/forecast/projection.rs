//! Forward projection of a fitted trend

use super::trend::TrendModel;
use crate::error::{RateWatchError, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Horizons used by the recommendation flow: one and two weeks out
pub const DEFAULT_HORIZONS: [u32; 2] = [7, 15];

/// Predicted rate at one horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub offset_days: u32,
    pub date: NaiveDate,
    pub rate: f64,
}

/// Projected rates, one entry per requested offset in request order.
///
/// Entries are kept as a sequence rather than a date-keyed map, so repeated
/// offsets yield repeated entries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Forecast {
    points: Vec<ForecastPoint>,
}

impl Forecast {
    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForecastPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First entry for an offset
    pub fn at_offset(&self, offset_days: u32) -> Option<&ForecastPoint> {
        self.points.iter().find(|p| p.offset_days == offset_days)
    }
}

impl<'a> IntoIterator for &'a Forecast {
    type Item = &'a ForecastPoint;
    type IntoIter = std::slice::Iter<'a, ForecastPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Project `model` to each offset after `last_date`
///
/// Predictions are not clamped; a steep trend may extrapolate below zero.
pub fn project(model: &TrendModel, last_date: NaiveDate, offsets: &[u32]) -> Result<Forecast> {
    let last_ordinal = model.ordinal(last_date);

    let points = offsets
        .iter()
        .map(|&offset| {
            if offset == 0 {
                return Err(RateWatchError::InvalidData(
                    "Forecast offsets must be positive".to_string(),
                ));
            }

            let date = last_date
                .checked_add_days(Days::new(u64::from(offset)))
                .ok_or_else(|| {
                    RateWatchError::InvalidData(format!(
                        "{} days after {} is out of range",
                        offset, last_date
                    ))
                })?;

            Ok(ForecastPoint {
                offset_days: offset,
                date,
                rate: model.predict_ordinal(last_ordinal + i64::from(offset)),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Forecast { points })
}
