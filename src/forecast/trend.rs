//! Linear trend fitting
//!
//! Ordinary least squares of rate on ordinal date:
//! `rate ≈ slope * ordinal + intercept`.

use crate::data::Series;
use crate::error::{RateWatchError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution};

/// Day number in the proleptic Gregorian calendar, 0001-01-01 being day 1
pub fn date_ordinal(date: NaiveDate) -> i64 {
    date.num_days_from_ce() as i64
}

/// Fitted linear trend of rate over time
///
/// Ordinals are counted in days from `reference_date`, so `intercept` is the
/// fitted rate on that date and `slope` the change per day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendModel {
    pub slope: f64,
    pub intercept: f64,
    pub reference_date: NaiveDate,
}

impl TrendModel {
    /// Ordinal of `date` relative to the reference date
    pub fn ordinal(&self, date: NaiveDate) -> i64 {
        date_ordinal(date) - date_ordinal(self.reference_date)
    }

    /// Fitted value at an ordinal
    pub fn predict_ordinal(&self, ordinal: i64) -> f64 {
        self.slope * ordinal as f64 + self.intercept
    }

    /// Fitted value on a calendar date
    pub fn predict(&self, date: NaiveDate) -> f64 {
        self.predict_ordinal(self.ordinal(date))
    }

    /// Coefficient of determination of this trend against `series`
    ///
    /// A flat series fitted exactly scores 1.0.
    pub fn r_squared(&self, series: &Series) -> f64 {
        let rates: Vec<f64> = series.rates().collect();
        if rates.is_empty() {
            return 0.0;
        }
        let mean = Data::new(rates).mean().unwrap_or(0.0);

        let (ss_res, ss_tot) = series.points().iter().fold((0.0, 0.0), |(res, tot), p| {
            let residual = p.rate - self.predict(p.date);
            (res + residual * residual, tot + (p.rate - mean).powi(2))
        });

        if ss_tot == 0.0 {
            if ss_res == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - ss_res / ss_tot
        }
    }

    /// Sample standard deviation of the fit residuals
    pub fn residual_std_dev(&self, series: &Series) -> Option<f64> {
        let residuals: Vec<f64> = series
            .points()
            .iter()
            .map(|p| p.rate - self.predict(p.date))
            .collect();
        if residuals.len() < 2 {
            return None;
        }
        Data::new(residuals).std_dev()
    }
}

/// Fit a linear trend to a series
///
/// Needs at least two points. Both axes are shifted before summing (x by the
/// first date, y by the first rate) which keeps the sums small and makes a
/// constant series fit a slope of exactly zero.
pub fn fit(series: &Series) -> Result<TrendModel> {
    let points = series.points();
    if points.len() < 2 {
        return Err(RateWatchError::InsufficientData {
            currency: series.currency(),
            points: points.len(),
        });
    }

    let reference_date = points[0].date;
    let origin = date_ordinal(reference_date);
    let y0 = points[0].rate;

    let xs: Vec<f64> = points
        .iter()
        .map(|p| (date_ordinal(p.date) - origin) as f64)
        .collect();
    let dys: Vec<f64> = points.iter().map(|p| p.rate - y0).collect();

    let mean_x = Data::new(xs.clone()).mean().unwrap_or(0.0);
    let mean_dy = Data::new(dys.clone()).mean().unwrap_or(0.0);

    let sxx: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return Err(RateWatchError::DegenerateInput(format!(
            "All {} dates share one ordinal",
            series.currency()
        )));
    }

    let sxy: f64 = xs
        .iter()
        .zip(&dys)
        .map(|(x, dy)| (x - mean_x) * (dy - mean_dy))
        .sum();

    let slope = sxy / sxx;
    let intercept = y0 + mean_dy - slope * mean_x;

    log::debug!(
        "Fitted {} trend over {} points: slope={:.6}/day intercept={:.6} at {}",
        series.currency(),
        points.len(),
        slope,
        intercept,
        reference_date
    );

    Ok(TrendModel {
        slope,
        intercept,
        reference_date,
    })
}
