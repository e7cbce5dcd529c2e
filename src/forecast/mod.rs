//! Rate forecasting and recommendation
//!
//! The pipeline for one currency is
//! [`fit`] → [`project`] → [`recommend`], all pure functions of the series
//! and the horizon list. [`convert`] runs independently on the latest rate.

pub mod conversion;
pub mod projection;
pub mod recommendation;
pub mod trend;

pub use conversion::{convert, round_to};
pub use projection::{project, Forecast, ForecastPoint, DEFAULT_HORIZONS};
pub use recommendation::{recommend, Directive, Recommendation, RecommendationEntry};
pub use trend::{date_ordinal, fit, TrendModel};

use crate::currency::Currency;
use crate::data::{RatePoint, Series};
use crate::error::{RateWatchError, Result};
use serde::{Deserialize, Serialize};

/// Everything derived for one currency in a request cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyForecast {
    pub currency: Currency,
    pub model: TrendModel,
    pub latest: RatePoint,
    pub forecast: Forecast,
    pub recommendation: Recommendation,
}

/// Run the full pipeline on one series
pub fn forecast_series(series: &Series, horizons: &[u32]) -> Result<CurrencyForecast> {
    let model = fit(series)?;
    forecast_with_model(series, model, horizons)
}

/// Run projection and recommendation with an already fitted model
pub fn forecast_with_model(
    series: &Series,
    model: TrendModel,
    horizons: &[u32],
) -> Result<CurrencyForecast> {
    let latest = series.latest().ok_or_else(|| {
        RateWatchError::MissingData(format!("No {} rates observed", series.currency()))
    })?;

    let forecast = project(&model, latest.date, horizons)?;
    let recommendation = recommend(&forecast, latest.rate);

    Ok(CurrencyForecast {
        currency: series.currency(),
        model,
        latest,
        forecast,
        recommendation,
    })
}
