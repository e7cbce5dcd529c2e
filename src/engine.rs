//! Request engine with a fail-soft boundary
//!
//! Each user interaction (currency selection, amount change) is one call to
//! [`RateWatchEngine::respond`]. Everything inside is a pure function of the
//! rate snapshot; errors are logged and folded into a generic response.

use crate::currency::Currency;
use crate::data::{RateReader, Series};
use crate::error::{ErrorKind, RateWatchError, Result};
use crate::forecast::{self, convert, CurrencyForecast, TrendModel, DEFAULT_HORIZONS};
use hashbrown::HashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

pub const NO_SELECTION_TEXT: &str = "Please select a currency to see recommendations.";
pub const ERROR_TEXT: &str = "Could not generate recommendation due to an error";
pub const PROMPT_CHART_TITLE: &str = "Select a currency and enter an amount";
pub const ERROR_CHART_TITLE: &str = "An error occurred";

/// Configuration for the request engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Currency every rate is quoted against
    pub base: Currency,
    /// Currencies offered for selection
    pub currencies: Vec<Currency>,
    /// Forecast offsets in days after the last observation
    pub horizons: Vec<u32>,
    /// Reuse fitted trends while a currency's series is unchanged
    pub memoize_trends: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base: Currency::USD,
            currencies: Currency::quotes(),
            horizons: DEFAULT_HORIZONS.to_vec(),
            memoize_trends: true,
        }
    }
}

/// Chart handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Chart {
    Series { title: String, series: Series },
    Placeholder { title: String },
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Series { title, .. } | Chart::Placeholder { title } => title,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Chart::Placeholder { .. })
    }
}

/// Recommendation body: per-horizon lines or a single message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecommendationText {
    Lines(Vec<String>),
    Message(String),
}

impl RecommendationText {
    pub fn lines(&self) -> Vec<String> {
        match self {
            RecommendationText::Lines(lines) => lines.clone(),
            RecommendationText::Message(message) => vec![message.clone()],
        }
    }
}

/// How a request cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Ready,
    NoSelection,
    Failed(ErrorKind),
}

/// Everything the presentation layer needs for one interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub currency: Option<Currency>,
    pub converted_amount: f64,
    pub chart: Chart,
    pub recommendation: RecommendationText,
    pub outcome: Outcome,
}

impl Response {
    fn no_selection() -> Self {
        Self {
            currency: None,
            converted_amount: 0.0,
            chart: Chart::Placeholder {
                title: PROMPT_CHART_TITLE.to_string(),
            },
            recommendation: RecommendationText::Message(NO_SELECTION_TEXT.to_string()),
            outcome: Outcome::NoSelection,
        }
    }

    fn failed(currency: Currency, converted_amount: f64, kind: ErrorKind) -> Self {
        Self {
            currency: Some(currency),
            converted_amount,
            chart: Chart::Placeholder {
                title: ERROR_CHART_TITLE.to_string(),
            },
            recommendation: RecommendationText::Message(ERROR_TEXT.to_string()),
            outcome: Outcome::Failed(kind),
        }
    }
}

/// Successful forecast cycle for one currency
#[derive(Debug, Clone, PartialEq)]
pub struct Advice {
    pub series: Series,
    pub forecast: CurrencyForecast,
}

/// Forecast engine over an immutable rate snapshot
pub struct RateWatchEngine {
    config: EngineConfig,
    reader: Arc<dyn RateReader>,
    /// Fitted trends: currency -> (series fingerprint, model)
    trend_cache: RwLock<HashMap<Currency, (u64, TrendModel)>>,
}

impl RateWatchEngine {
    /// Create a new engine
    pub fn new(config: EngineConfig, reader: Arc<dyn RateReader>) -> Self {
        Self {
            config,
            reader,
            trend_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Create engine with default configuration
    pub fn with_reader(reader: Arc<dyn RateReader>) -> Self {
        Self::new(EngineConfig::default(), reader)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handle one interaction; never fails
    pub fn respond(&self, selection: Option<Currency>, amount: Option<f64>) -> Response {
        let currency = match selection {
            Some(currency) => currency,
            None => return Response::no_selection(),
        };

        let converted_amount = match self.converted_amount(currency, amount) {
            Ok(value) => value,
            Err(e) => {
                log::error!("Conversion to {} failed: {}", currency, e);
                return Response::failed(currency, 0.0, e.kind());
            }
        };

        match self.advise(currency) {
            Ok(advice) => {
                let chart = if amount.is_some() {
                    Chart::Series {
                        title: format!("{} Exchange Rate ({} Base)", currency, self.config.base),
                        series: advice.series,
                    }
                } else {
                    Chart::Placeholder {
                        title: PROMPT_CHART_TITLE.to_string(),
                    }
                };

                Response {
                    currency: Some(currency),
                    converted_amount,
                    chart,
                    recommendation: RecommendationText::Lines(
                        advice.forecast.recommendation.lines(),
                    ),
                    outcome: Outcome::Ready,
                }
            }
            Err(e) => {
                log::error!("Could not generate {} recommendation: {}", currency, e);
                Response::failed(currency, converted_amount, e.kind())
            }
        }
    }

    /// Typed forecast cycle for one currency
    pub fn advise(&self, currency: Currency) -> Result<Advice> {
        let series = self.reader.series(currency)?;
        let model = self.trend_for(&series)?;
        let forecast = forecast::forecast_with_model(&series, model, &self.config.horizons)?;

        if forecast.forecast.iter().any(|p| !p.rate.is_finite()) {
            return Err(RateWatchError::Unexpected(format!(
                "Non-finite {} projection",
                currency
            )));
        }

        Ok(Advice { series, forecast })
    }

    /// `amount` converted at the latest rate; `0.0` when no amount is given
    pub fn converted_amount(&self, currency: Currency, amount: Option<f64>) -> Result<f64> {
        match amount {
            Some(_) => {
                let latest = self.reader.latest_rate(currency)?;
                Ok(convert(amount, Some(latest)))
            }
            None => Ok(0.0),
        }
    }

    /// Forecast every configured currency in parallel
    pub fn forecast_all(&self) -> Vec<(Currency, Result<CurrencyForecast>)> {
        self.config
            .currencies
            .par_iter()
            .map(|&currency| (currency, self.advise(currency).map(|a| a.forecast)))
            .collect()
    }

    /// Number of memoized trends
    pub fn cached_trends(&self) -> usize {
        self.trend_cache.read().map(|c| c.len()).unwrap_or(0)
    }

    fn trend_for(&self, series: &Series) -> Result<TrendModel> {
        if !self.config.memoize_trends {
            return forecast::fit(series);
        }

        let currency = series.currency();
        let fingerprint = series.fingerprint();

        if let Ok(cache) = self.trend_cache.read() {
            if let Some((cached, model)) = cache.get(&currency) {
                if *cached == fingerprint {
                    log::debug!("Trend cache hit for {} ({:016x})", currency, fingerprint);
                    return Ok(*model);
                }
            }
        }

        let model = forecast::fit(series)?;
        // A poisoned lock only costs the memo
        if let Ok(mut cache) = self.trend_cache.write() {
            cache.insert(currency, (fingerprint, model));
        }
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Observation, TimeSeriesStore};
    use chrono::{Duration, NaiveDate};

    fn store() -> TimeSeriesStore {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut store = TimeSeriesStore::new();
        for i in 0..10 {
            let date = start + Duration::days(i);
            store
                .add_observation(
                    Observation::new(date)
                        .with_rate(Currency::EUR, Some(0.90 + 0.001 * i as f64))
                        .with_rate(Currency::JPY, Some(150.0 - 0.1 * i as f64))
                        .with_rate(Currency::GBP, if i == 9 { Some(0.79) } else { None }),
                )
                .unwrap();
        }
        store
    }

    fn engine() -> RateWatchEngine {
        RateWatchEngine::with_reader(Arc::new(store()))
    }

    #[test]
    fn test_engine_creation() {
        let engine = engine();
        assert_eq!(engine.config().horizons, vec![7, 15]);
        assert_eq!(engine.config().base, Currency::USD);
        assert_eq!(engine.cached_trends(), 0);
    }

    #[test]
    fn test_respond_ready() {
        let response = engine().respond(Some(Currency::EUR), Some(100.0));

        assert_eq!(response.outcome, Outcome::Ready);
        assert_eq!(response.converted_amount, 90.9);
        assert_eq!(response.chart.title(), "EUR Exchange Rate (USD Base)");

        let lines = response.recommendation.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("2024-01-17: Predicted rate"));
        assert!(lines[0].ends_with("Better to wait."));
        assert!(lines[1].starts_with("2024-01-25: Predicted rate"));
    }

    #[test]
    fn test_respond_without_amount() {
        let response = engine().respond(Some(Currency::JPY), None);

        assert_eq!(response.outcome, Outcome::Ready);
        assert_eq!(response.converted_amount, 0.0);
        assert_eq!(response.chart.title(), PROMPT_CHART_TITLE);
        assert!(response
            .recommendation
            .lines()
            .iter()
            .all(|l| l.ends_with("Convert now.")));
    }

    #[test]
    fn test_respond_no_selection() {
        let response = engine().respond(None, Some(100.0));

        assert_eq!(response.outcome, Outcome::NoSelection);
        assert_eq!(response.converted_amount, 0.0);
        assert!(response.chart.is_placeholder());
        assert_eq!(
            response.recommendation,
            RecommendationText::Message(NO_SELECTION_TEXT.to_string())
        );
    }

    #[test]
    fn test_respond_insufficient_data_is_soft() {
        let response = engine().respond(Some(Currency::GBP), Some(10.0));

        assert_eq!(response.outcome, Outcome::Failed(ErrorKind::InsufficientData));
        assert_eq!(response.chart.title(), ERROR_CHART_TITLE);
        assert_eq!(response.recommendation.lines(), vec![ERROR_TEXT.to_string()]);
        // Conversion succeeded before the fit failed
        assert_eq!(response.converted_amount, 7.9);
    }

    #[test]
    fn test_respond_missing_currency_is_soft() {
        let response = engine().respond(Some(Currency::INR), Some(10.0));

        assert_eq!(response.outcome, Outcome::Failed(ErrorKind::InsufficientData));
        assert_eq!(response.converted_amount, 0.0);
        assert!(response.chart.is_placeholder());
    }

    #[test]
    fn test_trend_memoized() {
        let engine = engine();
        let first = engine.advise(Currency::EUR).unwrap();
        assert_eq!(engine.cached_trends(), 1);

        let second = engine.advise(Currency::EUR).unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.cached_trends(), 1);
    }

    struct SwappableReader {
        series: RwLock<Series>,
    }

    impl RateReader for SwappableReader {
        fn series(&self, _currency: Currency) -> Result<Series> {
            Ok(self.series.read().unwrap().clone())
        }
    }

    fn line(start: f64, step: f64) -> Series {
        let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Series::from_pairs(
            Currency::EUR,
            (0..10).map(|i| (first + Duration::days(i), start + step * i as f64)),
        )
        .unwrap()
    }

    #[test]
    fn test_trend_refit_when_series_changes() {
        let reader = Arc::new(SwappableReader {
            series: RwLock::new(line(1.0, 0.1)),
        });
        let engine = RateWatchEngine::with_reader(reader.clone());

        let rising = engine.advise(Currency::EUR).unwrap();
        assert!(rising.forecast.model.slope > 0.0);
        assert!(rising
            .forecast
            .recommendation
            .lines()
            .iter()
            .all(|l| l.ends_with("Better to wait.")));

        // Same reader, new data: 2.5 falling to 1.6
        *reader.series.write().unwrap() = line(2.5, -0.1);

        let falling = engine.advise(Currency::EUR).unwrap();
        assert!(falling.forecast.model.slope < 0.0);
        assert_eq!(falling.forecast.latest.rate, 1.6);
        assert!(falling
            .forecast
            .recommendation
            .lines()
            .iter()
            .all(|l| l.ends_with("Convert now.")));
        assert_eq!(engine.cached_trends(), 1);
    }

    #[test]
    fn test_memoization_disabled() {
        let config = EngineConfig {
            memoize_trends: false,
            ..EngineConfig::default()
        };
        let engine = RateWatchEngine::new(config, Arc::new(store()));
        engine.advise(Currency::EUR).unwrap();
        assert_eq!(engine.cached_trends(), 0);
    }

    #[test]
    fn test_forecast_all() {
        let results = engine().forecast_all();

        assert_eq!(results.len(), Currency::quotes().len());
        let ok: Vec<Currency> = results
            .iter()
            .filter(|(_, r)| r.is_ok())
            .map(|(c, _)| *c)
            .collect();
        assert_eq!(ok, vec![Currency::EUR, Currency::JPY]);
    }
}
