//! # RateWatch
//!
//! Exchange-rate trend forecasting for currency conversion.
//!
//! RateWatch takes a short daily history of USD-based exchange rates, fits a
//! linear trend per currency, projects it one and two weeks ahead and tells
//! the user whether to convert now or wait.
//!
//! ## Example
//!
//! ```rust
//! use ratewatch::prelude::*;
//! use chrono::{Duration, NaiveDate};
//! use std::sync::Arc;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let mut store = TimeSeriesStore::new();
//! for i in 0..30 {
//!     let rate = 0.90 + 0.001 * i as f64;
//!     store.add_rate(start + Duration::days(i), Currency::EUR, Some(rate)).unwrap();
//! }
//!
//! let engine = RateWatchEngine::with_reader(Arc::new(store));
//! let response = engine.respond(Some(Currency::EUR), Some(100.0));
//!
//! assert_eq!(response.outcome, Outcome::Ready);
//! for line in response.recommendation.lines() {
//!     println!("{}", line);
//! }
//! ```

pub mod currency;
pub mod data;
pub mod engine;
pub mod error;
pub mod forecast;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::currency::Currency;
    pub use crate::data::{Observation, RateReader, Series, TimeSeriesStore};
    pub use crate::engine::{EngineConfig, Outcome, RateWatchEngine, Response};
    pub use crate::error::{ErrorKind, RateWatchError, Result};
    pub use crate::forecast::{
        convert, fit, project, recommend, Directive, Forecast, Recommendation, TrendModel,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_exports() {
        let store = TimeSeriesStore::new();
        assert!(store.is_empty());
        assert_eq!(Currency::quotes().len(), 5);
    }
}
