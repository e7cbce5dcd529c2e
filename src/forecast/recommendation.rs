//! Convert-now or wait decision rule

use super::projection::Forecast;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What to do with the money today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Directive {
    ConvertNow,
    Wait,
}

impl Directive {
    /// Decide from a predicted rate and the latest observed rate
    ///
    /// Rates are quoted as foreign units per base unit, so a higher
    /// projected rate means more foreign currency later. A tie converts now.
    pub fn decide(predicted_rate: f64, latest_rate: f64) -> Self {
        if predicted_rate > latest_rate {
            Directive::Wait
        } else {
            Directive::ConvertNow
        }
    }

    /// User-facing text
    pub fn text(&self) -> &'static str {
        match self {
            Directive::ConvertNow => "Convert now.",
            Directive::Wait => "Better to wait.",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Decision for one horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub date: NaiveDate,
    pub predicted_rate: f64,
    pub directive: Directive,
}

impl fmt::Display for RecommendationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Predicted rate {:.4} — {}",
            self.date.format("%Y-%m-%d"),
            self.predicted_rate,
            self.directive
        )
    }
}

/// Decisions for every forecast horizon, in forecast order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Recommendation {
    pub entries: Vec<RecommendationEntry>,
}

impl Recommendation {
    /// Rendered text, one line per horizon
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compare each projected rate with the latest observed one
pub fn recommend(forecast: &Forecast, latest_rate: f64) -> Recommendation {
    let entries = forecast
        .iter()
        .map(|p| RecommendationEntry {
            date: p.date,
            predicted_rate: p.rate,
            directive: Directive::decide(p.rate, latest_rate),
        })
        .collect();

    Recommendation { entries }
}
