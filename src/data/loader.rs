//! Rate table loaders
//!
//! Two formats are understood:
//!
//! - CSV with a `date` column followed by one column per currency code.
//!   Empty cells are absent rates.
//! - The Frankfurter time-series JSON document
//!   (`{"base": "USD", "rates": {"2024-01-02": {"EUR": 0.91}}}`).

use super::store::{Observation, TimeSeriesStore};
use crate::currency::Currency;
use crate::error::{RateWatchError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Frankfurter `/{start}..{end}` response body
#[derive(Debug, Deserialize)]
pub struct FrankfurterTimeSeries {
    #[serde(default)]
    pub amount: Option<f64>,
    pub base: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    pub rates: BTreeMap<String, BTreeMap<String, Option<f64>>>,
}

impl FrankfurterTimeSeries {
    /// Convert into a store, skipping codes RateWatch does not track
    pub fn into_store(self) -> Result<TimeSeriesStore> {
        let base: Currency = self.base.parse()?;
        let mut observations = Vec::with_capacity(self.rates.len());

        for (date_str, day_rates) in self.rates {
            let date = parse_date(&date_str)?;
            let mut observation = Observation::new(date);

            for (code, rate) in day_rates {
                match Currency::from_code(&code) {
                    Some(currency) => {
                        observation.rates.insert(currency, rate);
                    }
                    None => log::warn!("Skipping unsupported currency {} on {}", code, date),
                }
            }

            observations.push(observation);
        }

        let mut store = TimeSeriesStore::with_base(base);
        store.add_observations(observations)?;
        Ok(store)
    }
}

/// Parse a Frankfurter time-series JSON document
pub fn parse_frankfurter_json(json: &str) -> Result<TimeSeriesStore> {
    let document: FrankfurterTimeSeries = serde_json::from_str(json)?;
    let store = document.into_store()?;
    log::info!(
        "Loaded {} dates ({} rates) from JSON",
        store.num_dates(),
        store.num_entries()
    );
    Ok(store)
}

/// Parse a CSV rate table
///
/// Expected format: `date,EUR,INR,...` header then one row per date.
pub fn parse_csv(csv_data: &str) -> Result<TimeSeriesStore> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(csv_data.as_bytes());

    let headers = reader.headers()?.clone();
    let date_column = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("date"))
        .ok_or_else(|| RateWatchError::ParseError("CSV has no date column".to_string()))?;

    let columns: Vec<(usize, Currency)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != date_column)
        .filter_map(|(i, header)| match Currency::from_code(header) {
            Some(currency) => Some((i, currency)),
            None => {
                log::warn!("Skipping unsupported CSV column {}", header);
                None
            }
        })
        .collect();

    let mut observations = Vec::new();
    for (row_num, record) in reader.records().enumerate() {
        let record = record?;
        let line = row_num + 2;

        let date_str = record.get(date_column).ok_or_else(|| {
            RateWatchError::ParseError(format!("Missing date at line {}", line))
        })?;
        let date = parse_date(date_str).map_err(|e| {
            RateWatchError::ParseError(format!("Invalid date at line {}: {}", line, e))
        })?;

        let mut observation = Observation::new(date);
        for (i, currency) in &columns {
            let cell = record.get(*i).unwrap_or("");
            let rate = if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
                None
            } else {
                Some(cell.parse::<f64>().map_err(|e| {
                    RateWatchError::ParseError(format!(
                        "Invalid {} rate at line {}: {}",
                        currency, line, e
                    ))
                })?)
            };
            observation.rates.insert(*currency, rate);
        }
        observations.push(observation);
    }

    let mut store = TimeSeriesStore::new();
    store.add_observations(observations)?;
    log::info!(
        "Loaded {} dates ({} rates) from CSV",
        store.num_dates(),
        store.num_entries()
    );
    Ok(store)
}

/// Load a rate table from disk, picking the format from the extension
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<TimeSeriesStore> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => parse_frankfurter_json(&contents),
        Some(ext) if ext.eq_ignore_ascii_case("csv") => parse_csv(&contents),
        _ => Err(RateWatchError::ParseError(format!(
            "Unsupported rate file {}: expected .csv or .json",
            path.display()
        ))),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| RateWatchError::ParseError(format!("Invalid date {}: {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RateReader;

    const JSON: &str = r#"{
        "amount": 1.0,
        "base": "USD",
        "start_date": "2024-01-02",
        "end_date": "2024-01-04",
        "rates": {
            "2024-01-03": {"EUR": 0.9155, "JPY": 143.12, "CHF": 0.85},
            "2024-01-02": {"EUR": 0.9108, "JPY": 141.94},
            "2024-01-04": {"EUR": 0.9131}
        }
    }"#;

    #[test]
    fn test_parse_frankfurter_json() {
        let store = parse_frankfurter_json(JSON).unwrap();

        assert_eq!(store.base(), Currency::USD);
        assert_eq!(store.num_dates(), 3);

        let eur = store.series(Currency::EUR).unwrap();
        assert_eq!(eur.len(), 3);
        assert_eq!(eur.latest_rate(), Some(0.9131));

        // JPY has no 2024-01-04 row
        let jpy = store.series(Currency::JPY).unwrap();
        assert_eq!(jpy.len(), 2);
        assert_eq!(jpy.latest_rate(), Some(143.12));
    }

    #[test]
    fn test_parse_json_rejects_bad_date() {
        let json = r#"{"base": "USD", "rates": {"03/01/2024": {"EUR": 0.91}}}"#;
        assert!(matches!(
            parse_frankfurter_json(json),
            Err(RateWatchError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_csv_with_gaps() {
        let csv = "date,EUR,INR,XYZ\n\
                   2024-01-02,0.9108,83.21,1\n\
                   2024-01-03,,83.30,2\n\
                   # holiday row omitted\n\
                   2024-01-05,0.9150,NaN,3\n";

        let store = parse_csv(csv).unwrap();
        assert_eq!(store.num_dates(), 3);

        let eur = store.series(Currency::EUR).unwrap();
        assert_eq!(eur.len(), 2);

        let inr = store.series(Currency::INR).unwrap();
        assert_eq!(inr.len(), 2);
        assert_eq!(inr.latest_rate(), Some(83.30));
    }

    #[test]
    fn test_parse_csv_requires_date_column() {
        let csv = "day,EUR\n2024-01-02,0.91\n";
        assert!(matches!(parse_csv(csv), Err(RateWatchError::ParseError(_))));
    }

    #[test]
    fn test_parse_csv_bad_rate() {
        let csv = "date,EUR\n2024-01-02,abc\n";
        let err = parse_csv(csv).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
