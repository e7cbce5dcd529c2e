//! Currency codes tracked by RateWatch

use crate::error::{RateWatchError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currency enumeration (ISO 4217 codes)
///
/// USD is the quote base: every stored rate is units of the other currency
/// per one US dollar.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Currency {
    /// US Dollar
    USD,
    /// Australian Dollar
    AUD,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Indian Rupee
    INR,
    /// Japanese Yen
    JPY,
}

impl Currency {
    /// Get ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::AUD => "AUD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::INR => "INR",
            Currency::JPY => "JPY",
        }
    }

    /// Get currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::AUD => "A$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::INR => "₹",
            Currency::JPY => "¥",
        }
    }

    /// Parse from ISO code, case-insensitive
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "AUD" => Some(Currency::AUD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "INR" => Some(Currency::INR),
            "JPY" => Some(Currency::JPY),
            _ => None,
        }
    }

    /// Get all supported currencies
    pub fn all() -> Vec<Currency> {
        vec![
            Currency::USD,
            Currency::AUD,
            Currency::EUR,
            Currency::GBP,
            Currency::INR,
            Currency::JPY,
        ]
    }

    /// Currencies quoted against the USD base, in selection order
    pub fn quotes() -> Vec<Currency> {
        Self::all()
            .into_iter()
            .filter(|c| *c != Currency::USD)
            .collect()
    }
}

impl FromStr for Currency {
    type Err = RateWatchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_code(s).ok_or_else(|| RateWatchError::UnknownCurrency(s.to_string()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code() {
        assert_eq!(Currency::USD.code(), "USD");
        assert_eq!(Currency::EUR.code(), "EUR");
        assert_eq!(Currency::INR.code(), "INR");
    }

    #[test]
    fn test_currency_symbol() {
        assert_eq!(Currency::USD.symbol(), "$");
        assert_eq!(Currency::EUR.symbol(), "€");
        assert_eq!(Currency::GBP.symbol(), "£");
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("jpy"), Some(Currency::JPY));
        assert_eq!(Currency::from_code(" aud "), Some(Currency::AUD));
        assert_eq!(Currency::from_code("CHF"), None);
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("gbp".parse::<Currency>().unwrap(), Currency::GBP);
        let err = "XXX".parse::<Currency>().unwrap_err();
        assert!(matches!(err, RateWatchError::UnknownCurrency(ref c) if c == "XXX"));
    }

    #[test]
    fn test_currency_display() {
        assert_eq!(format!("{}", Currency::USD), "USD");
        assert_eq!(format!("{}", Currency::JPY), "JPY");
    }

    #[test]
    fn test_quotes_exclude_base() {
        let quotes = Currency::quotes();
        assert_eq!(
            quotes,
            vec![
                Currency::AUD,
                Currency::EUR,
                Currency::GBP,
                Currency::INR,
                Currency::JPY
            ]
        );
        assert!(!quotes.contains(&Currency::USD));
    }
}
