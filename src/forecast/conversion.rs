//! Amount conversion at the latest rate

/// Round to `places` decimal places, exact halves to even
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

/// Convert `amount` at `latest_rate`, rounded to cents
///
/// A missing amount or a missing rate (no currency chosen) yields `0.0`.
/// Negative amounts are passed through unchanged in sign.
pub fn convert(amount: Option<f64>, latest_rate: Option<f64>) -> f64 {
    match (amount, latest_rate) {
        (Some(amount), Some(rate)) => round_to(amount * rate, 2),
        _ => 0.0,
    }
}
