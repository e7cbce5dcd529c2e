//! Exchange-rate history
//!
//! # Components
//!
//! - **series**: per-currency ordered `(date, rate)` history
//! - **store**: in-memory time-series store of dated observations
//! - **reader**: the `RateReader` trait the engine reads through
//! - **loader**: CSV and Frankfurter JSON parsing
//! - **frankfurter**: live HTTP fetch (feature `async`)

#[cfg(feature = "async")]
pub mod frankfurter;
pub mod loader;
pub mod reader;
pub mod series;
pub mod store;

#[cfg(feature = "async")]
pub use frankfurter::FrankfurterSource;
pub use loader::{load_path, parse_csv, parse_frankfurter_json};
pub use reader::RateReader;
pub use series::{RatePoint, Series};
pub use store::{Observation, TimeSeriesStore};
