//! # Foresee Forecaster
//!
//! Turns a grouped crime series into a forecast with confidence bounds.
//!
//! - **Pure logic:** no I/O, no knowledge of HTTP or SQL. Input is a slice of
//!   `SeriesPoint`s, output is a vector of `ForecastPoint`s.
//! - **Calendar aware:** periods are stepped on the bucket's calendar
//!   (quarter, month, ISO week) and gaps are filled with zero counts.
//!
//! `apply_ponderation` prepares the series from grouped rows, choosing
//! between raw counts and weighted sums.

pub mod calendar;
pub mod error;
pub mod model;
pub mod weighting;

pub use error::ForecastError;
pub use model::{Forecaster, normal_quantile};
pub use weighting::apply_ponderation;
