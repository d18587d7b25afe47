use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Not enough data to fit a forecast: {0}")]
    NotEnoughData(String),

    #[error("Invalid forecast parameter: {0}")]
    InvalidParameter(String),

    #[error("Calendar overflow while stepping periods from {0}")]
    Calendar(chrono::NaiveDate),

    #[error("Least-squares fit failed: {0}")]
    Fit(String),
}
