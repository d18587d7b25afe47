use crate::enums::SeriesKind;
use crate::error::CoreError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user. The password hash never leaves the database crate.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub area: String,
    pub role: String,
}

/// Everything needed to create a user; `password` is still plaintext here.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    pub area: String,
    pub password: String,
    pub role: String,
}

/// A crime record ready to append, category already resolved to its stored
/// name and weight.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCrimeRecord {
    pub date: NaiveDateTime,
    pub crimecodedesc: String,
    pub areaname: String,
    pub pond: f64,
}

/// One bucket of the grouped aggregation query.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct GroupedRow {
    pub period: NaiveDate,
    pub count: i64,
    /// Sum of the per-record weights in the bucket.
    pub pond: f64,
}

/// A single observation handed to the forecaster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub period: NaiveDate,
    pub value: f64,
}

/// Raw forecaster output for one period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub ds: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
    pub kind: SeriesKind,
}

/// A forecast row as returned to clients: whole, non-negative counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub ds: NaiveDate,
    pub yhat: i64,
    pub yhat_lower: i64,
    pub yhat_upper: i64,
}

impl From<&ForecastPoint> for ForecastRow {
    // round and max(0) are both monotonic, so bound ordering survives.
    fn from(point: &ForecastPoint) -> Self {
        let to_count = |v: f64| v.round().max(0.0) as i64;
        Self {
            ds: point.ds,
            yhat: to_count(point.yhat),
            yhat_lower: to_count(point.yhat_lower),
            yhat_upper: to_count(point.yhat_upper),
        }
    }
}

/// An inclusive date window over grouped periods. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl TimeWindow {
    pub fn new(
        init_time: Option<NaiveDateTime>,
        end_time: Option<NaiveDateTime>,
    ) -> Result<Self, CoreError> {
        let start = init_time.map(|t| t.date());
        let end = end_time.map(|t| t.date());
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(CoreError::InvalidInput(
                    "init_time".to_string(),
                    format!("{s} is after end_time {e}"),
                ));
            }
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }

    pub fn retain(&self, rows: Vec<GroupedRow>) -> Vec<GroupedRow> {
        rows.into_iter().filter(|r| self.contains(r.period)).collect()
    }
}
