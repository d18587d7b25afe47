//! Request and response bodies.

use chrono::{NaiveDate, NaiveDateTime};
use core_types::dates::{deserialize_lenient, deserialize_lenient_opt};
use core_types::{Capabilities, Frequency, GroupedRow, Scope};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct PermissionsResponse {
    pub permissions: Capabilities,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct SecurePlacesQuery {
    pub see: Scope,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlacesResponse {
    pub places: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct GroupedDataRequest {
    #[serde(default)]
    pub chosen_crime: Option<Vec<String>>,
    #[serde(default)]
    pub chosen_place: Option<Vec<String>>,
    pub frequency: Frequency,
    #[serde(default, deserialize_with = "deserialize_lenient_opt")]
    pub init_time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_lenient_opt")]
    pub end_time: Option<NaiveDateTime>,
}

/// A grouped bucket as returned by `/grouped-data`; the weight sum stays
/// internal.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupedDataRow {
    pub period: NaiveDate,
    pub count: i64,
}

impl From<GroupedRow> for GroupedDataRow {
    fn from(row: GroupedRow) -> Self {
        Self {
            period: row.period,
            count: row.count,
        }
    }
}

fn default_steps() -> usize {
    6
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub chosen_crime: Option<Vec<String>>,
    #[serde(default)]
    pub chosen_place: Option<Vec<String>>,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default = "default_steps")]
    pub n_steps: usize,
    #[serde(default)]
    pub ponder: bool,
}

#[derive(Debug, Deserialize)]
pub struct NewCrimeRequest {
    #[serde(deserialize_with = "deserialize_lenient")]
    pub date: NaiveDateTime,
    pub crimecodedesc: String,
    pub areaname: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: String,
    pub area: String,
    pub password: String,
    pub role: String,
}

/// A deliberately loose shape check: one `@`, a non-empty local part and a
/// dotted domain, no whitespace.
pub fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(looks_like_email("ana@example.com"));
        assert!(!looks_like_email("ana@example"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("ana@@example.com"));
        assert!(!looks_like_email("ana maria@example.com"));
    }

    #[test]
    fn predict_defaults() {
        let req: PredictRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.frequency, Frequency::Month);
        assert_eq!(req.n_steps, 6);
        assert!(!req.ponder);
        assert!(req.chosen_place.is_none());
    }

    #[test]
    fn grouped_request_reads_dates() {
        let req: GroupedDataRequest = serde_json::from_str(
            r#"{"chosen_crime":["Robo"],"frequency":"Por semana","init_time":"2024-03-01","end_time":null}"#,
        )
        .unwrap();
        assert_eq!(req.frequency, Frequency::Week);
        assert_eq!(req.init_time.unwrap().to_string(), "2024-03-01 00:00:00");
        assert!(req.end_time.is_none());
    }
}
