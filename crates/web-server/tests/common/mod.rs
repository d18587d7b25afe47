#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use core_types::{
    Capabilities, Frequency, GroupedRow, NewCrimeRecord, NewUser, Permission, User,
};
use database::password::{hash_password, verify_password, MIN_COST};
use database::{CrimeFilter, DataComponents, DbError};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;
use web_server::{build_router, AppState, InMemorySessionStore};

pub const ADMIN: (&str, &str) = ("admin@foresee.test", "admin123");
pub const LOCAL: (&str, &str) = ("local@foresee.test", "local123");
pub const ANALYST: (&str, &str) = ("analyst@foresee.test", "analyst123");
pub const CLERK: (&str, &str) = ("clerk@foresee.test", "clerk123");

struct StoredUser {
    user: User,
    password_hash: String,
}

/// In-memory stand-in for the PostgreSQL repository.
pub struct MemoryData {
    users: Mutex<Vec<StoredUser>>,
    roles: HashMap<String, Vec<Permission>>,
    crimes: Mutex<Vec<NewCrimeRecord>>,
}

fn bucket(frequency: Frequency, at: NaiveDateTime) -> NaiveDate {
    let d = at.date();
    match frequency {
        Frequency::Month => NaiveDate::from_ymd_opt(d.year(), d.month(), 1).unwrap(),
        Frequency::Quarter => NaiveDate::from_ymd_opt(d.year(), d.month0() / 3 * 3 + 1, 1).unwrap(),
        Frequency::Week => d - Days::new(d.weekday().num_days_from_monday() as u64),
    }
}

impl MemoryData {
    pub fn new() -> Self {
        use Permission::*;
        let roles = HashMap::from([
            ("admin".to_string(), vec![Predict, NewData, NewUsers, SeeLocal, SeeAll]),
            ("analyst".to_string(), vec![Predict, SeeAll]),
            ("capturista".to_string(), vec![NewData, SeeLocal]),
            ("SEE_LOCAL".to_string(), vec![SeeLocal]),
            ("SEE_ALL".to_string(), vec![SeeAll]),
        ]);
        Self {
            users: Mutex::new(Vec::new()),
            roles,
            crimes: Mutex::new(Vec::new()),
        }
    }

    pub async fn add_user(&self, email: &str, password: &str, area: &str, role: &str) {
        let password_hash = hash_password(password, MIN_COST).await.unwrap();
        self.users.lock().unwrap().push(StoredUser {
            user: User {
                id: Uuid::new_v4(),
                email: email.to_string(),
                full_name: email.split('@').next().unwrap().to_string(),
                area: area.to_string(),
                role: role.to_string(),
            },
            password_hash,
        });
    }

    pub fn add_crimes(&self, date: NaiveDate, category: &str, area: &str, pond: f64, n: usize) {
        let mut crimes = self.crimes.lock().unwrap();
        for _ in 0..n {
            crimes.push(NewCrimeRecord {
                date: date.and_hms_opt(12, 0, 0).unwrap(),
                crimecodedesc: category.to_string(),
                areaname: area.to_string(),
                pond,
            });
        }
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn crime_count(&self) -> usize {
        self.crimes.lock().unwrap().len()
    }

    pub fn last_crime(&self) -> Option<NewCrimeRecord> {
        self.crimes.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl DataComponents for MemoryData {
    async fn verify_login(&self, email: &str, password: &str) -> Result<bool, DbError> {
        let hash = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.user.email == email)
            .map(|u| u.password_hash.clone());
        match hash {
            Some(hash) => verify_password(password, &hash).await,
            None => Ok(false),
        }
    }

    async fn get_user(&self, email: &str) -> Result<Option<User>, DbError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.user.email == email)
            .map(|u| u.user.clone()))
    }

    async fn get_user_permissions(&self, email: &str) -> Result<Capabilities, DbError> {
        let role = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.user.email == email)
            .map(|u| u.user.role.clone());
        Ok(role
            .and_then(|r| self.roles.get(&r).cloned())
            .unwrap_or_default()
            .into_iter()
            .collect())
    }

    async fn role_exists(&self, role: &str) -> Result<bool, DbError> {
        Ok(self.roles.contains_key(role))
    }

    async fn all_places(&self) -> Result<Vec<String>, DbError> {
        let mut places: Vec<String> = self
            .crimes
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.areaname.clone())
            .collect();
        places.sort();
        places.dedup();
        Ok(places)
    }

    async fn fetch_grouped_data(
        &self,
        filter: &CrimeFilter,
        frequency: Frequency,
    ) -> Result<Vec<GroupedRow>, DbError> {
        let mut buckets: BTreeMap<NaiveDate, (i64, f64)> = BTreeMap::new();
        for c in self.crimes.lock().unwrap().iter() {
            if filter.matches(&c.crimecodedesc, &c.areaname) {
                let entry = buckets.entry(bucket(frequency, c.date)).or_default();
                entry.0 += 1;
                entry.1 += c.pond;
            }
        }
        Ok(buckets
            .into_iter()
            .map(|(period, (count, pond))| GroupedRow { period, count, pond })
            .collect())
    }

    async fn insert_crime(&self, record: &NewCrimeRecord) -> Result<(), DbError> {
        self.crimes.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User, DbError> {
        if self.get_user(&new_user.email).await?.is_some() {
            return Err(DbError::Duplicate(new_user.email.clone()));
        }
        self.add_user(&new_user.email, &new_user.password, &new_user.area, &new_user.role)
            .await;
        Ok(self.get_user(&new_user.email).await?.unwrap())
    }
}

pub struct TestApp {
    pub router: Router,
    pub data: Arc<MemoryData>,
    pub sessions: Arc<InMemorySessionStore>,
}

const SETTINGS: &str = r#"
[forecast]
interval_width = 0.8
max_steps = 24
max_history = 520

[[categories]]
label = "Robo"
code = "Robo"
weight = 1.5

[[categories]]
label = "Homicidio"
code = "Homicidio"
weight = 4.0

[[categories]]
label = "Hurto a vehículo"
code = "HURTO VEHICULO"
weight = 2.0
"#;

/// Four users and two years of monthly data in COMUNA 1 and COMUNA 2.
pub async fn test_app() -> TestApp {
    let data = Arc::new(MemoryData::new());
    data.add_user(ADMIN.0, ADMIN.1, "COMUNA 1", "admin").await;
    data.add_user(LOCAL.0, LOCAL.1, "COMUNA 1", "SEE_LOCAL").await;
    data.add_user(ANALYST.0, ANALYST.1, "COMUNA 2", "analyst").await;
    data.add_user(CLERK.0, CLERK.1, "COMUNA 2", "capturista").await;

    for year in [2023, 2024] {
        for month in 1..=12u32 {
            let day = NaiveDate::from_ymd_opt(year, month, 5).unwrap();
            data.add_crimes(day, "Robo", "COMUNA 1", 1.5, 3 + (month % 4) as usize);
            data.add_crimes(day, "Homicidio", "COMUNA 1", 4.0, 1);
            data.add_crimes(day, "Robo", "COMUNA 2", 1.5, 2);
        }
    }

    let sessions = Arc::new(InMemorySessionStore::new());
    let settings = configuration::load_config_from_str(SETTINGS).unwrap();
    let state = AppState::new(data.clone(), sessions.clone(), &settings).unwrap();
    let router = build_router(Arc::new(state), settings.server.body_limit);

    TestApp { router, data, sessions }
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header("authorization", format!("Bearer {}", t));
        }
        let req = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        Reply { status, headers, body }
    }

    pub async fn login(&self, (email, password): (&str, &str)) -> String {
        let reply = self
            .send(
                Method::POST,
                "/login",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "login failed: {:?}", reply.body);
        reply.body["token"].as_str().unwrap().to_string()
    }
}
