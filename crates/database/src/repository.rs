use crate::DbError;
use crate::components::DataComponents;
use crate::conditions::{grouped_query, CrimeFilter};
use crate::password::{self, DEFAULT_COST};
use async_trait::async_trait;
use core_types::{Capabilities, Frequency, GroupedRow, NewCrimeRecord, NewUser, User};
use sqlx::postgres::PgPool;
use uuid::Uuid;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
    bcrypt_cost: u32,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            bcrypt_cost: DEFAULT_COST,
        }
    }
}

#[async_trait]
impl DataComponents for DbRepository {
    async fn verify_login(&self, email: &str, password: &str) -> Result<bool, DbError> {
        let stored: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        match stored {
            Some(hash) => password::verify_password(password, &hash).await,
            None => Ok(false),
        }
    }

    async fn get_user(&self, email: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, full_name, area, role FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn get_user_permissions(&self, email: &str) -> Result<Capabilities, DbError> {
        let names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT rp.permission
            FROM users AS u
            JOIN role_permissions AS rp ON rp.role = u.role
            WHERE u.email = $1
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        Ok(Capabilities::from_names(names))
    }

    async fn role_exists(&self, role: &str) -> Result<bool, DbError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM roles WHERE name = $1)")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn all_places(&self) -> Result<Vec<String>, DbError> {
        let places: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT areaname FROM crimes ORDER BY areaname")
                .fetch_all(&self.pool)
                .await?;
        Ok(places)
    }

    async fn fetch_grouped_data(
        &self,
        filter: &CrimeFilter,
        frequency: Frequency,
    ) -> Result<Vec<GroupedRow>, DbError> {
        let mut query = grouped_query(filter, frequency);
        let rows = query
            .build_query_as::<GroupedRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert_crime(&self, record: &NewCrimeRecord) -> Result<(), DbError> {
        sqlx::query("INSERT INTO crimes (date, crimecodedesc, areaname, pond) VALUES ($1, $2, $3, $4)")
            .bind(record.date)
            .bind(&record.crimecodedesc)
            .bind(&record.areaname)
            .bind(record.pond)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User, DbError> {
        let password_hash = password::hash_password(&new_user.password, self.bcrypt_cost).await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, full_name, area, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING id, email, full_name, area, role
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.email)
        .bind(&new_user.full_name)
        .bind(&new_user.area)
        .bind(&password_hash)
        .bind(&new_user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DbError::Duplicate(new_user.email.clone())
            }
            other => other.into(),
        })?;

        Ok(user)
    }
}
