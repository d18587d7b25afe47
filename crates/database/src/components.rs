use crate::conditions::CrimeFilter;
use crate::error::DbError;
use async_trait::async_trait;
use core_types::{Capabilities, Frequency, GroupedRow, NewCrimeRecord, NewUser, User};

/// The data access layer the API is written against.
///
/// `DbRepository` is the PostgreSQL implementation. Permission-checked
/// access goes through [`crate::SecureData`], which only relies on these
/// primitive operations.
#[async_trait]
pub trait DataComponents: Send + Sync {
    /// Checks a plaintext password against the stored hash. An unknown
    /// email is reported as `false`, not as an error.
    async fn verify_login(&self, email: &str, password: &str) -> Result<bool, DbError>;

    async fn get_user(&self, email: &str) -> Result<Option<User>, DbError>;

    /// The permissions granted by the user's role. Empty for unknown users.
    async fn get_user_permissions(&self, email: &str) -> Result<Capabilities, DbError>;

    async fn role_exists(&self, role: &str) -> Result<bool, DbError>;

    /// Every distinct area that has at least one crime record.
    async fn all_places(&self) -> Result<Vec<String>, DbError>;

    /// One row per period bucket, ordered by period.
    async fn fetch_grouped_data(
        &self,
        filter: &CrimeFilter,
        frequency: Frequency,
    ) -> Result<Vec<GroupedRow>, DbError>;

    async fn insert_crime(&self, record: &NewCrimeRecord) -> Result<(), DbError>;

    /// Hashes the password and stores the user. Fails with
    /// `DbError::Duplicate` when the email is taken.
    async fn create_user(&self, new_user: &NewUser) -> Result<User, DbError>;
}
