use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Database query failed: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Password hashing failed: {0}")]
    HashError(#[from] bcrypt::BcryptError),

    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("A user with email '{0}' already exists.")]
    Duplicate(String),

    #[error("Place '{0}' is outside the caller's permitted places.")]
    PlaceNotPermitted(String),

    #[error("The caller lacks the '{0}' permission.")]
    MissingPermission(core_types::Permission),
}
