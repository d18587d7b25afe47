//! bcrypt helpers. Hashing is CPU-bound, so it runs on the blocking pool.

use crate::error::DbError;

pub use bcrypt::DEFAULT_COST;

/// Lowest cost bcrypt accepts; only worth using in tests.
pub const MIN_COST: u32 = 4;

pub async fn hash_password(password: &str, cost: u32) -> Result<String, DbError> {
    let password = password.to_owned();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}

pub async fn verify_password(password: &str, hash: &str) -> Result<bool, DbError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    let ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(ok)
}
