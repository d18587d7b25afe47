//! # Foresee Database Crate
//!
//! This crate is the storage adapter and data access layer of the service.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All SQL lives here. The rest of the workspace talks to the
//!   [`DataComponents`] trait and never sees a query string.
//! - **Secure by construction:** Place-scoped reads go through
//!   [`SecureData`], which checks requested places against the caller's
//!   permitted set before touching the database.
//! - **Asynchronous & Pooled:** All operations are asynchronous and share one
//!   `PgPool`; each call checks out a connection for a single statement.
//!
//! ## Public API
//!
//! - `connect` / `run_migrations`: pool creation and schema set-up.
//! - `DataComponents`: the data access trait; `DbRepository` implements it.
//! - `SecureData`: permission-checked place listing and grouped queries.
//! - `CrimeFilter`: the crime/place conditioning helper.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod components;
pub mod conditions;
pub mod connection;
pub mod error;
pub mod password;
pub mod repository;
pub mod secure;

// Re-export the key components to create a clean, public-facing API.
pub use components::DataComponents;
pub use conditions::CrimeFilter;
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::DbRepository;
pub use secure::SecureData;
