//! # Foresee Core Types
//!
//! The shared vocabulary of the workspace: users and their capabilities,
//! crime records, grouped series and forecast rows. This crate has no
//! knowledge of HTTP or of the database engine; it only defines data and the
//! small, pure rules attached to it.

pub mod capabilities;
pub mod dates;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use capabilities::Capabilities;
pub use enums::{Frequency, Permission, Scope, SeriesKind};
pub use error::CoreError;
pub use structs::{
    ForecastPoint, ForecastRow, GroupedRow, NewCrimeRecord, NewUser, SeriesPoint, TimeWindow, User,
};
