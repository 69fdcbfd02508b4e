//! SQLite persistence module
//!
//! Repository pattern for the session and attendance tables.

pub mod repos;
pub mod schema;

pub use repos::{create_pool, create_schema, init_database, AttendanceRepo, SessionRepo};
pub use schema::{AttendanceFilter, AttendanceRow, SessionRow};
