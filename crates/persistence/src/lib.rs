//! # Rollcall Persistence
//!
//! SQLite storage for the session and attendance ledgers.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rollcall_persistence::{Database, SessionRepo};
//!
//! let db = Database::open("data/attendance.db").await?;
//! let active = SessionRepo::find_open(db.pool()).await?;
//! ```

pub mod error;
pub mod sqlite;

pub use error::{PersistenceError, PersistenceResult};
pub use sqlite::{
    create_pool, create_schema, init_database, AttendanceFilter, AttendanceRepo, AttendanceRow,
    SessionRepo, SessionRow,
};

use sqlx::SqlitePool;
use std::path::{Path, PathBuf};

/// Database facade - owns the pool for one attendance database file
pub struct Database {
    pool: SqlitePool,
    path: PathBuf,
}

impl Database {
    /// Open the database file, creating it and its schema if missing
    pub async fn open<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let path = path.as_ref().to_path_buf();
        let pool = init_database(&path).await?;
        Ok(Self { pool, path })
    }

    /// Get SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
