//! Database schema definitions
//!
//! Row types for sqlx mapping. Timestamps are stored as
//! `YYYY-MM-DDTHH:MM:SS` text; `scope_date` holds the date part.

use crate::error::{PersistenceError, PersistenceResult};
use chrono::NaiveDate;
use rollcall_core::{parse_timestamp, AttendanceRecord, Session};

/// DDL, applied idempotently on startup.
pub const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS sessions (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        label     TEXT NOT NULL,
        opened_at TEXT NOT NULL,
        closed_at TEXT
    );

    -- At most one open session
    CREATE UNIQUE INDEX IF NOT EXISTS idx_sessions_single_open
        ON sessions ((closed_at IS NULL)) WHERE closed_at IS NULL;

    CREATE TABLE IF NOT EXISTS attendance (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        participant_id  TEXT NOT NULL,
        display_name    TEXT NOT NULL,
        secondary_token TEXT NOT NULL DEFAULT '',
        recorded_at     TEXT NOT NULL,
        scope_date      TEXT NOT NULL,
        session_id      INTEGER,
        FOREIGN KEY (session_id) REFERENCES sessions(id)
    );

    CREATE UNIQUE INDEX IF NOT EXISTS idx_attendance_session_scope
        ON attendance (participant_id, session_id) WHERE session_id IS NOT NULL;

    CREATE UNIQUE INDEX IF NOT EXISTS idx_attendance_day_scope
        ON attendance (participant_id, scope_date) WHERE session_id IS NULL;

    CREATE INDEX IF NOT EXISTS idx_attendance_recorded
        ON attendance (recorded_at DESC, id DESC);
"#;

/// Row type for table `sessions`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionRow {
    pub id: i64,
    pub label: String,
    pub opened_at: String,
    pub closed_at: Option<String>,
}

/// Row type for table `attendance`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttendanceRow {
    pub id: i64,
    pub participant_id: String,
    pub display_name: String,
    pub secondary_token: String,
    pub recorded_at: String,
    pub scope_date: String,
    pub session_id: Option<i64>,
}

/// Filters for attendance queries and exports. All optional, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub session_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl AttendanceFilter {
    pub fn for_session(session_id: i64) -> Self {
        Self {
            session_id: Some(session_id),
            ..Self::default()
        }
    }

    pub fn between(date_from: Option<NaiveDate>, date_to: Option<NaiveDate>) -> Self {
        Self {
            session_id: None,
            date_from,
            date_to,
        }
    }
}

// === Conversion implementations ===

impl TryFrom<SessionRow> for Session {
    type Error = PersistenceError;

    fn try_from(row: SessionRow) -> PersistenceResult<Self> {
        let opened_at = parse_timestamp(&row.opened_at)
            .map_err(|_| PersistenceError::invalid_timestamp("opened_at", &row.opened_at))?;
        let closed_at = match row.closed_at {
            Some(ref ts) => Some(
                parse_timestamp(ts)
                    .map_err(|_| PersistenceError::invalid_timestamp("closed_at", ts))?,
            ),
            None => None,
        };
        Ok(Session {
            id: row.id,
            label: row.label,
            opened_at,
            closed_at,
        })
    }
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = PersistenceError;

    fn try_from(row: AttendanceRow) -> PersistenceResult<Self> {
        let recorded_at = parse_timestamp(&row.recorded_at)
            .map_err(|_| PersistenceError::invalid_timestamp("recorded_at", &row.recorded_at))?;
        Ok(AttendanceRecord {
            id: row.id,
            participant_id: row.participant_id,
            display_name: row.display_name,
            secondary_token: row.secondary_token,
            recorded_at,
            scope_id: row.session_id,
        })
    }
}
