//! Repository implementations for SQLite
//!
//! Every method takes a sqlx executor, so the same call works against the
//! pool or inside a transaction (`&mut *tx`).

use crate::error::{PersistenceError, PersistenceResult};
use crate::sqlite::schema::*;
use chrono::NaiveDateTime;
use rollcall_core::{format_timestamp, AttendanceRecord, NewAttendance, Scope, Session};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};
use std::path::Path;
use std::time::Duration;

const SESSION_COLUMNS: &str = "id, label, opened_at, closed_at";
const ATTENDANCE_COLUMNS: &str =
    "id, participant_id, display_name, secondary_token, recorded_at, scope_date, session_id";

fn date_key(ts: &NaiveDateTime) -> String {
    ts.date().format("%Y-%m-%d").to_string()
}

// ============================================================================
// Session Repository
// ============================================================================

/// Repository for the sessions table
pub struct SessionRepo;

impl SessionRepo {
    /// The open session, if any
    pub async fn find_open<'e, E>(executor: E) -> PersistenceResult<Option<Session>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            "SELECT {} FROM sessions WHERE closed_at IS NULL ORDER BY id DESC LIMIT 1",
            SESSION_COLUMNS
        );
        let row = sqlx::query_as::<_, SessionRow>(&sql)
            .fetch_optional(executor)
            .await?;
        row.map(Session::try_from).transpose()
    }

    pub async fn get_by_id<'e, E>(executor: E, id: i64) -> PersistenceResult<Session>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {} FROM sessions WHERE id = ?", SESSION_COLUMNS);
        sqlx::query_as::<_, SessionRow>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Session", &id.to_string()))
            .and_then(Session::try_from)
    }

    /// Insert an open session, returning its id
    pub async fn insert<'e, E>(
        executor: E,
        label: &str,
        opened_at: &NaiveDateTime,
    ) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("INSERT INTO sessions (label, opened_at) VALUES (?, ?)")
            .bind(label)
            .bind(format_timestamp(opened_at))
            .execute(executor)
            .await
            .map_err(|e| PersistenceError::from_insert(e, "an open session already exists"))?;
        Ok(result.last_insert_rowid())
    }

    /// Close every open session at `closed_at`; returns rows affected
    pub async fn close_open<'e, E>(executor: E, closed_at: &NaiveDateTime) -> PersistenceResult<u64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE sessions SET closed_at = ? WHERE closed_at IS NULL")
            .bind(format_timestamp(closed_at))
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// All sessions, most recent first
    pub async fn list<'e, E>(executor: E) -> PersistenceResult<Vec<Session>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {} FROM sessions ORDER BY id DESC", SESSION_COLUMNS);
        sqlx::query_as::<_, SessionRow>(&sql)
            .fetch_all(executor)
            .await?
            .into_iter()
            .map(Session::try_from)
            .collect()
    }
}

// ============================================================================
// Attendance Repository
// ============================================================================

/// Repository for the attendance table
pub struct AttendanceRepo;

impl AttendanceRepo {
    /// Whether the participant already has a record under `scope`
    pub async fn exists<'e, E>(
        executor: E,
        participant_id: &str,
        scope: &Scope,
    ) -> PersistenceResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: Option<(i64,)> = match scope {
            Scope::Session(session_id) => {
                sqlx::query_as(
                    "SELECT 1 FROM attendance WHERE participant_id = ? AND session_id = ? LIMIT 1",
                )
                .bind(participant_id)
                .bind(*session_id)
                .fetch_optional(executor)
                .await?
            }
            Scope::Day(date) => {
                sqlx::query_as(
                    "SELECT 1 FROM attendance \
                     WHERE participant_id = ? AND scope_date = ? AND session_id IS NULL LIMIT 1",
                )
                .bind(participant_id)
                .bind(date.format("%Y-%m-%d").to_string())
                .fetch_optional(executor)
                .await?
            }
        };
        Ok(row.is_some())
    }

    /// Unconditional insert. Duplicate checks belong to the caller; the
    /// unique indexes turn a missed check into `UniqueViolation`.
    pub async fn insert<'e, E>(
        executor: E,
        entry: &NewAttendance,
    ) -> PersistenceResult<AttendanceRecord>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance
                (participant_id, display_name, secondary_token, recorded_at, scope_date, session_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.participant_id)
        .bind(&entry.display_name)
        .bind(&entry.secondary_token)
        .bind(format_timestamp(&entry.recorded_at))
        .bind(date_key(&entry.recorded_at))
        .bind(entry.scope.session_id())
        .execute(executor)
        .await
        .map_err(|e| {
            PersistenceError::from_insert(
                e,
                &format!("{} already recorded for {}", entry.participant_id, entry.scope),
            )
        })?;

        Ok(AttendanceRecord {
            id: result.last_insert_rowid(),
            participant_id: entry.participant_id.clone(),
            display_name: entry.display_name.clone(),
            secondary_token: entry.secondary_token.clone(),
            recorded_at: entry.recorded_at,
            scope_id: entry.scope.session_id(),
        })
    }

    /// Filtered records, most recent first (ties by descending id).
    /// `limit = None` returns everything.
    pub async fn query<'e, E>(
        executor: E,
        filter: &AttendanceFilter,
        limit: Option<i64>,
    ) -> PersistenceResult<Vec<AttendanceRecord>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM attendance", ATTENDANCE_COLUMNS));
        let mut has_where = false;
        let mut clause = |builder: &mut QueryBuilder<Sqlite>| {
            builder.push(if has_where { " AND " } else { " WHERE " });
            has_where = true;
        };

        if let Some(session_id) = filter.session_id {
            clause(&mut builder);
            builder.push("session_id = ").push_bind(session_id);
        }
        if let Some(from) = filter.date_from {
            clause(&mut builder);
            builder
                .push("scope_date >= ")
                .push_bind(from.format("%Y-%m-%d").to_string());
        }
        if let Some(to) = filter.date_to {
            clause(&mut builder);
            builder
                .push("scope_date <= ")
                .push_bind(to.format("%Y-%m-%d").to_string());
        }

        builder.push(" ORDER BY recorded_at DESC, id DESC");
        if let Some(limit) = limit {
            builder.push(" LIMIT ").push_bind(limit);
        }

        builder
            .build_query_as::<AttendanceRow>()
            .fetch_all(executor)
            .await?
            .into_iter()
            .map(AttendanceRecord::try_from)
            .collect()
    }

    /// Distinct participant ids recorded under `scope`
    pub async fn distinct_participants<'e, E>(
        executor: E,
        scope: &Scope,
    ) -> PersistenceResult<Vec<String>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows: Vec<(String,)> = match scope {
            Scope::Session(session_id) => {
                sqlx::query_as(
                    "SELECT DISTINCT participant_id FROM attendance WHERE session_id = ? \
                     ORDER BY participant_id",
                )
                .bind(*session_id)
                .fetch_all(executor)
                .await?
            }
            Scope::Day(date) => {
                sqlx::query_as(
                    "SELECT DISTINCT participant_id FROM attendance \
                     WHERE scope_date = ? AND session_id IS NULL ORDER BY participant_id",
                )
                .bind(date.format("%Y-%m-%d").to_string())
                .fetch_all(executor)
                .await?
            }
        };
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Total number of attendance rows
    pub async fn count<'e, E>(executor: E) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM attendance")
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Database initialization
// ============================================================================

/// Open (creating if missing) the SQLite file at `path`
pub async fn create_pool(path: &Path) -> PersistenceResult<SqlitePool> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Apply the schema (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> PersistenceResult<()> {
    sqlx::query(SCHEMA).execute(pool).await?;
    Ok(())
}

/// Open the database and make sure the schema exists
pub async fn init_database(path: &Path) -> PersistenceResult<SqlitePool> {
    let pool = create_pool(path).await?;
    create_schema(&pool).await?;
    tracing::debug!(path = %path.display(), "attendance database ready");
    Ok(pool)
}
