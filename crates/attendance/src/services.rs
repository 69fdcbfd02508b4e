//! Service context
//!
//! Shared state for the ledgers: pool, roster and clock. The ledger write
//! lock makes session transitions and check-ins indivisible; roster edits
//! take their own lock so file writes never stall check-ins.

use crate::ledger::{AttendanceLedger, DEFAULT_QUERY_LIMIT};
use crate::roster::RosterStore;
use crate::roster_admin::RosterAdmin;
use crate::sessions::SessionLedger;
use crate::validation::ValidationEngine;
use chrono::NaiveDateTime;
use rollcall_core::session::DEFAULT_LABEL_PREFIX;
use rollcall_core::{Clock, SystemClock};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Tunables for the ledgers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSettings {
    /// Page size used when a query gives no usable limit
    pub default_limit: u32,
    /// Prefix for generated session labels
    pub session_label_prefix: String,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_QUERY_LIMIT,
            session_label_prefix: DEFAULT_LABEL_PREFIX.to_string(),
        }
    }
}

/// Context for attendance operations
pub struct ServiceContext {
    pool: SqlitePool,
    roster: Arc<RosterStore>,
    clock: Arc<dyn Clock>,
    settings: LedgerSettings,
    roster_file: Option<PathBuf>,
    /// Serializes every ledger mutation in this process
    write_lock: Mutex<()>,
    /// Serializes roster edits and their file writes
    roster_lock: Mutex<()>,
}

impl ServiceContext {
    pub fn new(pool: SqlitePool, roster: Arc<RosterStore>) -> Self {
        Self {
            pool,
            roster,
            clock: Arc::new(SystemClock),
            settings: LedgerSettings::default(),
            roster_file: None,
            write_lock: Mutex::new(()),
            roster_lock: Mutex::new(()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_settings(mut self, settings: LedgerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Mirror roster changes to this CSV file
    pub fn with_roster_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.roster_file = Some(path.into());
        self
    }

    /// Get database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn roster(&self) -> &RosterStore {
        &self.roster
    }

    pub fn roster_handle(&self) -> Arc<RosterStore> {
        Arc::clone(&self.roster)
    }

    pub fn roster_file(&self) -> Option<&Path> {
        self.roster_file.as_deref()
    }

    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Held for the whole of a ledger mutation
    pub(crate) async fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    pub(crate) async fn roster_guard(&self) -> MutexGuard<'_, ()> {
        self.roster_lock.lock().await
    }

    pub fn sessions(&self) -> SessionLedger<'_> {
        SessionLedger::new(self)
    }

    pub fn attendance(&self) -> AttendanceLedger<'_> {
        AttendanceLedger::new(self)
    }

    pub fn roster_admin(&self) -> RosterAdmin<'_> {
        RosterAdmin::new(self)
    }

    pub fn validator(&self) -> ValidationEngine<'_> {
        ValidationEngine::new(self)
    }
}
