//! # Rollcall Attendance
//!
//! The check-in engine: resolves an identification attempt against the
//! roster, picks the active scope, and records at most one check-in per
//! participant per scope.
//!
//! ```text
//! request ──► ValidationEngine ──► RosterStore      (lock-free snapshot)
//!                     │
//!                     └── write lock + tx ──► SessionRepo::find_open
//!                                         ──► AttendanceRepo::exists / insert
//! ```

pub mod error;
pub mod ledger;
pub mod roster;
pub mod roster_admin;
pub mod roster_file;
pub mod services;
pub mod sessions;
pub mod summary;
pub mod validation;

pub use error::{ServiceError, ServiceResult};
pub use ledger::{resolve_limit, AttendanceLedger, DEFAULT_QUERY_LIMIT};
pub use roster::{RosterSnapshot, RosterStore};
pub use roster_admin::RosterAdmin;
pub use roster_file::{load_roster_file, parse_roster, write_roster_file, RosterFileError};
pub use services::{LedgerSettings, ServiceContext};
pub use sessions::SessionLedger;
pub use summary::AttendanceSummary;
pub use validation::ValidationEngine;

pub use rollcall_persistence::AttendanceFilter;
