//! # Session Module
//!
//! An operator-controlled check-in window. `OPEN -> CLOSED`, no reopening.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Label prefix used when a session is opened without one
pub const DEFAULT_LABEL_PREFIX: &str = "Lecture";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Monotonic identifier assigned by the store
    pub id: i64,
    pub label: String,
    pub opened_at: NaiveDateTime,
    /// `None` while the session is open
    pub closed_at: Option<NaiveDateTime>,
}

impl Session {
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }

    /// Label to use for a new session: the trimmed input, or
    /// `"<prefix> YYYY-MM-DD"` when blank.
    pub fn resolve_label(label: Option<&str>, prefix: &str, today: NaiveDate) -> String {
        match label.map(str::trim).filter(|l| !l.is_empty()) {
            Some(label) => label.to_string(),
            None => format!("{} {}", prefix, today.format("%Y-%m-%d")),
        }
    }
}
