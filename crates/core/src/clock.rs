//! # Clock Module
//!
//! Local wall-clock access at second precision, plus the ISO-8601 text form
//! used for storage and JSON.

use crate::error::{CoreError, CoreResult};
use chrono::{Duration, Local, NaiveDateTime, Timelike};
use std::sync::Mutex;

/// Storage and wire format: `YYYY-MM-DDTHH:MM:SS`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Source of "now" for the ledgers.
pub trait Clock: Send + Sync {
    /// Current local time, truncated to whole seconds
    fn now(&self) -> NaiveDateTime;
}

/// Process clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        truncate(Local::now().naive_local())
    }
}

/// Settable clock for deterministic scenarios.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            current: Mutex::new(truncate(start)),
        }
    }

    /// Parse `YYYY-MM-DDTHH:MM:SS` as the start time.
    pub fn at(timestamp: &str) -> CoreResult<Self> {
        Ok(Self::new(parse_timestamp(timestamp)?))
    }

    pub fn set(&self, to: NaiveDateTime) {
        *self.lock() = truncate(to);
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.lock();
        *guard = truncate(*guard + by);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NaiveDateTime> {
        // A poisoned clock still holds a valid instant.
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.lock()
    }
}

fn truncate(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_nanosecond(0).unwrap_or(ts)
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse the storage format. A space separator is accepted as well.
pub fn parse_timestamp(s: &str) -> CoreResult<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .map_err(|_| CoreError::InvalidTimestamp(s.to_string()))
}
