//! Attendance ledger
//!
//! Append-only check-in records. Duplicate detection is the caller's job;
//! [`crate::ValidationEngine`] does it atomically with the insert.

use crate::error::ServiceResult;
use crate::services::ServiceContext;
use rollcall_core::{AttendanceRecord, NewAttendance, Scope};
use rollcall_persistence::{AttendanceFilter, AttendanceRepo};

/// Page size when none (or garbage) is supplied
pub const DEFAULT_QUERY_LIMIT: u32 = 200;

/// Parse a caller-supplied limit. Anything that is not a positive integer
/// falls back to `default`.
pub fn resolve_limit(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

pub struct AttendanceLedger<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AttendanceLedger<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub(crate) fn ctx(&self) -> &'a ServiceContext {
        self.ctx
    }

    pub async fn has_record(&self, participant_id: &str, scope: &Scope) -> ServiceResult<bool> {
        Ok(AttendanceRepo::exists(self.ctx.pool(), participant_id, scope).await?)
    }

    /// Unconditional insert
    pub async fn append(&self, entry: &NewAttendance) -> ServiceResult<AttendanceRecord> {
        let _guard = self.ctx.write_guard().await;
        Ok(AttendanceRepo::insert(self.ctx.pool(), entry).await?)
    }

    /// Most recent first, at most `limit` rows (0 means the configured default)
    pub async fn query(
        &self,
        filter: &AttendanceFilter,
        limit: u32,
    ) -> ServiceResult<Vec<AttendanceRecord>> {
        let limit = if limit == 0 {
            self.ctx.settings().default_limit
        } else {
            limit
        };
        Ok(AttendanceRepo::query(self.ctx.pool(), filter, Some(i64::from(limit))).await?)
    }

    /// Every matching record, for exports
    pub async fn query_all(&self, filter: &AttendanceFilter) -> ServiceResult<Vec<AttendanceRecord>> {
        Ok(AttendanceRepo::query(self.ctx.pool(), filter, None).await?)
    }

    pub async fn participants_in_scope(&self, scope: &Scope) -> ServiceResult<Vec<String>> {
        Ok(AttendanceRepo::distinct_participants(self.ctx.pool(), scope).await?)
    }

    pub async fn count_distinct_participants(&self, scope: &Scope) -> ServiceResult<usize> {
        Ok(self.participants_in_scope(scope).await?.len())
    }

    /// Total rows in the ledger
    pub async fn count(&self) -> ServiceResult<i64> {
        Ok(AttendanceRepo::count(self.ctx.pool()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_limit() {
        assert_eq!(resolve_limit(None, 200), 200);
        assert_eq!(resolve_limit(Some("50"), 200), 50);
        assert_eq!(resolve_limit(Some(" 7 "), 200), 7);
        assert_eq!(resolve_limit(Some("abc"), 200), 200);
        assert_eq!(resolve_limit(Some("0"), 200), 200);
        assert_eq!(resolve_limit(Some("-3"), 200), 200);
    }
}
