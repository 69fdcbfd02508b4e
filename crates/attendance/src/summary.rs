//! Present/absent summary for one scope.
//!
//! Absent counts only participants still on the roster, so a record left
//! by someone later removed from the roster cannot push it below zero.
//! Such records are reported in `unrostered_present`.

use crate::error::ServiceResult;
use crate::ledger::AttendanceLedger;
use chrono::NaiveDate;
use rollcall_core::Scope;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceSummary {
    pub total_participants: usize,
    /// Distinct participants with a record in scope
    pub present: usize,
    pub present_on_roster: usize,
    pub absent: usize,
    pub unrostered_present: usize,
    pub scope: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl AttendanceLedger<'_> {
    pub async fn summarize(&self, scope: &Scope) -> ServiceResult<AttendanceSummary> {
        let roster = self.ctx().roster().snapshot();
        let present_ids = self.participants_in_scope(scope).await?;

        let present = present_ids.len();
        let present_on_roster = present_ids
            .iter()
            .filter(|id| roster.contains_id(id))
            .count();
        let unrostered_present = present - present_on_roster;
        if unrostered_present > 0 {
            tracing::warn!(%scope, unrostered_present, "attendance includes participants not on the roster");
        }

        Ok(AttendanceSummary {
            total_participants: roster.len(),
            present,
            present_on_roster,
            absent: roster.len().saturating_sub(present_on_roster),
            unrostered_present,
            scope: scope.kind(),
            session_id: scope.session_id(),
            date: match scope {
                Scope::Day(date) => Some(*date),
                Scope::Session(_) => None,
            },
        })
    }
}
