//! Validation engine
//!
//! Resolve → scope → (check + append) as one critical section.

use crate::error::ServiceResult;
use crate::services::ServiceContext;
use rollcall_core::{
    CheckIn, NewAttendance, Participant, RosterQuery, Scope, ScopeDescriptor, ValidationOutcome,
};
use rollcall_persistence::{AttendanceRepo, SessionRepo};

pub struct ValidationEngine<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ValidationEngine<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Validate an identification attempt and record it if it is the first
    /// check-in for the participant under the current scope.
    ///
    /// Errors only on empty input or storage failure. Unknown participants
    /// and duplicates come back as outcomes.
    pub async fn validate(&self, query: &RosterQuery) -> ServiceResult<ValidationOutcome> {
        let Some(participant) = self.ctx.roster().lookup(query)? else {
            tracing::debug!(?query, "no roster match");
            return Ok(ValidationOutcome::Invalid);
        };

        let check_in = self
            .check_in(participant, query.secondary_token.as_deref())
            .await?;
        Ok(ValidationOutcome::Valid(check_in))
    }

    /// Operator-entered check-in: identifier or name only.
    pub async fn record_manual(
        &self,
        identifier: Option<&str>,
        display_name: Option<&str>,
    ) -> ServiceResult<ValidationOutcome> {
        self.validate(&RosterQuery::new(identifier, display_name, None))
            .await
    }

    async fn check_in(
        &self,
        participant: Participant,
        supplied_token: Option<&str>,
    ) -> ServiceResult<CheckIn> {
        let _guard = self.ctx.write_guard().await;
        let now = self.ctx.now();

        let mut tx = self.ctx.pool().begin().await?;
        let (scope, descriptor) = match SessionRepo::find_open(&mut *tx).await? {
            Some(session) => (
                Scope::Session(session.id),
                ScopeDescriptor::Session { session },
            ),
            None => (Scope::Day(now.date()), ScopeDescriptor::Day { date: now.date() }),
        };

        if AttendanceRepo::exists(&mut *tx, &participant.id, &scope).await? {
            tracing::debug!(participant = %participant.id, %scope, "already checked in");
            return Ok(CheckIn::duplicate(participant, descriptor));
        }

        let entry = NewAttendance::for_participant(&participant, supplied_token, scope, now);
        let record = AttendanceRepo::insert(&mut *tx, &entry).await?;
        tx.commit().await?;

        tracing::info!(
            participant = %participant.id,
            record = record.id,
            %scope,
            "check-in recorded"
        );
        Ok(CheckIn::logged(participant, descriptor, now))
    }
}
