//! Session ledger
//!
//! Ordered, non-overlapping check-in windows with at most one open at a
//! time. Transitions run under the context write lock and inside one SQL
//! transaction, so readers never see zero or two open sessions mid-switch.

use crate::error::ServiceResult;
use crate::services::ServiceContext;
use rollcall_core::Session;
use rollcall_persistence::SessionRepo;

pub struct SessionLedger<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SessionLedger<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The open session, if any
    pub async fn active_session(&self) -> ServiceResult<Option<Session>> {
        Ok(SessionRepo::find_open(self.ctx.pool()).await?)
    }

    /// Open a new session, closing the current one at the same instant.
    pub async fn open_session(&self, label: Option<&str>) -> ServiceResult<Session> {
        let _guard = self.ctx.write_guard().await;
        let now = self.ctx.now();
        let label = Session::resolve_label(
            label,
            &self.ctx.settings().session_label_prefix,
            now.date(),
        );

        let mut tx = self.ctx.pool().begin().await?;
        let previous = SessionRepo::find_open(&mut *tx).await?;
        SessionRepo::close_open(&mut *tx, &now).await?;
        let id = SessionRepo::insert(&mut *tx, &label, &now).await?;
        tx.commit().await?;

        if let Some(previous) = previous {
            tracing::info!(session = previous.id, "session closed by newer session");
        }
        tracing::info!(session = id, label = %label, "session opened");

        Ok(Session {
            id,
            label,
            opened_at: now,
            closed_at: None,
        })
    }

    /// Close the open session. `None` when nothing was open.
    pub async fn close_session(&self) -> ServiceResult<Option<Session>> {
        let _guard = self.ctx.write_guard().await;
        let now = self.ctx.now();

        let mut tx = self.ctx.pool().begin().await?;
        let Some(mut session) = SessionRepo::find_open(&mut *tx).await? else {
            return Ok(None);
        };
        SessionRepo::close_open(&mut *tx, &now).await?;
        tx.commit().await?;

        session.closed_at = Some(now);
        tracing::info!(session = session.id, "session closed");
        Ok(Some(session))
    }

    /// All sessions, most recent first
    pub async fn list_sessions(&self) -> ServiceResult<Vec<Session>> {
        Ok(SessionRepo::list(self.ctx.pool()).await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Session> {
        Ok(SessionRepo::get_by_id(self.ctx.pool(), id).await?)
    }
}
