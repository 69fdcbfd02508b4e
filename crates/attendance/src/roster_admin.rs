//! Roster administration
//!
//! Changes to the in-memory roster, mirrored to the roster file when the
//! context has one so they survive a restart. The file is written before
//! the new snapshot is published; a failed write leaves the roster as it was.

use crate::error::ServiceResult;
use crate::roster::RosterSnapshot;
use crate::roster_file::{load_roster_file, parse_roster, write_roster_file, RosterFileError};
use crate::services::ServiceContext;
use rollcall_core::Participant;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Run roster file IO on the blocking pool
async fn blocking<T, F>(task: F) -> Result<T, RosterFileError>
where
    F: FnOnce() -> Result<T, RosterFileError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| RosterFileError::Io(io::Error::other(e)))?
}

pub struct RosterAdmin<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RosterAdmin<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub fn list(&self) -> Arc<RosterSnapshot> {
        self.ctx.roster().snapshot()
    }

    /// Add one participant and rewrite the roster file.
    pub async fn add(&self, participant: Participant) -> ServiceResult<Participant> {
        let _guard = self.ctx.roster_guard().await;
        let participants = self.ctx.roster().snapshot().with_added(participant.clone())?;
        self.persist(participants.clone()).await?;
        let version = self.ctx.roster().reload(participants)?;
        tracing::info!(participant = %participant.id, version, "participant added");
        Ok(participant)
    }

    /// Replace the roster with uploaded CSV text; returns the new size.
    pub async fn upload(&self, csv_text: &str) -> ServiceResult<usize> {
        let participants = parse_roster(csv_text.as_bytes())?;
        self.replace(participants).await
    }

    /// Replace the roster with the contents of another CSV file.
    pub async fn import(&self, path: &Path) -> ServiceResult<usize> {
        let path = path.to_path_buf();
        let participants = blocking(move || parse_roster(File::open(path)?)).await?;
        self.replace(participants).await
    }

    /// Re-read the configured roster file.
    pub fn reload_from_file(&self) -> ServiceResult<usize> {
        let participants = match self.ctx.roster_file() {
            Some(path) => load_roster_file(path)?,
            None => Vec::new(),
        };
        let count = participants.len();
        self.ctx.roster().reload(participants)?;
        Ok(count)
    }

    async fn replace(&self, participants: Vec<Participant>) -> ServiceResult<usize> {
        for participant in &participants {
            participant.validate()?;
        }

        let _guard = self.ctx.roster_guard().await;
        self.persist(participants.clone()).await?;
        let count = participants.len();
        self.ctx.roster().reload(participants)?;
        Ok(count)
    }

    async fn persist(&self, participants: Vec<Participant>) -> ServiceResult<()> {
        if let Some(path) = self.ctx.roster_file().map(PathBuf::from) {
            blocking(move || write_roster_file(&path, &participants)).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::RosterStore;
    use crate::ServiceError;
    use rollcall_core::{CoreError, RosterQuery};
    use rollcall_persistence::init_database;
    use tempfile::TempDir;

    async fn context_with_file(dir: &TempDir, roster_file: PathBuf) -> ServiceContext {
        let pool = init_database(&dir.path().join("a.db")).await.unwrap();
        let roster = Arc::new(RosterStore::from_participants(vec![Participant::new("S1", "Ann Lee")]).unwrap());
        ServiceContext::new(pool, roster).with_roster_file(roster_file)
    }

    async fn context(dir: &TempDir) -> ServiceContext {
        context_with_file(dir, dir.path().join("roster.csv")).await
    }

    #[tokio::test]
    async fn test_add_persists_roster() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir).await;
        let admin = ctx.roster_admin();

        admin.add(Participant::new("S2", "Bob Tran").with_token("aa:01")).await.unwrap();
        assert_eq!(admin.list().len(), 2);

        let on_disk = load_roster_file(&dir.path().join("roster.csv")).unwrap();
        assert_eq!(on_disk.len(), 2);
        assert_eq!(on_disk[1].secondary_token.as_deref(), Some("aa:01"));

        let err = admin.add(Participant::new("S2", "Other")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Roster(CoreError::DuplicateParticipant(_))));
    }

    #[tokio::test]
    async fn test_upload_replaces_and_reload_reads_back() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir).await;
        let admin = ctx.roster_admin();

        let count = admin
            .upload("Name,Student ID\nCara Vu,S3\nDan Ho,S4\n")
            .await
            .unwrap();
        assert_eq!(count, 2);
        assert!(ctx.roster().lookup(&RosterQuery::by_id("S1")).unwrap().is_none());

        ctx.roster().reload(Vec::new()).unwrap();
        assert_eq!(admin.reload_from_file().unwrap(), 2);
        assert!(ctx.roster().lookup(&RosterQuery::by_name("dan ho")).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_import_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir).await;
        let err = ctx
            .roster_admin()
            .import(&dir.path().join("nope.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::RosterFile(_)));
        assert_eq!(ctx.roster().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_file_write_keeps_roster() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be opened as the roster file
        let ctx = context_with_file(&dir, dir.path().to_path_buf()).await;
        let admin = ctx.roster_admin();

        let err = admin.add(Participant::new("S9", "Zed Ng")).await.unwrap_err();
        assert!(matches!(err, ServiceError::RosterFile(_)));
        assert_eq!(ctx.roster().len(), 1);
        assert!(ctx.roster().lookup(&RosterQuery::by_id("S9")).unwrap().is_none());

        let err = admin.upload("Name,Student ID\nCara Vu,S3\n").await.unwrap_err();
        assert!(matches!(err, ServiceError::RosterFile(_)));
        assert!(ctx.roster().lookup(&RosterQuery::by_id("S1")).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_import_reads_other_file() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("incoming.csv");
        std::fs::write(&source, "Name,Student ID,MAC\nCara Vu,S3,cc:01\n").unwrap();
        let ctx = context(&dir).await;

        assert_eq!(ctx.roster_admin().import(&source).await.unwrap(), 1);
        let found = ctx.roster().lookup(&RosterQuery::by_token("CC:01")).unwrap().unwrap();
        assert_eq!(found.id, "S3");
        assert_eq!(load_roster_file(&dir.path().join("roster.csv")).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_roster_edit_does_not_hold_ledger_lock() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir).await;

        let _ledger = ctx.write_guard().await;
        ctx.roster_admin().add(Participant::new("S2", "Bob Tran")).await.unwrap();
        assert_eq!(ctx.roster().len(), 2);
    }
}
