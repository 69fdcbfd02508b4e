#![allow(dead_code)]

use rollcall_attendance::{RosterStore, ServiceContext};
use rollcall_core::{ManualClock, Participant};
use rollcall_persistence::init_database;
use std::sync::Arc;
use tempfile::TempDir;

pub struct Harness {
    pub ctx: ServiceContext,
    pub clock: Arc<ManualClock>,
    _dir: TempDir,
}

pub fn class_list() -> Vec<Participant> {
    vec![
        Participant::new("S1", "Ann Lee").with_token("AA:BB:CC:DD:EE:01"),
        Participant::new("S2", "Bob Tran"),
        Participant::new("S3", "Cara Vu").with_token("AA:BB:CC:DD:EE:03"),
    ]
}

pub async fn harness_at(start: &str, participants: Vec<Participant>) -> Harness {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("attendance.db")).await.unwrap();
    let roster = Arc::new(RosterStore::from_participants(participants).unwrap());
    let clock = Arc::new(ManualClock::at(start).unwrap());
    let ctx = ServiceContext::new(pool, roster).with_clock(clock.clone());
    Harness {
        ctx,
        clock,
        _dir: dir,
    }
}

pub async fn harness() -> Harness {
    harness_at("2024-03-04T09:00:00", class_list()).await
}
