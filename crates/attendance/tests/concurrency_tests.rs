//! Properties that must hold under concurrent callers.

mod common;

use common::harness;
use rollcall_attendance::RosterStore;
use rollcall_core::{Participant, RosterQuery};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_identical_check_ins_log_once() {
    let h = harness().await;
    let ctx = Arc::new(h.ctx);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let ctx = Arc::clone(&ctx);
        handles.push(tokio::spawn(async move {
            ctx.validator().validate(&RosterQuery::by_id("S1")).await
        }));
    }

    let mut logged = 0;
    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        assert!(outcome.check_in().is_some());
        if outcome.is_logged() {
            logged += 1;
        }
    }
    assert_eq!(logged, 1);
    assert_eq!(ctx.attendance().count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_session_opens_leave_one_open() {
    let h = harness().await;
    let ctx = Arc::new(h.ctx);

    let mut handles = Vec::new();
    for i in 0..8 {
        let ctx = Arc::clone(&ctx);
        handles.push(tokio::spawn(async move {
            let label = format!("Section {}", i);
            ctx.sessions().open_session(Some(&label)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let sessions = ctx.sessions().list_sessions().await.unwrap();
    assert_eq!(sessions.len(), 8);
    assert_eq!(sessions.iter().filter(|s| s.is_open()).count(), 1);
    assert_eq!(
        ctx.sessions().active_session().await.unwrap().unwrap().id,
        sessions[0].id
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_check_ins_racing_session_switches_stay_unique_per_scope() {
    let h = harness().await;
    let ctx = Arc::new(h.ctx);

    let mut handles = Vec::new();
    for i in 0..12 {
        let ctx = Arc::clone(&ctx);
        handles.push(tokio::spawn(async move {
            if i % 4 == 0 {
                ctx.sessions().open_session(None).await.map(|_| ())
            } else {
                ctx.validator()
                    .validate(&RosterQuery::by_id("S3"))
                    .await
                    .map(|_| ())
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let records = ctx
        .attendance()
        .query_all(&Default::default())
        .await
        .unwrap();
    let mut scopes: Vec<_> = records.iter().map(|r| r.scope()).collect();
    let total = scopes.len();
    scopes.sort_by_key(|s| s.to_string());
    scopes.dedup();
    assert_eq!(scopes.len(), total);
}

fn generation(n: usize) -> Vec<Participant> {
    (0..=n % 4)
        .map(|i| Participant::new(&format!("g{}-{}", n, i), &format!("Student {}", i)))
        .collect()
}

#[test]
fn test_roster_reload_never_exposes_mixed_snapshot() {
    let store = Arc::new(RosterStore::from_participants(generation(0)).unwrap());
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    let snapshot = store.snapshot();
                    let prefix = snapshot.participants()[0]
                        .id
                        .split('-')
                        .next()
                        .unwrap()
                        .to_string();
                    assert!(snapshot
                        .participants()
                        .iter()
                        .all(|p| p.id.starts_with(&format!("{}-", prefix))));
                    let n: usize = prefix[1..].parse().unwrap();
                    assert_eq!(snapshot.len(), n % 4 + 1);
                }
            })
        })
        .collect();

    for n in 1..500 {
        store.reload(generation(n)).unwrap();
    }
    done.store(true, Ordering::Relaxed);
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(store.snapshot().version(), 500);
}
