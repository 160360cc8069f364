use std::thread;

use rusqlite::types::Value;

use super::test_stores;
use crate::{CredentialsDb, DbError, NewTimedLimit, PermaLimit, PermaLimitPatch, Store, WriteTask};

#[test]
fn test_open_creates_one_file_per_store() {
    let (stores, dir) = test_stores();
    for name in ["credentials", "access", "perma_limit", "timed_limit", "db_char"] {
        assert!(dir.path().join(format!("{name}.db")).exists(), "{name}.db missing");
    }
    assert_eq!(stores.access.store().name(), "access");
    assert_eq!(stores.db_char.store().path(), dir.path().join("db_char.db"));
}

#[test]
fn test_writes_apply_in_submission_order() {
    let (stores, _dir) = test_stores();
    let limits = &stores.perma_limit;

    limits.create(&PermaLimit {
        id: 1,
        ..Default::default()
    });
    for slot in 0..50 {
        limits.update(
            1,
            &PermaLimitPatch {
                char_slot: Some(slot),
                ..Default::default()
            },
        );
    }
    limits.store().flush().unwrap();
    assert_eq!(limits.get(1).unwrap().unwrap().char_slot, 49);

    // uids are handed out in insert order, so they must follow submission order.
    for expired in 0..10 {
        stores
            .timed_limit
            .create(&NewTimedLimit::active(7, 1, 1, 1000 + expired));
    }
    stores.timed_limit.store().flush().unwrap();
    let rows = stores.timed_limit.list_by_owner(7).unwrap();
    assert_eq!(rows.len(), 10);
    assert!(rows.windows(2).all(|w| w[0].uid < w[1].uid));
}

#[test]
fn test_failed_task_is_discarded_and_worker_continues() {
    let (stores, _dir) = test_stores();
    let creds = &stores.credentials;

    assert_eq!(creds.create("dup", None).wait().unwrap(), 1);
    let duplicate = creds.create("dup", Some("765"));
    let after = creds.create("after", None);

    assert!(matches!(duplicate.wait(), Err(DbError::Sqlite(_))));
    assert_eq!(after.wait().unwrap(), 1);

    let dup = creds.get_by_discord("dup").unwrap().unwrap();
    assert_eq!(dup.steam64_id, None);
    assert!(creds.get_by_discord("after").unwrap().is_some());
}

#[test]
fn test_invalid_statement_does_not_stop_worker() {
    let (stores, _dir) = test_stores();
    let store = stores.access.store();

    let bad = store.submit_write(WriteTask::new("INSERT INTO nowhere VALUES (?1)", vec![Value::Integer(1)]));
    assert!(bad.wait().is_err());

    let good = store.submit_write(WriteTask::new(
        "INSERT INTO access (id, version, access) VALUES (?1, 0, '{}')",
        vec![Value::Integer(3)],
    ));
    assert_eq!(good.wait().unwrap(), 1);
    assert!(stores.access.get(3).unwrap().is_some());
}

#[test]
fn test_dropped_receipts_still_apply() {
    let (stores, _dir) = test_stores();
    drop(stores.credentials.create("fire-and-forget", None));
    stores.flush_all().unwrap();
    assert!(stores.credentials.get_by_discord("fire-and-forget").unwrap().is_some());
}

#[test]
fn test_concurrent_worker_start_is_safe() {
    let (stores, _dir) = test_stores();
    let store = stores.perma_limit.store().clone();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || store.start_worker())
        })
        .collect();
    for h in handles {
        h.join().unwrap().unwrap();
    }

    stores.perma_limit.set_up().unwrap();
    stores.perma_limit.create(&PermaLimit {
        id: 2,
        char_slot: 4,
        ..Default::default()
    });
    store.flush().unwrap();
    assert_eq!(stores.perma_limit.get(2).unwrap().unwrap().char_slot, 4);
}

#[test]
fn test_reads_run_alongside_writer() {
    let (stores, _dir) = test_stores();
    let creds = stores.credentials.clone();

    let writer = {
        let creds = creds.clone();
        thread::spawn(move || {
            for i in 0..100 {
                creds.create(&format!("user-{i}"), None);
            }
            creds.store().flush()
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let creds = creds.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    creds.list_dirty()?;
                }
                Ok::<_, DbError>(())
            })
        })
        .collect();

    writer.join().unwrap().unwrap();
    for r in readers {
        r.join().unwrap().unwrap();
    }
    assert_eq!(creds.list_dirty().unwrap().len(), 100);
}

#[test]
fn test_flush_requires_started_worker() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::new(dir.path(), "idle");
    assert!(matches!(store.flush(), Err(DbError::Worker(_))));
}

#[test]
fn test_read_without_schema_fails() {
    let dir = tempfile::tempdir().unwrap();
    let creds = CredentialsDb::new(dir.path());
    assert!(creds.get_by_id(1).is_err());
}
