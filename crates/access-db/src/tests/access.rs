use rusqlite::types::Value;

use super::test_stores;
use crate::{AccessMap, AccessPatch, WriteTask};

fn map(entries: &[(&str, bool)]) -> AccessMap {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn test_access_round_trip() {
    let (stores, _dir) = test_stores();
    let access = &stores.access;

    let grants = map(&[("create_user", true), ("all_access", false)]);
    access.create(7, 0, &grants).wait().unwrap();

    let got = access.get(7).unwrap().unwrap();
    assert_eq!(got.id, 7);
    assert_eq!(got.version, 0);
    assert_eq!(got.access, grants);
    assert!(access.get(8).unwrap().is_none());
}

#[test]
fn test_access_update_replaces_map() {
    let (stores, _dir) = test_stores();
    let access = &stores.access;

    access.create(7, 0, &map(&[("create_user", true)]));
    access.update(
        7,
        &AccessPatch {
            access: Some(map(&[("update_user", true)])),
            ..Default::default()
        },
    );
    access.update(
        7,
        &AccessPatch {
            access: Some(map(&[("create_user", false), ("delete_user", true)])),
            ..Default::default()
        },
    );
    access.store().flush().unwrap();

    let got = access.get(7).unwrap().unwrap();
    assert_eq!(got.access, map(&[("create_user", false), ("delete_user", true)]));
    assert_eq!(got.version, 0);
}

#[test]
fn test_access_version_update_keeps_map() {
    let (stores, _dir) = test_stores();
    let access = &stores.access;

    let grants = map(&[("update_note", true)]);
    access.create(1, 0, &grants);
    access.create(2, 0, &AccessMap::new());
    access.update(
        1,
        &AccessPatch {
            version: Some(3),
            ..Default::default()
        },
    );
    assert!(access.update(2, &AccessPatch::default()).is_none());
    access.store().flush().unwrap();

    let got = access.get(1).unwrap().unwrap();
    assert_eq!(got.version, 3);
    assert_eq!(got.access, grants);

    let v0 = access.list_by_version(0).unwrap();
    assert_eq!(v0.len(), 1);
    assert_eq!(v0[0].id, 2);
    assert_eq!(access.list_by_version(3).unwrap()[0].id, 1);
    assert!(access.list_by_version(9).unwrap().is_empty());
}

#[test]
fn test_corrupt_access_blob_reads_as_empty() {
    let (stores, _dir) = test_stores();
    let access = &stores.access;

    access
        .store()
        .submit_write(WriteTask::new(
            "INSERT INTO access (id, version, access) VALUES (?1, 0, ?2)",
            vec![Value::Integer(5), Value::Text("{not json".into())],
        ))
        .wait()
        .unwrap();
    access
        .store()
        .submit_write(WriteTask::new(
            "INSERT INTO access (id, version, access) VALUES (?1, 0, ?2)",
            vec![Value::Integer(6), Value::Blob(vec![0xff, 0x00, 0x13])],
        ))
        .wait()
        .unwrap();

    assert!(access.get(5).unwrap().unwrap().access.is_empty());
    assert!(access.get(6).unwrap().unwrap().access.is_empty());
    assert_eq!(access.list_by_version(0).unwrap().len(), 2);
}

#[test]
fn test_access_delete() {
    let (stores, _dir) = test_stores();
    let access = &stores.access;
    access.create(1, 0, &AccessMap::new());
    access.delete(1);
    access.store().flush().unwrap();
    assert!(access.get(1).unwrap().is_none());
}
