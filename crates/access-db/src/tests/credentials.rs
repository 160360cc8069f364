use super::test_stores;
use crate::{CredentialLookup, CredentialPatch, DbError};

#[test]
fn test_create_then_get_by_discord() {
    let (stores, _dir) = test_stores();
    let creds = &stores.credentials;

    creds.create("u1", None);
    creds.store().flush().unwrap();

    let got = creds.get_by_discord("u1").unwrap().unwrap();
    assert_eq!(got.discord_id, "u1");
    assert_eq!(got.steam64_id, None);
    assert!(got.dirty);

    assert_eq!(creds.get_by_id(got.id).unwrap().unwrap(), got);
}

#[test]
fn test_missing_credential_is_none() {
    let (stores, _dir) = test_stores();
    assert!(stores.credentials.get_by_id(404).unwrap().is_none());
    assert!(stores.credentials.get_by_discord("nobody").unwrap().is_none());
    assert!(stores.credentials.get_by_steam("0").unwrap().is_none());
}

#[test]
fn test_lookup_requires_exactly_one_key() {
    let (stores, _dir) = test_stores();
    let creds = &stores.credentials;
    creds.create("u1", Some("76561198000000001")).wait().unwrap();

    let none = creds.get_by_key(&CredentialLookup::default());
    assert!(matches!(none, Err(DbError::Usage(_))));

    let two = creds.get_by_key(&CredentialLookup {
        id: Some(1),
        discord_id: Some("u1".into()),
        steam64_id: None,
    });
    assert!(matches!(two, Err(DbError::Usage(_))));

    let three = creds.get_by_key(&CredentialLookup {
        id: Some(1),
        discord_id: Some("u1".into()),
        steam64_id: Some("76561198000000001".into()),
    });
    assert!(matches!(three, Err(DbError::Usage(_))));

    let one = creds
        .get_by_key(&CredentialLookup::by_steam("76561198000000001"))
        .unwrap()
        .unwrap();
    assert_eq!(one.discord_id, "u1");
}

#[test]
fn test_partial_update_and_dirty_flag() {
    let (stores, _dir) = test_stores();
    let creds = &stores.credentials;

    creds.create("u1", None).wait().unwrap();
    let id = creds.get_by_discord("u1").unwrap().unwrap().id;

    creds.clear_dirty(id).wait().unwrap();
    assert!(!creds.get_by_id(id).unwrap().unwrap().dirty);
    assert!(creds.list_dirty().unwrap().is_empty());

    let receipt = creds.update(
        id,
        &CredentialPatch {
            steam64_id: Some("765".into()),
            ..Default::default()
        },
    );
    receipt.unwrap().wait().unwrap();

    let got = creds.get_by_id(id).unwrap().unwrap();
    assert_eq!(got.discord_id, "u1");
    assert_eq!(got.steam64_id.as_deref(), Some("765"));
    assert!(got.dirty);
    assert_eq!(creds.list_dirty().unwrap(), vec![got]);
}

#[test]
fn test_empty_update_is_noop() {
    let (stores, _dir) = test_stores();
    let creds = &stores.credentials;

    creds.create("u1", Some("765")).wait().unwrap();
    let before = creds.get_by_discord("u1").unwrap().unwrap();
    creds.clear_dirty(before.id).wait().unwrap();

    assert!(creds.update(before.id, &CredentialPatch::default()).is_none());
    creds.store().flush().unwrap();

    let after = creds.get_by_id(before.id).unwrap().unwrap();
    assert_eq!(after.steam64_id.as_deref(), Some("765"));
    assert!(!after.dirty);
}

#[test]
fn test_delete_and_set_dirty() {
    let (stores, _dir) = test_stores();
    let creds = &stores.credentials;

    creds.create("a", None);
    creds.create("b", None);
    creds.store().flush().unwrap();
    let a = creds.get_by_discord("a").unwrap().unwrap();
    let b = creds.get_by_discord("b").unwrap().unwrap();

    creds.clear_dirty(b.id);
    creds.set_dirty(b.id);
    creds.delete(a.id);
    creds.store().flush().unwrap();

    assert!(creds.get_by_id(a.id).unwrap().is_none());
    assert!(creds.get_by_id(b.id).unwrap().unwrap().dirty);
}
