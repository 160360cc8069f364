//! Access grants: a permission map per credential id.

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::OptionalExtension;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::blob;
use crate::schema;
use crate::store::{Store, WriteReceipt};
use crate::task::{Assignments, Column, WriteTask};
use crate::DbError;

pub const NAME: &str = "access";

/// Permission key to granted flag.
pub type AccessMap = BTreeMap<String, bool>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub id: i64,
    /// Stored as given; no optimistic-concurrency check is made against it.
    pub version: i64,
    pub access: AccessMap,
}

/// Fields to change. A supplied `access` map replaces the stored one whole.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessPatch {
    pub version: Option<i64>,
    pub access: Option<AccessMap>,
}

#[derive(Debug, Clone, Copy)]
enum AccessColumn {
    Version,
    Access,
}

impl Column for AccessColumn {
    fn name(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Access => "access",
        }
    }
}

#[derive(Clone)]
pub struct AccessDb {
    store: Store,
}

impl AccessDb {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            store: Store::new(dir, NAME),
        }
    }

    pub fn set_up(&self) -> Result<(), DbError> {
        self.store.set_up(schema::ACCESS)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn create(&self, id: i64, version: i64, access: &AccessMap) -> WriteReceipt {
        self.store.submit_write(WriteTask::new(
            "INSERT INTO access (id, version, access) VALUES (?1, ?2, ?3)",
            vec![
                Value::Integer(id),
                Value::Integer(version),
                blob::encode("access", access),
            ],
        ))
    }

    pub fn update(&self, id: i64, patch: &AccessPatch) -> Option<WriteReceipt> {
        let mut set = Assignments::new();
        set.set_opt(AccessColumn::Version, patch.version, Value::Integer)
            .set_opt(AccessColumn::Access, patch.access.as_ref(), |map| {
                blob::encode("access", map)
            });

        let task = set.into_update("access", "id", Value::Integer(id))?;
        Some(self.store.submit_write(task))
    }

    pub fn delete(&self, id: i64) -> WriteReceipt {
        self.store.submit_write(WriteTask::new(
            "DELETE FROM access WHERE id = ?1",
            vec![Value::Integer(id)],
        ))
    }

    pub fn get(&self, id: i64) -> Result<Option<AccessRecord>, DbError> {
        self.store.read(|conn| {
            let mut stmt = conn.prepare("SELECT id, version, access FROM access WHERE id = ?1")?;
            let record = stmt.query_row([id], access_from_row).optional()?;
            Ok(record)
        })
    }

    /// All records stored with the given `version`, ascending by id.
    pub fn list_by_version(&self, version: i64) -> Result<Vec<AccessRecord>, DbError> {
        self.store.read(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, version, access FROM access WHERE version = ?1 ORDER BY id",
            )?;
            let rows = stmt.query_map([version], access_from_row)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }
}

fn access_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AccessRecord> {
    Ok(AccessRecord {
        id: row.get(0)?,
        version: row.get(1)?,
        access: blob::decode_or_default("access", row.get(2)?),
    })
}
