//! Permanent quota counters per credential id.

use std::path::Path;

use rusqlite::OptionalExtension;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::schema;
use crate::store::{Store, WriteReceipt};
use crate::task::{Assignments, Column, WriteTask};
use crate::DbError;

pub const NAME: &str = "perma_limit";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermaLimit {
    pub id: i64,
    pub char_slot: i64,
    pub lore_char_slot: i64,
    pub weight_bytes: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PermaLimitPatch {
    pub char_slot: Option<i64>,
    pub lore_char_slot: Option<i64>,
    pub weight_bytes: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
enum PermaLimitColumn {
    CharSlot,
    LoreCharSlot,
    WeightBytes,
}

impl Column for PermaLimitColumn {
    fn name(self) -> &'static str {
        match self {
            Self::CharSlot => "char_slot",
            Self::LoreCharSlot => "lore_char_slot",
            Self::WeightBytes => "weight_bytes",
        }
    }
}

#[derive(Clone)]
pub struct PermaLimitDb {
    store: Store,
}

impl PermaLimitDb {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            store: Store::new(dir, NAME),
        }
    }

    pub fn set_up(&self) -> Result<(), DbError> {
        self.store.set_up(schema::PERMA_LIMIT)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Insert counters for `limit.id`.
    pub fn create(&self, limit: &PermaLimit) -> WriteReceipt {
        self.store.submit_write(WriteTask::new(
            "INSERT INTO perma_limit (id, char_slot, lore_char_slot, weight_bytes) VALUES (?1, ?2, ?3, ?4)",
            vec![
                Value::Integer(limit.id),
                Value::Integer(limit.char_slot),
                Value::Integer(limit.lore_char_slot),
                Value::Integer(limit.weight_bytes),
            ],
        ))
    }

    pub fn update(&self, id: i64, patch: &PermaLimitPatch) -> Option<WriteReceipt> {
        let mut set = Assignments::new();
        set.set_opt(PermaLimitColumn::CharSlot, patch.char_slot, Value::Integer)
            .set_opt(PermaLimitColumn::LoreCharSlot, patch.lore_char_slot, Value::Integer)
            .set_opt(PermaLimitColumn::WeightBytes, patch.weight_bytes, Value::Integer);

        let task = set.into_update("perma_limit", "id", Value::Integer(id))?;
        Some(self.store.submit_write(task))
    }

    pub fn delete(&self, id: i64) -> WriteReceipt {
        self.store.submit_write(WriteTask::new(
            "DELETE FROM perma_limit WHERE id = ?1",
            vec![Value::Integer(id)],
        ))
    }

    pub fn get(&self, id: i64) -> Result<Option<PermaLimit>, DbError> {
        self.store.read(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, char_slot, lore_char_slot, weight_bytes FROM perma_limit WHERE id = ?1",
            )?;
            let limit = stmt
                .query_row([id], |row| {
                    Ok(PermaLimit {
                        id: row.get(0)?,
                        char_slot: row.get(1)?,
                        lore_char_slot: row.get(2)?,
                        weight_bytes: row.get(3)?,
                    })
                })
                .optional()?;
            Ok(limit)
        })
    }
}
