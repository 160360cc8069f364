//! Player-character records, many per credential id.

use std::path::Path;

use rusqlite::OptionalExtension;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::blob;
use crate::schema;
use crate::store::{Store, WriteReceipt};
use crate::task::{Assignments, Column, WriteTask};
use crate::DbError;

pub const NAME: &str = "db_char";

const COLUMNS: &str = "uid, id, name, discord_url, char_type, content_ids, game_db_id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbChar {
    pub uid: i64,
    /// Owning credential id.
    pub id: i64,
    pub name: String,
    pub discord_url: Option<String>,
    pub char_type: String,
    /// Steam content ids, in stored order.
    pub content_ids: Vec<String>,
    /// Reserved for linking to the game database; unset for now.
    pub game_db_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDbChar {
    pub id: i64,
    pub name: String,
    pub char_type: String,
    #[serde(default)]
    pub content_ids: Vec<String>,
    #[serde(default)]
    pub discord_url: Option<String>,
    #[serde(default)]
    pub game_db_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DbCharPatch {
    pub name: Option<String>,
    pub discord_url: Option<String>,
    pub char_type: Option<String>,
    pub content_ids: Option<Vec<String>>,
    pub game_db_id: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
enum DbCharColumn {
    Name,
    DiscordUrl,
    CharType,
    ContentIds,
    GameDbId,
}

impl Column for DbCharColumn {
    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::DiscordUrl => "discord_url",
            Self::CharType => "char_type",
            Self::ContentIds => "content_ids",
            Self::GameDbId => "game_db_id",
        }
    }
}

#[derive(Clone)]
pub struct DbCharDb {
    store: Store,
}

impl DbCharDb {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            store: Store::new(dir, NAME),
        }
    }

    pub fn set_up(&self) -> Result<(), DbError> {
        self.store.set_up(schema::DB_CHAR)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn create(&self, ch: &NewDbChar) -> WriteReceipt {
        self.store.submit_write(WriteTask::new(
            "INSERT INTO db_char (id, name, discord_url, char_type, content_ids, game_db_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            vec![
                Value::Integer(ch.id),
                Value::Text(ch.name.clone()),
                ch.discord_url.clone().map_or(Value::Null, Value::Text),
                Value::Text(ch.char_type.clone()),
                blob::encode("content_ids", &ch.content_ids),
                ch.game_db_id.map_or(Value::Null, Value::Integer),
            ],
        ))
    }

    pub fn update(&self, uid: i64, patch: &DbCharPatch) -> Option<WriteReceipt> {
        let mut set = Assignments::new();
        set.set_opt(DbCharColumn::Name, patch.name.clone(), Value::Text)
            .set_opt(DbCharColumn::DiscordUrl, patch.discord_url.clone(), Value::Text)
            .set_opt(DbCharColumn::CharType, patch.char_type.clone(), Value::Text)
            .set_opt(DbCharColumn::ContentIds, patch.content_ids.as_ref(), |ids| {
                blob::encode("content_ids", ids)
            })
            .set_opt(DbCharColumn::GameDbId, patch.game_db_id, Value::Integer);

        let task = set.into_update("db_char", "uid", Value::Integer(uid))?;
        Some(self.store.submit_write(task))
    }

    pub fn delete(&self, uid: i64) -> WriteReceipt {
        self.store.submit_write(WriteTask::new(
            "DELETE FROM db_char WHERE uid = ?1",
            vec![Value::Integer(uid)],
        ))
    }

    pub fn get(&self, uid: i64) -> Result<Option<DbChar>, DbError> {
        self.store.read(|conn| {
            let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM db_char WHERE uid = ?1"))?;
            let ch = stmt.query_row([uid], db_char_from_row).optional()?;
            Ok(ch)
        })
    }

    /// Characters of an owner in creation order.
    pub fn list_by_owner(&self, id: i64) -> Result<Vec<DbChar>, DbError> {
        self.store.read(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {COLUMNS} FROM db_char WHERE id = ?1 ORDER BY uid"))?;
            let rows = stmt.query_map([id], db_char_from_row)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }
}

fn db_char_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DbChar> {
    Ok(DbChar {
        uid: row.get(0)?,
        id: row.get(1)?,
        name: row.get(2)?,
        discord_url: row.get(3)?,
        char_type: row.get(4)?,
        content_ids: blob::decode_or_default("content_ids", row.get(5)?),
        game_db_id: row.get(6)?,
    })
}
