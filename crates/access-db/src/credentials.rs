//! User credentials: discord / steam identity per internal id.

use std::path::Path;

use rusqlite::OptionalExtension;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::schema;
use crate::store::{Store, WriteReceipt};
use crate::task::{Assignments, Column, WriteTask};
use crate::DbError;

pub const NAME: &str = "credentials";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub id: i64,
    pub discord_id: String,
    pub steam64_id: Option<String>,
    /// Needs external sync; set on create and update, cleared explicitly.
    pub dirty: bool,
}

/// Fields to change; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialPatch {
    pub discord_id: Option<String>,
    pub steam64_id: Option<String>,
}

/// Lookup by exactly one of the three keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialLookup {
    pub id: Option<i64>,
    pub discord_id: Option<String>,
    pub steam64_id: Option<String>,
}

impl CredentialLookup {
    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_discord(discord_id: &str) -> Self {
        Self {
            discord_id: Some(discord_id.to_owned()),
            ..Self::default()
        }
    }

    pub fn by_steam(steam64_id: &str) -> Self {
        Self {
            steam64_id: Some(steam64_id.to_owned()),
            ..Self::default()
        }
    }

    fn single_key(&self) -> Result<(&'static str, Value), DbError> {
        let mut keys = Vec::with_capacity(3);
        if let Some(id) = self.id {
            keys.push(("id", Value::Integer(id)));
        }
        if let Some(discord_id) = &self.discord_id {
            keys.push(("discord_id", Value::Text(discord_id.clone())));
        }
        if let Some(steam64_id) = &self.steam64_id {
            keys.push(("steam64_id", Value::Text(steam64_id.clone())));
        }

        if keys.len() != 1 {
            return Err(DbError::Usage(format!(
                "exactly one lookup key must be provided, got {}",
                keys.len()
            )));
        }
        Ok(keys.remove(0))
    }
}

#[derive(Debug, Clone, Copy)]
enum CredentialColumn {
    DiscordId,
    Steam64Id,
    Dirty,
}

impl Column for CredentialColumn {
    fn name(self) -> &'static str {
        match self {
            Self::DiscordId => "discord_id",
            Self::Steam64Id => "steam64_id",
            Self::Dirty => "dirty",
        }
    }
}

#[derive(Clone)]
pub struct CredentialsDb {
    store: Store,
}

impl CredentialsDb {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            store: Store::new(dir, NAME),
        }
    }

    pub fn set_up(&self) -> Result<(), DbError> {
        self.store.set_up(schema::CREDENTIALS)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn create(&self, discord_id: &str, steam64_id: Option<&str>) -> WriteReceipt {
        self.store.submit_write(WriteTask::new(
            "INSERT INTO credentials (discord_id, steam64_id) VALUES (?1, ?2)",
            vec![Value::Text(discord_id.to_owned()), opt_text(steam64_id)],
        ))
    }

    /// Change the supplied fields and mark the row dirty. Nothing is queued
    /// when the patch is empty.
    pub fn update(&self, id: i64, patch: &CredentialPatch) -> Option<WriteReceipt> {
        let mut set = Assignments::new();
        set.set_opt(CredentialColumn::DiscordId, patch.discord_id.clone(), Value::Text)
            .set_opt(CredentialColumn::Steam64Id, patch.steam64_id.clone(), Value::Text);
        if set.is_empty() {
            return None;
        }
        set.set(CredentialColumn::Dirty, Value::Integer(1));

        let task = set.into_update("credentials", "id", Value::Integer(id))?;
        Some(self.store.submit_write(task))
    }

    pub fn delete(&self, id: i64) -> WriteReceipt {
        self.store.submit_write(WriteTask::new(
            "DELETE FROM credentials WHERE id = ?1",
            vec![Value::Integer(id)],
        ))
    }

    pub fn set_dirty(&self, id: i64) -> WriteReceipt {
        self.store.submit_write(WriteTask::new(
            "UPDATE credentials SET dirty = 1 WHERE id = ?1",
            vec![Value::Integer(id)],
        ))
    }

    pub fn clear_dirty(&self, id: i64) -> WriteReceipt {
        self.store.submit_write(WriteTask::new(
            "UPDATE credentials SET dirty = 0 WHERE id = ?1",
            vec![Value::Integer(id)],
        ))
    }

    /// Resolve a credential by exactly one key; zero or several keys is a
    /// usage error, a missing row is `None`.
    pub fn get_by_key(&self, lookup: &CredentialLookup) -> Result<Option<Credential>, DbError> {
        let (column, value) = lookup.single_key()?;
        let sql = format!(
            "SELECT id, discord_id, steam64_id, dirty FROM credentials WHERE {column} = ?1"
        );
        self.store.read(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let credential = stmt.query_row([value], credential_from_row).optional()?;
            Ok(credential)
        })
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Credential>, DbError> {
        self.get_by_key(&CredentialLookup::by_id(id))
    }

    pub fn get_by_discord(&self, discord_id: &str) -> Result<Option<Credential>, DbError> {
        self.get_by_key(&CredentialLookup::by_discord(discord_id))
    }

    pub fn get_by_steam(&self, steam64_id: &str) -> Result<Option<Credential>, DbError> {
        self.get_by_key(&CredentialLookup::by_steam(steam64_id))
    }

    /// Credentials still waiting for external sync.
    pub fn list_dirty(&self) -> Result<Vec<Credential>, DbError> {
        self.store.read(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, discord_id, steam64_id, dirty FROM credentials WHERE dirty = 1 ORDER BY id",
            )?;
            let rows = stmt.query_map([], credential_from_row)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }
}

fn credential_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Credential> {
    Ok(Credential {
        id: row.get(0)?,
        discord_id: row.get(1)?,
        steam64_id: row.get(2)?,
        dirty: row.get(3)?,
    })
}

fn opt_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |v| Value::Text(v.to_owned()))
}
