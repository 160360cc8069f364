//! Bounded-duration quota grants, many per credential id.
//!
//! Rows are never moved between states on read: a row past its `expired`
//! timestamp stays `active` until someone writes the transition, and is
//! only filtered out of [`TimedLimitDb::list_active`] by time.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use rusqlite::OptionalExtension;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, Value, ValueRef};
use serde::{Deserialize, Serialize};

use crate::schema;
use crate::store::{Store, WriteReceipt};
use crate::task::{Assignments, Column, WriteTask};
use crate::DbError;

pub const NAME: &str = "timed_limit";

const COLUMNS: &str = "uid, id, char_slot, weight_bytes, expired, status";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimedLimitStatus {
    #[default]
    Active,
    Expired,
    Disabled,
}

impl TimedLimitStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Disabled => "disabled",
        }
    }

    /// `active` may move to `expired` or `disabled`; both are terminal.
    pub fn can_transition_to(self, next: Self) -> bool {
        self == next || (self == Self::Active && next != Self::Active)
    }
}

impl fmt::Display for TimedLimitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimedLimitStatus {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            "disabled" => Ok(Self::Disabled),
            other => Err(DbError::InvalidData(format!("unknown timed limit status: {other}"))),
        }
    }
}

impl FromSql for TimedLimitStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: DbError| FromSqlError::Other(Box::new(e)))
    }
}

impl From<TimedLimitStatus> for Value {
    fn from(status: TimedLimitStatus) -> Self {
        Value::Text(status.as_str().to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedLimit {
    pub uid: i64,
    /// Owning credential id.
    pub id: i64,
    pub char_slot: i64,
    pub weight_bytes: i64,
    /// Unix timestamp (seconds).
    pub expired: i64,
    pub status: TimedLimitStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTimedLimit {
    pub id: i64,
    pub char_slot: i64,
    pub weight_bytes: i64,
    pub expired: i64,
    #[serde(default)]
    pub status: TimedLimitStatus,
}

impl NewTimedLimit {
    pub fn active(id: i64, char_slot: i64, weight_bytes: i64, expired: i64) -> Self {
        Self {
            id,
            char_slot,
            weight_bytes,
            expired,
            status: TimedLimitStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimedLimitPatch {
    pub char_slot: Option<i64>,
    pub weight_bytes: Option<i64>,
    pub expired: Option<i64>,
    pub status: Option<TimedLimitStatus>,
}

#[derive(Debug, Clone, Copy)]
enum TimedLimitColumn {
    CharSlot,
    WeightBytes,
    Expired,
    Status,
}

impl Column for TimedLimitColumn {
    fn name(self) -> &'static str {
        match self {
            Self::CharSlot => "char_slot",
            Self::WeightBytes => "weight_bytes",
            Self::Expired => "expired",
            Self::Status => "status",
        }
    }
}

#[derive(Clone)]
pub struct TimedLimitDb {
    store: Store,
}

impl TimedLimitDb {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            store: Store::new(dir, NAME),
        }
    }

    pub fn set_up(&self) -> Result<(), DbError> {
        self.store.set_up(schema::TIMED_LIMIT)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn create(&self, limit: &NewTimedLimit) -> WriteReceipt {
        self.store.submit_write(WriteTask::new(
            "INSERT INTO timed_limit (id, char_slot, weight_bytes, expired, status) VALUES (?1, ?2, ?3, ?4, ?5)",
            vec![
                Value::Integer(limit.id),
                Value::Integer(limit.char_slot),
                Value::Integer(limit.weight_bytes),
                Value::Integer(limit.expired),
                limit.status.into(),
            ],
        ))
    }

    /// Change the supplied fields.
    ///
    /// A patch carrying a `status` only applies when the stored status may
    /// move to it (see [`TimedLimitStatus::can_transition_to`]); otherwise the
    /// whole patch is skipped and the receipt reports zero rows.
    pub fn update(&self, uid: i64, patch: &TimedLimitPatch) -> Option<WriteReceipt> {
        let mut set = Assignments::new();
        set.set_opt(TimedLimitColumn::CharSlot, patch.char_slot, Value::Integer)
            .set_opt(TimedLimitColumn::WeightBytes, patch.weight_bytes, Value::Integer)
            .set_opt(TimedLimitColumn::Expired, patch.expired, Value::Integer)
            .set_opt(TimedLimitColumn::Status, patch.status, Value::from);

        let mut task = set.into_update("timed_limit", "uid", Value::Integer(uid))?;
        if let Some(next) = patch.status {
            task = task.and_where("(status = 'active' OR status = ?)", next.into());
        }
        Some(self.store.submit_write(task))
    }

    pub fn delete(&self, uid: i64) -> WriteReceipt {
        self.store.submit_write(WriteTask::new(
            "DELETE FROM timed_limit WHERE uid = ?1",
            vec![Value::Integer(uid)],
        ))
    }

    /// Move every `active` row whose `expired` is at or before `now` to
    /// `expired`.
    pub fn expire_due(&self, now: i64) -> WriteReceipt {
        self.store.submit_write(WriteTask::new(
            "UPDATE timed_limit SET status = 'expired' WHERE status = 'active' AND expired <= ?1",
            vec![Value::Integer(now)],
        ))
    }

    pub fn get(&self, uid: i64) -> Result<Option<TimedLimit>, DbError> {
        self.store.read(|conn| {
            let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM timed_limit WHERE uid = ?1"))?;
            let limit = stmt.query_row([uid], timed_limit_from_row).optional()?;
            Ok(limit)
        })
    }

    /// Every row of an owner, soonest to expire first.
    pub fn list_by_owner(&self, id: i64) -> Result<Vec<TimedLimit>, DbError> {
        self.store.read(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM timed_limit WHERE id = ?1 ORDER BY expired"
            ))?;
            let rows = stmt.query_map([id], timed_limit_from_row)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }

    /// Rows of an owner that are `active` and expire after `now` (current
    /// time when `None`), soonest to expire first.
    pub fn list_active(&self, id: i64, now: Option<i64>) -> Result<Vec<TimedLimit>, DbError> {
        let now = now.unwrap_or_else(|| chrono::Utc::now().timestamp());
        self.store.read(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM timed_limit
                 WHERE id = ?1 AND status = 'active' AND expired > ?2
                 ORDER BY expired"
            ))?;
            let rows = stmt.query_map([id, now], timed_limit_from_row)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }
}

fn timed_limit_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TimedLimit> {
    Ok(TimedLimit {
        uid: row.get(0)?,
        id: row.get(1)?,
        char_slot: row.get(2)?,
        weight_bytes: row.get(3)?,
        expired: row.get(4)?,
        status: row.get(5)?,
    })
}
